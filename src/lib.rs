pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{ConfiguredSource, CsvSource, LocalStorage, SqliteSource};
pub use app::pipelines::PeriodPipeline;
pub use config::{AppConfig, Environment};
pub use crate::core::{
    etl::EtlEngine,
    ordering::sort_periods,
    partition::resolve_partitioned,
    resolver::{resolve, resolve_traced},
};
pub use domain::model::{Period, Resolution, ResolutionStep, RunSummary};
pub use utils::error::{FlattenError, Result};
