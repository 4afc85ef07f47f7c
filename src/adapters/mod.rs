// Adapters layer: concrete sources and sinks behind the domain ports.

pub mod csv_io;
pub mod record_log;
pub mod sqlite;
pub mod storage;

use crate::config::{AppConfig, SourceKind};
use crate::core::{Period, PeriodSource};
use crate::utils::error::Result;

pub use csv_io::CsvSource;
pub use record_log::RecordLog;
pub use sqlite::SqliteSource;
pub use storage::LocalStorage;

/// The source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Sqlite(SqliteSource),
    Csv(CsvSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(match config.source_kind()? {
            SourceKind::Sqlite {
                database,
                query_path,
            } => ConfiguredSource::Sqlite(SqliteSource::new(
                database,
                query_path,
                config.debug_mode(),
            )),
            SourceKind::Csv { path } => ConfiguredSource::Csv(CsvSource::new(path)),
        })
    }
}

impl PeriodSource for ConfiguredSource {
    async fn fetch_periods(&self) -> Result<Vec<Period>> {
        match self {
            ConfiguredSource::Sqlite(source) => source.fetch_periods().await,
            ConfiguredSource::Csv(source) => source.fetch_periods().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredSource::Sqlite(source) => source.describe(),
            ConfiguredSource::Csv(source) => source.describe(),
        }
    }
}
