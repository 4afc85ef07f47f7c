pub mod etl;
pub mod ordering;
pub mod partition;
pub mod resolver;

pub use crate::domain::model::{FlattenResult, Period, Resolution, ResolutionStep, RunSummary};
pub use crate::domain::ports::{PeriodSource, Pipeline, Storage};
pub use crate::utils::error::Result;
