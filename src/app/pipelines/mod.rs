pub mod period_pipeline;

pub use period_pipeline::PeriodPipeline;
