use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting period flattening run");

        tracing::info!("Extracting periods...");
        let periods = self.pipeline.extract().await?;
        tracing::info!("Extracted {} periods", periods.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Resolving overlaps...");
        let result = self.pipeline.transform(periods).await?;
        tracing::info!(
            "Flattened {} periods into {} ({} resolution steps, {} rejected)",
            result.source_periods.len(),
            result.flattened.len(),
            result.steps.len(),
            result.rejected.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("Writing output...");
        let summary = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
