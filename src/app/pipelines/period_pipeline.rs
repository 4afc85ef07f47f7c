use crate::adapters::csv_io::write_periods_csv;
use crate::adapters::record_log::RecordLog;
use crate::config::{AppConfig, InvalidPeriodPolicy};
use crate::core::partition::resolve_partitioned;
use crate::core::{FlattenResult, Period, PeriodSource, Pipeline, RunSummary, Storage};
use crate::utils::error::Result;
use crate::utils::validation::{partition_valid, validate_periods};

/// Fetches periods from a source, flattens them, and writes the record log and CSV output.
pub struct PeriodPipeline<Src: PeriodSource, S: Storage> {
    pub(crate) source: Src,
    pub(crate) storage: S,
    pub(crate) config: AppConfig,
}

impl<Src: PeriodSource, S: Storage> PeriodPipeline<Src, S> {
    pub fn new(source: Src, storage: S, config: AppConfig) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    fn screen(&self, periods: Vec<Period>) -> Result<(Vec<Period>, Vec<Period>)> {
        match self.config.processing.on_invalid_period {
            InvalidPeriodPolicy::RejectBatch => {
                validate_periods(&periods)?;
                Ok((periods, Vec::new()))
            }
            InvalidPeriodPolicy::SkipRecord => {
                let (valid, rejected) = partition_valid(periods);
                for (period, reason) in &rejected {
                    tracing::warn!("⚠️ Skipping {}: {}", period, reason);
                }
                Ok((valid, rejected.into_iter().map(|(p, _)| p).collect()))
            }
        }
    }
}

#[async_trait::async_trait]
impl<Src: PeriodSource, S: Storage> Pipeline for PeriodPipeline<Src, S> {
    async fn extract(&self) -> Result<Vec<Period>> {
        tracing::info!("🚀 Fetching periods from {}", self.source.describe());
        let periods = self.source.fetch_periods().await?;
        tracing::debug!("Fetched {} periods", periods.len());
        Ok(periods)
    }

    async fn transform(&self, periods: Vec<Period>) -> Result<FlattenResult> {
        let source_periods = periods.clone();
        let (valid, rejected) = self.screen(periods)?;

        let resolution = resolve_partitioned(valid, self.config.workers()).await?;

        if self.config.debug_mode() {
            for step in &resolution.steps {
                tracing::debug!("  {}", step);
            }
        }

        Ok(FlattenResult {
            source_periods,
            flattened: resolution.periods,
            steps: resolution.steps,
            rejected,
        })
    }

    async fn load(&self, result: FlattenResult) -> Result<RunSummary> {
        let mut log_lines = 0;
        if self.config.logging.log_to_file {
            let log = RecordLog::new(&self.storage, self.config.logging.file_path.clone());
            log_lines += log.append(&result.source_periods).await?;
            log_lines += log.append(&result.flattened).await?;
        }

        let csv_output = match &self.config.output {
            Some(output) => {
                let data = write_periods_csv(&result.flattened)?;
                tracing::debug!("Writing {} bytes of CSV to {}", data.len(), output.csv_path);
                self.storage.write_file(&output.csv_path, &data).await?;
                Some(output.csv_path.clone())
            }
            None => None,
        };

        Ok(RunSummary {
            fetched: result.source_periods.len(),
            flattened: result.flattened.len(),
            rejected: result.rejected.len(),
            steps: result.steps.len(),
            log_lines,
            csv_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FlattenError;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.entry(path.to_string()).or_default().extend_from_slice(data);
            Ok(())
        }
    }

    struct MockSource {
        periods: Vec<Period>,
    }

    impl PeriodSource for MockSource {
        async fn fetch_periods(&self) -> Result<Vec<Period>> {
            Ok(self.periods.clone())
        }

        fn describe(&self) -> String {
            "mock source".to_string()
        }
    }

    fn period(id: i64, start: (u32, u32), end: (u32, u32), priority: i32) -> Period {
        Period::new(
            id,
            NaiveDate::from_ymd_opt(2024, start.0, start.1).unwrap(),
            NaiveDate::from_ymd_opt(2024, end.0, end.1).unwrap(),
            10.0,
            100,
            priority,
        )
    }

    fn config(json: &str) -> AppConfig {
        AppConfig::from_json_str(json).unwrap()
    }

    fn pipeline(periods: Vec<Period>, config: AppConfig) -> PeriodPipeline<MockSource, MockStorage> {
        PeriodPipeline::new(MockSource { periods }, MockStorage::new(), config)
    }

    #[tokio::test]
    async fn test_transform_flattens_source_periods() {
        let pipeline = pipeline(
            vec![period(1, (1, 1), (1, 31), 2), period(2, (1, 10), (1, 20), 1)],
            config(r#"{ "csvSource": "unused.csv" }"#),
        );

        let periods = pipeline.extract().await.unwrap();
        let result = pipeline.transform(periods).await.unwrap();

        assert_eq!(result.source_periods.len(), 2);
        assert_eq!(result.flattened.len(), 3);
        assert_eq!(result.steps.len(), 1);
        assert!(result.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_reject_batch_policy_fails_on_inverted_period() {
        let pipeline = pipeline(
            vec![period(1, (1, 1), (1, 31), 2), period(2, (3, 1), (2, 1), 1)],
            config(r#"{ "csvSource": "unused.csv" }"#),
        );

        let err = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, FlattenError::InvalidPeriodError { id: 2, .. }));
    }

    #[tokio::test]
    async fn test_skip_record_policy_drops_inverted_period() {
        let pipeline = pipeline(
            vec![period(1, (1, 1), (1, 31), 2), period(2, (3, 1), (2, 1), 1)],
            config(r#"{ "csvSource": "unused.csv", "processing": { "onInvalidPeriod": "skip_record" } }"#),
        );

        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();

        assert_eq!(result.flattened, vec![period(1, (1, 1), (1, 31), 2)]);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].id, 2);
    }

    #[tokio::test]
    async fn test_load_writes_log_for_fetched_and_flattened_sets() {
        let pipeline = pipeline(
            vec![period(1, (1, 1), (1, 31), 1), period(2, (1, 10), (1, 20), 2)],
            config(
                r#"{
                    "csvSource": "unused.csv",
                    "logging": { "logToFile": true, "filePath": "periods.log" },
                    "output": { "csvPath": "out/flattened.csv" }
                }"#,
            ),
        );

        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();
        let summary = pipeline.load(result).await.unwrap();

        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.flattened, 1);
        assert_eq!(summary.log_lines, 3);
        assert_eq!(summary.csv_output.as_deref(), Some("out/flattened.csv"));

        let log = pipeline.storage.get_file("periods.log").await.unwrap();
        assert_eq!(log.lines().count(), 3);
        assert!(log.contains("Period 2024-01-10 to 2024-01-20, Prodnum: 100, Price 10.00, Priority 2"));

        let csv = pipeline.storage.get_file("out/flattened.csv").await.unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("2024-01-01,2024-01-31"));
    }

    #[tokio::test]
    async fn test_load_without_outputs_writes_nothing() {
        let pipeline = pipeline(
            vec![period(1, (1, 1), (1, 31), 1)],
            config(r#"{ "csvSource": "unused.csv" }"#),
        );

        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();
        let summary = pipeline.load(result).await.unwrap();

        assert_eq!(summary.log_lines, 0);
        assert!(summary.csv_output.is_none());
        assert!(pipeline.storage.files.lock().await.is_empty());
    }
}
