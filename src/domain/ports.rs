use crate::domain::model::{FlattenResult, Period, RunSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Supplies the unordered period snapshot.
pub trait PeriodSource: Send + Sync {
    fn fetch_periods(&self) -> impl std::future::Future<Output = Result<Vec<Period>>> + Send;
    fn describe(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Period>>;
    async fn transform(&self, periods: Vec<Period>) -> Result<FlattenResult>;
    async fn load(&self, result: FlattenResult) -> Result<RunSummary>;
}
