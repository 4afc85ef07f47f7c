use crate::core::resolver::resolve_traced;
use crate::domain::model::{Period, Resolution};
use crate::utils::error::{FlattenError, Result};
use std::collections::BTreeMap;

/// Groups periods by product key, ascending.
pub fn partition_by_product(periods: Vec<Period>) -> Vec<Vec<Period>> {
    let mut groups: BTreeMap<i64, Vec<Period>> = BTreeMap::new();
    for period in periods {
        groups.entry(period.product).or_default().push(period);
    }
    groups.into_values().collect()
}

/// Packs consecutive product groups into at most `workers` chunks of roughly equal
/// period count. A product is never split across chunks.
pub fn chunk_groups(groups: Vec<Vec<Period>>, workers: usize) -> Vec<Vec<Period>> {
    let workers = workers.max(1);
    let total: usize = groups.iter().map(Vec::len).sum();
    let target = total.div_ceil(workers).max(1);

    let mut chunks = Vec::with_capacity(workers);
    let mut current: Vec<Period> = Vec::new();
    for group in groups {
        if !current.is_empty() && current.len() + group.len() > target && chunks.len() + 1 < workers
        {
            chunks.push(std::mem::take(&mut current));
        }
        current.extend(group);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Resolves each product chunk on its own blocking worker and concatenates the results.
/// Chunks cover ascending, disjoint product ranges, so the output is already sorted.
pub async fn resolve_partitioned(periods: Vec<Period>, workers: usize) -> Result<Resolution> {
    if workers <= 1 {
        return Ok(resolve_traced(periods));
    }

    let chunks = chunk_groups(partition_by_product(periods), workers);
    tracing::debug!(
        "Resolving {} chunk(s) on up to {} workers",
        chunks.len(),
        workers
    );

    let handles: Vec<_> = chunks
        .into_iter()
        .map(|chunk| tokio::task::spawn_blocking(move || resolve_traced(chunk)))
        .collect();

    let mut merged = Resolution::default();
    for (index, handle) in handles.into_iter().enumerate() {
        let resolution = handle.await.map_err(|e| FlattenError::ProcessingError {
            message: format!("worker for chunk {} failed: {}", index, e),
        })?;
        merged.periods.extend(resolution.periods);
        merged.steps.extend(resolution.steps);
    }

    Ok(merged)
}
