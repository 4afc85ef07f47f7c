use crate::core::{Period, Storage};
use crate::utils::error::Result;
use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_record(period: &Period, timestamp: &str) -> String {
    format!(
        "{} - Period {} to {}, Prodnum: {}, Price {:.2}, Priority {}\n",
        timestamp,
        period.start.format(DATE_FORMAT),
        period.end.format(DATE_FORMAT),
        period.product,
        period.price,
        period.priority
    )
}

/// Appends one human-readable line per period to a log file.
pub struct RecordLog<'a, S: Storage> {
    storage: &'a S,
    path: String,
}

impl<'a, S: Storage> RecordLog<'a, S> {
    pub fn new(storage: &'a S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// Returns the number of lines written.
    pub async fn append(&self, periods: &[Period]) -> Result<usize> {
        let mut lines = String::new();
        for period in periods {
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            lines.push_str(&format_record(period, &timestamp));
        }

        self.storage
            .append_file(&self.path, lines.as_bytes())
            .await?;
        tracing::info!("Logged {} periods to {}", periods.len(), self.path);
        Ok(periods.len())
    }
}
