use crate::core::{PeriodSource, Period};
use crate::utils::error::{FlattenError, Result};
use std::io::Read;
use std::path::PathBuf;

/// Reads periods with the header `id,start,end,price,product,priority`.
pub fn read_periods_csv<R: Read>(reader: R) -> Result<Vec<Period>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize::<Period>()
        .map(|row| row.map_err(FlattenError::from))
        .collect()
}

pub fn write_periods_csv(periods: &[Period]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for period in periods {
        writer.serialize(period)?;
    }
    writer
        .into_inner()
        .map_err(|e| FlattenError::IoError(e.into_error()))
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PeriodSource for CsvSource {
    async fn fetch_periods(&self) -> Result<Vec<Period>> {
        tracing::debug!("Reading periods from CSV: {}", self.path.display());
        let data = tokio::fs::read(&self.path).await?;
        read_periods_csv(data.as_slice())
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
