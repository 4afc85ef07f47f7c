use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Period {id} of product {product} ends ({end}) before it starts ({start})")]
    InvalidPeriodError {
        id: i64,
        product: i64,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Period {id} of product {product} has a non-finite price ({price})")]
    InvalidPriceError { id: i64, product: i64, price: f64 },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Source,
    Configuration,
    Data,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FlattenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FlattenError::IoError(_) => ErrorCategory::Io,
            FlattenError::CsvError(_) | FlattenError::DatabaseError(_) => ErrorCategory::Source,
            FlattenError::JsonError(_)
            | FlattenError::TomlError(_)
            | FlattenError::ConfigError { .. }
            | FlattenError::InvalidConfigValueError { .. }
            | FlattenError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FlattenError::InvalidPeriodError { .. } | FlattenError::InvalidPriceError { .. } => {
                ErrorCategory::Data
            }
            FlattenError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Source => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FlattenError::IoError(_) => {
                "Check that the configured files exist and are readable/writable".to_string()
            }
            FlattenError::CsvError(_) => {
                "Check the CSV header: id,start,end,price,product,priority".to_string()
            }
            FlattenError::DatabaseError(_) => {
                "Check the database path and that the query returns id, start, end, price, product, priority in that order".to_string()
            }
            FlattenError::JsonError(_) | FlattenError::TomlError(_) => {
                "Fix the syntax of the configuration file".to_string()
            }
            FlattenError::ConfigError { .. } | FlattenError::MissingConfigError { .. } => {
                "Review the configuration file against the documented schema".to_string()
            }
            FlattenError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration file", field)
            }
            FlattenError::InvalidPeriodError { .. } | FlattenError::InvalidPriceError { .. } => {
                "Fix the source record, or set processing.onInvalidPeriod to \"skip_record\""
                    .to_string()
            }
            FlattenError::ProcessingError { .. } => {
                "Re-run with --debug to trace the resolution steps".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Source => format!("Could not read periods: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Invalid period data: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlattenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_period_is_high_severity_data_error() {
        let err = FlattenError::InvalidPeriodError {
            id: 7,
            product: 100,
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("2024-01-01"));
        assert!(err.recovery_suggestion().contains("skip_record"));
    }

    #[test]
    fn test_config_errors_name_the_field() {
        let err = FlattenError::InvalidConfigValueError {
            field: "processing.workers".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };

        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
        assert!(err.recovery_suggestion().contains("processing.workers"));
    }
}
