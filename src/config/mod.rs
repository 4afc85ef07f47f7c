#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{FlattenError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEV_CONFIG: &str = "config.development.json";
pub const PROD_CONFIG: &str = "config.production.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn config_file(&self) -> &'static str {
        match self {
            Environment::Development => DEV_CONFIG,
            Environment::Production => PROD_CONFIG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub query_path: Option<String>,
    pub csv_source: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub path: String,
    pub application_name: Option<String>,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

fn default_read_only() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Only ever set from the command line.
    #[serde(skip)]
    pub debug_mode: bool,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub json: bool,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub on_invalid_period: InvalidPeriodPolicy,
}

fn default_workers() -> usize {
    1
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            on_invalid_period: InvalidPeriodPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPeriodPolicy {
    #[default]
    RejectBatch,
    SkipRecord,
}

/// Where the periods come from, resolved from the optional config fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind<'a> {
    Sqlite {
        database: &'a DatabaseConfig,
        query_path: &'a str,
    },
    Csv {
        path: &'a str,
    },
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FlattenError::ConfigError {
            message: format!("reading config file '{}': {}", path.display(), e),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn for_environment(environment: Environment) -> Result<Self> {
        Self::from_file(environment.config_file())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        Ok(serde_json::from_str(&processed)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    pub fn source_kind(&self) -> Result<SourceKind<'_>> {
        match (&self.csv_source, &self.database, &self.query_path) {
            (Some(path), None, None) => Ok(SourceKind::Csv { path }),
            (None, Some(database), Some(query_path)) => Ok(SourceKind::Sqlite {
                database,
                query_path,
            }),
            (None, Some(_), None) => Err(FlattenError::MissingConfigError {
                field: "queryPath".to_string(),
            }),
            (None, None, Some(_)) => Err(FlattenError::MissingConfigError {
                field: "database".to_string(),
            }),
            (None, None, None) => Err(FlattenError::ConfigError {
                message: "no period source configured: set csvSource, or database and queryPath"
                    .to_string(),
            }),
            (Some(_), _, _) => Err(FlattenError::ConfigError {
                message: "csvSource cannot be combined with database/queryPath".to_string(),
            }),
        }
    }

    pub fn workers(&self) -> usize {
        self.processing.workers
    }

    pub fn debug_mode(&self) -> bool {
        self.logging.debug_mode
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        match self.source_kind()? {
            SourceKind::Csv { path } => validation::validate_path("csvSource", path)?,
            SourceKind::Sqlite {
                database,
                query_path,
            } => {
                validation::validate_non_empty_string("database.path", &database.path)?;
                validation::validate_path("database.path", &database.path)?;
                validation::validate_path("queryPath", query_path)?;
            }
        }

        if self.logging.log_to_file {
            validation::validate_path("logging.filePath", &self.logging.file_path)?;
        }

        if let Some(level) = &self.logging.level {
            let known = ["trace", "debug", "info", "warn", "error"];
            if !known.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(FlattenError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Unknown level. Valid levels: {}", known.join(", ")),
                });
            }
        }

        if let Some(output) = &self.output {
            validation::validate_path("output.csvPath", &output.csv_path)?;
        }

        validation::validate_positive_number("processing.workers", self.processing.workers, 1)
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables are left verbatim.
fn substitute_env_vars(content: &str) -> String {
    let re = match Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
