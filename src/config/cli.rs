use crate::config::{AppConfig, Environment};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "period-flattener")]
#[command(about = "Flattens overlapping product price periods so the strongest priority wins")]
pub struct CliArgs {
    /// Use config.development.json instead of config.production.json
    #[arg(long)]
    pub dev: bool,

    /// Print configuration, query text and every resolution step
    #[arg(long)]
    pub debug: bool,

    /// Explicit configuration file (.json or .toml), overrides --dev
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override processing.workers from the config file
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Load and validate the configuration, then exit without reading any periods
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn environment(&self) -> Environment {
        Environment::from_dev_flag(self.dev)
    }

    pub fn config_path(&self) -> String {
        self.config
            .clone()
            .unwrap_or_else(|| self.environment().config_file().to_string())
    }

    /// Loads the selected config file and applies the command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_file(self.config_path())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        config.logging.debug_mode = self.debug;
        if let Some(workers) = self.workers {
            config.processing.workers = workers;
        }
    }
}
