use clap::Parser;
use period_flattener::config::SourceKind;
use period_flattener::utils::error::ErrorSeverity;
use period_flattener::utils::{logger, validation::Validate};
use period_flattener::{
    AppConfig, CliArgs, ConfiguredSource, EtlEngine, FlattenError, LocalStorage, PeriodPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config_path(), e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(
        config.debug_mode(),
        config.logging.level.as_deref(),
        config.logging.json,
    );

    tracing::info!(
        "Running in {} mode ({})",
        args.environment().name(),
        args.config_path()
    );
    if config.debug_mode() {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    display_config_summary(&config, &args);
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no periods will be read");
        return Ok(());
    }

    let source = match ConfiguredSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => fail(&e),
    };
    let storage = LocalStorage::new(".");
    let pipeline = PeriodPipeline::new(source, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Flattened {} periods into {} ({} rejected, {} log lines)",
                summary.fetched,
                summary.flattened,
                summary.rejected,
                summary.log_lines
            );
            println!("✅ All periods processed.");
            println!("Periods fetched: {}", summary.fetched);
            println!("Periods after flattening: {}", summary.flattened);
            if let Some(path) = summary.csv_output {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &FlattenError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &AppConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!("  Environment: {}", args.environment().name());
    match config.source_kind() {
        Ok(SourceKind::Sqlite {
            database,
            query_path,
        }) => {
            println!("  Source: sqlite {}", database.path);
            println!("  Query: {}", query_path);
        }
        Ok(SourceKind::Csv { path }) => println!("  Source: csv {}", path),
        Err(_) => println!("  Source: <invalid>"),
    }
    if config.logging.log_to_file {
        println!("  Record log: {}", config.logging.file_path);
    }
    if let Some(output) = &config.output {
        println!("  CSV output: {}", output.csv_path);
    }
    println!("  Workers: {}", config.workers());
    println!(
        "  Invalid periods: {:?}",
        config.processing.on_invalid_period
    );
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}
