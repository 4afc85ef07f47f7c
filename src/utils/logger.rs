use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over both `debug` and `level`.
fn build_filter(debug: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match (debug, level) {
            (true, _) => "period_flattener=debug,info".to_string(),
            (false, Some(level)) => format!("period_flattener={},warn", level),
            (false, None) => "period_flattener=info,warn".to_string(),
        };
        EnvFilter::new(directive)
    })
}

pub fn init_cli_logger(debug: bool, level: Option<&str>, json: bool) {
    let filter = build_filter(debug, level);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
