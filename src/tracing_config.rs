use std::env;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console tracing for the overlay engine.
///
/// Filtering comes from `RUST_LOG` when set, defaulting to "info".
/// `LOOPDECK_LOG_FORMAT=json` switches the console layer to JSON output,
/// anything else gets the pretty human-readable layer.
///
/// # Errors
/// Returns error if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = env::var("LOOPDECK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_target(true).with_level(true))
                .try_init()?;
        }
        _ => {
            registry
                .with(fmt::layer().pretty().with_target(true).with_level(true))
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize tracing with an additional daily-rolling log file.
///
/// The overlay runs detached from a terminal on most setups, so the file
/// sink is what makes reconciliation and dispatch failures inspectable
/// after the fact. Files land in the loopdeck log directory and the last
/// seven days are kept.
///
/// # Errors
/// Returns error if the log directory or file cannot be created, or if a
/// global subscriber is already installed.
pub fn init_with_file() -> Result<(), Box<dyn std::error::Error>> {
    const DAYS_TO_KEEP: usize = 7;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = crate::config::ConfigPaths::log_dir()?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("loopdeck")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .pretty()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .compact()
                .with_target(true)
                .with_level(true)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()?;

    // The writer guard must outlive the process for the file sink to flush.
    std::mem::forget(guard);

    Ok(())
}
