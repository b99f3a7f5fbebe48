use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so stdout only carries the messages meant for the user.
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")?;

    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_span_list(true)
                .flatten_event(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time();

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    tracing::debug!(
        log_level = %config.level,
        log_format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Create a span for a lifecycle operation
#[macro_export]
macro_rules! lifecycle_span {
    ($operation:expr) => {
        tracing::info_span!("lifecycle_operation", operation = $operation)
    };
    ($operation:expr, $($key:ident = $value:expr),*) => {
        tracing::info_span!("lifecycle_operation", operation = $operation, $($key = $value),*)
    };
}

/// Log the effective configuration
pub fn log_startup_info(config: &Config) {
    tracing::info!(
        environment = config.environment.as_deref().unwrap_or(""),
        base_dir = %config.install.base_dir.display(),
        download_url = %config.install.download_url,
        "neo4j-tasks starting"
    );
}

/// Error reporting helper
pub fn report_error(error: &anyhow::Error, context: &str) {
    tracing::error!(
        error = %error,
        context = context,
        "Operation failed"
    );

    // Log the error chain
    let mut current = error.source();
    let mut depth = 1;
    while let Some(err) = current {
        tracing::error!(
            error = %err,
            depth = depth,
            "Error cause"
        );
        current = err.source();
        depth += 1;
    }
}
