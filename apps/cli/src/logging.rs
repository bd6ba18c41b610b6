//! Logging initialization
//!
//! `RUST_LOG` wins when set; otherwise every workspace crate logs at the
//! configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 6] = [
    "indivo",
    "indivo_models",
    "indivo_format",
    "indivo_validator",
    "indivo_sdm",
    "indivo_data_models",
];

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|krate| format!("{krate}={}", config.level))
            .collect();
        EnvFilter::new(directives.join(","))
    })
}

/// Logs go to stderr so command output on stdout stays parseable.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(build_env_filter(config));

    if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }
    Ok(())
}
