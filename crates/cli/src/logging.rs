use std::io;

use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wirebox_core::{ContainerConfig, LogFormat};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so scenario output on stdout stays clean.
pub fn init_logging(config: &ContainerConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()?,
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).compact())
            .try_init()?,
    }

    tracing::debug!(
        target: "wirebox::logging",
        "Logging initialized (level: {}, format: {})",
        config.log_level,
        config.log_format
    );

    Ok(())
}
