use crate::config::LogFormat;
use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Always writes to stderr: stdout belongs to the stdio transport.
///
/// # Errors
///
/// Fails on an unparsable filter directive or when a subscriber is already installed.
pub fn init(filter: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
