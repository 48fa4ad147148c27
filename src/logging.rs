//! Tracing setup for the CLI.
//!
//! Diagnostics go to stderr so that text written to stdout (an exported
//! playlist, for instance) can be piped without interleaved log lines.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maps the number of `-v` flags to a tracing level for this crate.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at the level derived
/// from `verbose` and every other crate at `warn`.
pub fn init_logging(verbose: u8) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "spotlist={},warn",
            level_for_verbosity(verbose)
        ))
    });
    let filter = filter.map_err(|e| crate::Error::Config(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::Error::Config(e.to_string()))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
