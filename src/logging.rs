use std::io::{self, IsTerminal};

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter from `directive`, falling back to "info" when it
/// does not parse.
fn make_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped.
///   Stdout stays free for the chat transcript.
/// - Level: taken from `directive`, which the settings read from RUST_LOG.
pub fn init_logging(directive: &str) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(make_filter(directive))
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}
