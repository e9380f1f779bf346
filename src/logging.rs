//! Tracing setup
//!
//! Logs go to stderr so the interactive transcript on stdout stays readable.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used as the filter.
pub fn init_tracing(fallback: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
