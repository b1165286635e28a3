//! Log output for the binary
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the caller.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable read for the log filter
pub const LOG_ENV: &str = "RUST_LOG";

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter directive for a verbosity flag
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "git_stamp=debug"
    } else {
        "git_stamp=warn"
    }
}

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to the
/// verbosity default. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = if verbose {
            EnvFilter::new(default_directive(true))
        } else {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
        };

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}
