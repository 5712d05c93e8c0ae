//! Logging setup
//!
//! Log events go to the raw stderr channel, so logs emitted during an
//! in-process call end up in that call's captured stderr. Each call gets its
//! own subscriber, scoped to the calling thread, so one call's verbosity never
//! carries into the next.

use crate::stream;
use tracing::Subscriber;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive
pub const LOG_ENV: &str = "KEYSCAN_LOG";

/// Filter for a verbosity level, unless `KEYSCAN_LOG` overrides it
pub fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info,ignore=warn,globset=warn"),
        2 => EnvFilter::new("debug,ignore=warn,globset=warn"),
        _ => EnvFilter::new("trace"),
    })
}

/// Subscriber writing plain lines to the raw stderr channel
pub fn subscriber(verbose: u8) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_ansi(false)
        .with_writer(stream::stderr)
        .finish()
}

/// Route the calling thread's log events through a fresh subscriber until the guard drops
///
/// Any subscriber the host installed is shadowed only for that span, and only
/// on this thread.
pub fn scoped(verbose: u8) -> DefaultGuard {
    tracing::subscriber::set_default(subscriber(verbose))
}
