//! # keyscan - secret scanning you can call like a function
//!
//! keyscan is a command-line secret scanner that can also be driven
//! in-process: instead of spawning a subprocess, callers pass an argument list
//! and get back the exit code and everything the tool printed.
//!
//! ```no_run
//! let result = keyscan::run(["scan", "src"])?;
//! if result.exit_code != 0 {
//!     eprintln!("{}", result.stdout);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The invocation machinery is generic over [`runner::Tool`]:
//!
//! - [`console`]: the styled output sink, routed into a capture when active
//! - [`capture`]: per-thread capture scopes for console output
//! - [`stream`]: process-wide raw stdout/stderr channels and their redirection
//! - [`argv`]: the process-wide argument vector seen by legacy entry points
//! - [`runner`]: orchestration of one call, from argument setup to result
//!
//! Calls are synchronous and not safe to make from several threads at once
//! without external serialization; see [`runner`] for details.

pub mod argv;
pub mod capture;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod runner;
pub mod scanner;
pub mod stream;
pub mod tool;

pub use config::KeyscanConfig;
pub use runner::{Exit, Invocation, InvocationResult, Outcome, Runner, Tool, exit};
pub use tool::Keyscan;

/// Result type alias for keyscan operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Runner for the keyscan tool, configured from the layered keyscan config
pub fn runner() -> Result<Runner<Keyscan>> {
    let config = KeyscanConfig::load()?;
    Ok(Runner::new(Keyscan::new()).with_config(config.runner))
}

/// Run keyscan in-process with `args` and capture its output
///
/// Tool failures come back as a non-zero `exit_code`; only configuration or
/// environment faults are returned as errors.
pub fn run<I, S>(args: I) -> Result<InvocationResult>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    runner()?.run(args)
}
