//! keyscan as a [`Tool`] the runner can drive

use crate::cli;
use crate::logging;
use crate::runner::{Exit, Invocation, Tool};
use anyhow::Result;

/// The keyscan command-line tool
#[derive(Debug, Default, Clone, Copy)]
pub struct Keyscan;

impl Keyscan {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for Keyscan {
    fn name(&self) -> &str {
        "keyscan"
    }

    fn main(&self, invocation: &Invocation) -> Result<Exit> {
        // Logging must be up before parsing, so count -v flags off the raw arguments
        let _log = logging::scoped(verbosity(invocation.args()));
        cli::main(invocation)
    }
}

/// Count `-v` flags the way the CLI parser will, ignoring everything after `--`
fn verbosity(args: &[String]) -> u8 {
    let count = args
        .iter()
        .skip(1)
        .take_while(|arg| arg.as_str() != "--")
        .map(|arg| match arg.as_str() {
            "--verbose" => 1,
            short if short.starts_with('-') && !short.starts_with("--") => {
                short[1..].chars().filter(|c| *c == 'v').count()
            }
            _ => 0,
        })
        .sum::<usize>();
    u8::try_from(count).unwrap_or(u8::MAX)
}
