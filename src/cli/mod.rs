//! Command-line interface for keyscan
//!
//! This module provides the CLI structure and command dispatch. The same
//! entry point serves the standalone binary and in-process calls: it reads the
//! arguments and console of the [`Invocation`] it is given and terminates with
//! an [`Exit`].

use crate::config::KeyscanConfig;
use crate::runner::{Exit, Invocation};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;

pub mod commands;

/// keyscan - find committed secrets before they ship
#[derive(Parser, Debug)]
#[command(name = "keyscan", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan files or directories for secrets
    Scan(commands::scan::ScanArgs),
    /// List the configured secret patterns
    Patterns,
    /// Configuration management
    Config(commands::config::ConfigArgs),
    /// Show version information
    Version,
}

/// Parse the invocation's arguments and run the selected command
pub fn main(invocation: &Invocation) -> Result<Exit> {
    match Cli::try_parse_from(invocation.args()) {
        Ok(cli) => cli.run(invocation),
        Err(err) => report_parse_error(&err, invocation),
    }
}

/// Help and version go to the console; usage errors go to stderr
fn report_parse_error(err: &clap::Error, invocation: &Invocation) -> Result<Exit> {
    if err.use_stderr() {
        write!(invocation.stderr(), "{}", err.render())?;
    } else {
        invocation.console().print(err.render().ansi().to_string().trim_end());
    }
    Ok(Exit::code(err.exit_code()))
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self, invocation: &Invocation) -> Result<Exit> {
        let config = KeyscanConfig::load_with_custom_config(self.config.as_deref())?;
        let output = invocation
            .console()
            .clone()
            .with_verbosity(self.verbose, self.quiet);

        match self.command {
            Some(Commands::Scan(args)) => commands::scan::execute(args, &config, &output, invocation),
            Some(Commands::Patterns) => commands::patterns::execute(&config, &output),
            Some(Commands::Config(args)) => commands::config::execute(args, &config, &output),
            Some(Commands::Version) => commands::version::execute(&config, &output),
            None => {
                // Show help when no command is provided
                let help = Cli::command().render_help();
                output.print(help.ansi().to_string().trim_end());
                Ok(Exit::success())
            }
        }
    }
}
