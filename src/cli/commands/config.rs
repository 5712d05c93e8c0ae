//! Configuration command implementations

use crate::config::KeyscanConfig;
use crate::console::Console;
use crate::runner::Exit;
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Execute config commands
pub fn execute(args: ConfigArgs, config: &KeyscanConfig, output: &Console) -> Result<Exit> {
    match args.command {
        ConfigCommands::Show { format } => show(config, format, output),
        ConfigCommands::Validate => validate(config, output),
    }
}

fn show(config: &KeyscanConfig, format: ConfigFormat, output: &Console) -> Result<Exit> {
    let rendered = match format {
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).context("Failed to serialize configuration")?
        }
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?
        }
    };
    output.print(rendered.trim_end());
    Ok(Exit::success())
}

fn validate(config: &KeyscanConfig, output: &Console) -> Result<Exit> {
    output.header("✅ Validating Configuration");

    // Loading already validated; re-check so this command stands on its own
    config.validate()?;
    crate::scanner::SecretScanner::from_config(&config.scan)?;

    output.success("Configuration is valid");
    output.key_value("Patterns:", &config.scan.patterns.len().to_string(), false);
    output.key_value("Exclude globs:", &config.scan.exclude.len().to_string(), false);
    output.key_value(
        "Capture width:",
        &config.runner.capture_width.to_string(),
        false,
    );

    Ok(Exit::success())
}
