//! Scan command implementation

use crate::config::KeyscanConfig;
use crate::console::{Console, Table};
use crate::runner::{Exit, Invocation};
use crate::scanner::{ScanReport, SecretScanner, Severity};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Exit with success even when critical secrets are found
    #[arg(long)]
    pub no_fail: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Execute the scan command
pub fn execute(
    args: ScanArgs,
    config: &KeyscanConfig,
    output: &Console,
    invocation: &Invocation,
) -> Result<Exit> {
    let scanner = SecretScanner::from_config(&config.scan)?;
    output.verbose(&format!(
        "Loaded {} patterns, scanning {} path(s)",
        scanner.patterns().len(),
        args.paths.len()
    ));

    let report = scanner.scan_paths(&args.paths)?;

    match args.format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize scan report")?;
            writeln!(invocation.stdout(), "{}", json)?;
        }
        ReportFormat::Text => render_text(&report, output, invocation)?,
    }

    if report.has_critical() && !args.no_fail {
        Ok(Exit::code(1))
    } else {
        Ok(Exit::success())
    }
}

fn render_text(report: &ScanReport, output: &Console, invocation: &Invocation) -> Result<()> {
    output.header("🔍 Secret Scan");

    if report.matches.is_empty() {
        output.success("No secrets found");
    } else {
        let mut table = Table::new(["File", "Line", "Pattern", "Severity", "Match"]);
        for secret in &report.matches {
            let severity = match secret.severity {
                Severity::Critical => style(secret.severity.to_string()).red().bold(),
                Severity::Info => style(secret.severity.to_string()).yellow(),
            };
            table.row([
                secret.file_path.clone(),
                format!("{}:{}", secret.line_number, secret.column),
                secret.pattern_name.clone(),
                severity.to_string(),
                secret.redacted(),
            ]);
        }
        output.table(&table);

        if report.has_critical() {
            output.error(&format!(
                "{} critical secret(s) found",
                report.critical_count()
            ));
        } else {
            output.warning("Only informational matches found");
        }
    }

    // Plain summary line for scripts that only read stdout
    writeln!(
        invocation.stdout(),
        "scanned={} skipped={} findings={} critical={}",
        report.files_scanned,
        report.files_skipped,
        report.matches.len(),
        report.critical_count()
    )?;
    Ok(())
}
