//! Patterns command implementation
//!
//! Lists every configured secret pattern, enabled or not.

use crate::config::KeyscanConfig;
use crate::console::{Console, Table};
use crate::runner::Exit;
use crate::scanner::patterns::parse_severity;
use anyhow::Result;

/// Execute the patterns command
pub fn execute(config: &KeyscanConfig, output: &Console) -> Result<Exit> {
    output.header("🔑 Secret Patterns");

    if config.scan.patterns.is_empty() {
        output.warning("No patterns configured");
        return Ok(Exit::success());
    }

    let mut table = Table::new(["Name", "Severity", "Enabled", "Description"]);
    for pattern in &config.scan.patterns {
        table.row([
            pattern.name.clone(),
            parse_severity(&pattern.severity).to_string(),
            if pattern.enabled { "yes" } else { "no" }.to_string(),
            pattern.description.clone(),
        ]);
    }
    output.table(&table);

    let enabled = config.scan.patterns.iter().filter(|p| p.enabled).count();
    output.info(&format!(
        "{} of {} patterns enabled",
        enabled,
        config.scan.patterns.len()
    ));

    Ok(Exit::success())
}
