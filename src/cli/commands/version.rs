//! Version command implementation

use crate::config::KeyscanConfig;
use crate::console::Console;
use crate::runner::Exit;
use crate::{PKG_NAME, VERSION};
use anyhow::Result;

/// Version plus a summary of the scanner this build would run with
pub fn execute(config: &KeyscanConfig, output: &Console) -> Result<Exit> {
    output.header(&format!("🔑 {} {}", PKG_NAME, VERSION));
    output.print(env!("CARGO_PKG_DESCRIPTION"));

    let enabled = config.scan.patterns.iter().filter(|p| p.enabled).count();
    let critical = config
        .scan
        .patterns
        .iter()
        .filter(|p| p.enabled && !p.severity.eq_ignore_ascii_case("info"))
        .count();

    output.section("Scanner");
    output.table_row(
        "Patterns",
        &format!("{} enabled ({} critical) of {}", enabled, critical, config.scan.patterns.len()),
    );
    output.table_row("Exclude globs", &config.scan.exclude.len().to_string());
    output.table_row(
        "Max file size",
        &format!("{} KiB", config.scan.max_file_size / 1024),
    );

    output.section("In-process runner");
    output.table_row(
        "Program name",
        config.runner.program_name.as_deref().unwrap_or(PKG_NAME),
    );
    output.table_row("Capture width", &config.runner.capture_width.to_string());
    output.table_row(
        "Build",
        &format!(
            "{} {}",
            std::env::consts::ARCH,
            if cfg!(debug_assertions) { "debug" } else { "release" }
        ),
    );

    Ok(Exit::success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureBuffer;
    use crate::config::{PatternConfig, RunnerConfig};

    #[test]
    fn test_version_summarizes_configuration() {
        let mut config = KeyscanConfig::default();
        config.runner = RunnerConfig {
            program_name: Some("wrapped".to_string()),
            ..RunnerConfig::default()
        };
        for (name, severity, enabled) in [("A", "critical", true), ("B", "info", true), ("C", "critical", false)] {
            config.scan.patterns.push(PatternConfig {
                name: name.to_string(),
                regex: "x".to_string(),
                severity: severity.to_string(),
                description: String::new(),
                enabled,
            });
        }
        let buffer = CaptureBuffer::new();

        execute(&config, &Console::bound(buffer.clone())).unwrap();

        let output = buffer.contents();
        assert!(output.contains(&format!("keyscan {}", VERSION)));
        assert!(output.contains("2 enabled (1 critical) of 3"));
        assert!(output.contains("wrapped"));
        assert!(output.contains("1024 KiB"));
    }
}
