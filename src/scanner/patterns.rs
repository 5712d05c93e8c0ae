//! Secret patterns from configuration

use super::{SecretPattern, Severity};
use crate::config::PatternConfig;
use anyhow::Result;

/// Convert severity string to enum
pub fn parse_severity(severity: &str) -> Severity {
    match severity.to_lowercase().as_str() {
        "info" => Severity::Info,
        _ => Severity::Critical, // Unknown severities are treated as critical
    }
}

/// Compile the enabled patterns of a configuration
pub fn patterns_from_config(config_patterns: &[PatternConfig]) -> Result<Vec<SecretPattern>> {
    config_patterns
        .iter()
        .filter(|pattern| pattern.enabled)
        .map(|pattern| {
            SecretPattern::new(
                pattern.name.clone(),
                &pattern.regex,
                parse_severity(&pattern.severity),
                pattern.description.clone(),
            )
        })
        .collect()
}
