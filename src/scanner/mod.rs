//! Secret detection for keyscan
//!
//! Walks files, matches configured regex patterns line by line and reports
//! every hit with its location and severity.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

pub mod patterns;
mod secret;


pub use secret::SecretScanner;

/// A secret found in a file
#[derive(Debug, Clone, Serialize)]
pub struct SecretMatch {
    /// File path where secret was found
    pub file_path: String,

    /// Line number (1-based)
    pub line_number: usize,

    /// Column number (1-based, counted in characters)
    pub column: usize,

    /// The matched content
    pub content: String,

    /// Pattern name that matched
    pub pattern_name: String,

    /// Severity level
    pub severity: Severity,
}

impl SecretMatch {
    /// Matched content with everything but the first four characters masked
    pub fn redacted(&self) -> String {
        let visible: String = self.content.chars().take(4).collect();
        let hidden = self.content.chars().count().saturating_sub(4);
        format!("{}{}", visible, "*".repeat(hidden.min(12)))
    }
}

/// Severity levels for secret matches
///
/// Secrets are either critical security issues or informational warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Critical: Confirmed secrets that pose immediate security risk
    Critical,
    /// Informational: Patterns that might be false positives but worth checking
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// Compiled secret pattern
#[derive(Debug, Clone)]
pub struct SecretPattern {
    pub name: String,
    pub regex: Regex,
    pub severity: Severity,
    pub description: String,
}

impl SecretPattern {
    pub fn new(name: String, pattern: &str, severity: Severity, description: String) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid regex pattern for {}: {}", name, pattern))?;

        Ok(Self {
            name,
            regex,
            severity,
            description,
        })
    }
}

/// Everything one scan produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub matches: Vec<SecretMatch>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl ScanReport {
    pub fn critical_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.severity == Severity::Critical)
            .count()
    }

    pub fn has_critical(&self) -> bool {
        self.critical_count() > 0
    }
}
