//! Configuration management for keyscan
//!
//! Typed configuration for the invocation runner and the scanner. Values are
//! layered with figment on top of the embedded
//! `default-config.toml`.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

mod core;

pub use self::core::{DEFAULT_CONFIG, ENV_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KeyscanConfig {
    /// In-process invocation settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Secret scanning settings
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Settings for the invocation runner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    /// argv[0] installed for each call; the tool name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,

    /// Line width of captured console output
    #[serde(default = "default_capture_width")]
    pub capture_width: usize,

    /// Columns per tab stop in console output
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

fn default_capture_width() -> usize {
    crate::console::DEFAULT_WIDTH
}

fn default_tab_size() -> usize {
    crate::console::DEFAULT_TAB_SIZE
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program_name: None,
            capture_width: default_capture_width(),
            tab_size: default_tab_size(),
        }
    }
}

/// Secret scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Glob patterns of paths to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    // Must stay last: TOML emits arrays of tables after plain values
    /// Secret patterns
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

fn default_max_file_size() -> u64 {
    1024 * 1024
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            max_file_size: default_max_file_size(),
            patterns: Vec::new(),
        }
    }
}

/// Secret pattern configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    /// Pattern name
    pub name: String,

    /// Regex pattern
    pub regex: String,

    /// Severity level (critical or info)
    #[serde(default = "default_severity")]
    pub severity: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Whether this pattern is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Default severity level for patterns
fn default_severity() -> String {
    "critical".to_string()
}

/// Default enabled state for patterns
fn default_enabled() -> bool {
    true
}

impl KeyscanConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.runner.capture_width == 0 {
            bail!("runner.capture_width cannot be 0");
        }
        if self.runner.tab_size == 0 {
            bail!("runner.tab_size cannot be 0");
        }
        if matches!(&self.runner.program_name, Some(name) if name.trim().is_empty()) {
            bail!("runner.program_name cannot be empty");
        }
        if self.scan.max_file_size == 0 {
            bail!("scan.max_file_size cannot be 0");
        }
        if let Some(pattern) = self.scan.patterns.iter().find(|p| p.name.trim().is_empty()) {
            bail!("scan pattern with regex '{}' has no name", pattern.regex);
        }
        Ok(())
    }
}
