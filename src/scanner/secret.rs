//! Secret scanner implementation

use super::patterns::patterns_from_config;
use super::{ScanReport, SecretMatch, SecretPattern};
use crate::config::ScanConfig;
use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::path::Path;

/// Bytes inspected when deciding whether a file is binary
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Secret scanner for detecting secrets in files
pub struct SecretScanner {
    patterns: Vec<SecretPattern>,
    exclude_globset: GlobSet,
    max_file_size: u64,
}

impl SecretScanner {
    /// Create a new secret scanner with patterns from configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let patterns = patterns_from_config(&config.patterns)?;

        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude {
            let glob =
                Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
            builder.add(glob);
        }
        let exclude_globset = builder
            .build()
            .context("Failed to build exclude pattern globset")?;

        tracing::debug!(
            "scanner ready: {} patterns, {} exclude globs",
            patterns.len(),
            config.exclude.len()
        );

        Ok(Self {
            patterns,
            exclude_globset,
            max_file_size: config.max_file_size,
        })
    }

    pub fn patterns(&self) -> &[SecretPattern] {
        &self.patterns
    }

    /// Scan files and directories; directories are walked recursively honoring .gitignore
    pub fn scan_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                bail!("path does not exist: {}", path.display());
            }

            if path.is_file() {
                self.scan_into(path, &mut report)?;
                continue;
            }

            let walker = WalkBuilder::new(path)
                .hidden(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();
            for entry in walker {
                let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                if entry.file_type().is_some_and(|kind| kind.is_file()) {
                    self.scan_into(entry.path(), &mut report)?;
                }
            }
        }

        Ok(report)
    }

    fn scan_into(&self, path: &Path, report: &mut ScanReport) -> Result<()> {
        if !self.should_scan_file(path)? {
            report.files_skipped += 1;
            return Ok(());
        }
        match self.scan_file(path)? {
            Some(matches) => {
                report.files_scanned += 1;
                report.matches.extend(matches);
            }
            None => report.files_skipped += 1,
        }
        Ok(())
    }

    /// Scan a single file; `None` when the file is binary
    pub fn scan_file<P: AsRef<Path>>(&self, file_path: P) -> Result<Option<Vec<SecretMatch>>> {
        let path = file_path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        if bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0) {
            tracing::debug!("skipping binary file: {}", path.display());
            return Ok(None);
        }
        let content = String::from_utf8_lossy(&bytes);

        let mut matches = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            for pattern in &self.patterns {
                for mat in pattern.regex.find_iter(line) {
                    matches.push(SecretMatch {
                        file_path: path.display().to_string(),
                        line_number: line_num + 1,
                        column: line[..mat.start()].chars().count() + 1,
                        content: mat.as_str().to_string(),
                        pattern_name: pattern.name.clone(),
                        severity: pattern.severity,
                    });
                }
            }
        }

        Ok(Some(matches))
    }

    /// Check size and exclude patterns
    fn should_scan_file(&self, path: &Path) -> Result<bool> {
        if self.exclude_globset.is_match(path) {
            tracing::debug!("excluded by pattern: {}", path.display());
            return Ok(false);
        }

        let size = fs::metadata(path)
            .with_context(|| format!("Failed to stat file: {}", path.display()))?
            .len();
        if size > self.max_file_size {
            tracing::debug!("skipping {} ({} bytes)", path.display(), size);
            return Ok(false);
        }

        Ok(true)
    }
}
