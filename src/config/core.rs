use super::KeyscanConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix of environment overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "KEYSCAN_";

impl KeyscanConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        if let Some(path) = custom_config {
            if !Path::new(path).exists() {
                anyhow::bail!("config file not found: {}", path);
            }
        }
        Self::from_figment(Self::figment(custom_config))
    }

    /// The layered configuration sources, lowest priority first
    pub fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        let user_config = Self::user_config_path();
        figment = figment
            // User config - support multiple formats
            .merge(Toml::file(&user_config))
            .merge(Json::file(user_config.replace(".toml", ".json")))
            .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
            // Repository config
            .merge(Toml::file("keyscan.toml"))
            .merge(Json::file("keyscan.json"))
            .merge(Yaml::file("keyscan.yaml"));

        // An explicit config file beats everything except the environment
        if let Some(custom_path) = custom_config {
            figment = match Path::new(custom_path).extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        }

        // Environment variables always have highest priority
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate a configuration from any figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: KeyscanConfig = figment
            .extract()
            .context("Failed to parse keyscan configuration")?;
        config.validate()?;
        tracing::trace!(
            "config loaded: {} patterns, capture width {}",
            config.scan.patterns.len(),
            config.runner.capture_width
        );
        Ok(config)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/keyscan/config.toml", home),
            Err(_) => "~/.config/keyscan/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn defaults() -> Figment {
        Figment::new().merge(Toml::string(DEFAULT_CONFIG))
    }

    #[test]
    fn test_config_loads_defaults() {
        let config = KeyscanConfig::from_figment(defaults()).expect("Should load default config");

        assert_eq!(config.runner.capture_width, 80);
        assert_eq!(config.runner.tab_size, 4);
        assert_eq!(config.runner.program_name, None);
        assert!(config.scan.patterns.iter().any(|p| p.name == "GitHub PAT"));
        assert!(config.scan.patterns.iter().any(|p| p.severity == "info"));
    }

    #[test]
    fn test_later_layers_override_defaults() {
        let figment = defaults().merge(Toml::string(
            "[runner]\nprogram_name = \"wrapped\"\ncapture_width = 120\n",
        ));
        let config = KeyscanConfig::from_figment(figment).unwrap();

        assert_eq!(config.runner.program_name.as_deref(), Some("wrapped"));
        assert_eq!(config.runner.capture_width, 120);
        assert_eq!(config.runner.tab_size, 4);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let figment = defaults().merge(Toml::string("[runner]\ntab_size = 0\n"));
        assert!(KeyscanConfig::from_figment(figment).is_err());
    }

    #[test]
    fn test_custom_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        fs::write(&path, r#"{"scan": {"max_file_size": 42}}"#).unwrap();

        let config = KeyscanConfig::load_with_custom_config(path.to_str()).unwrap();
        assert_eq!(config.scan.max_file_size, 42);
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let result = KeyscanConfig::load_with_custom_config(Some("non_existent.toml"));
        assert!(result.is_err());
    }
}
