//! narrate configuration management.

use anyhow::{Context, Result};
use prosody::ProsodyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INITIAL_CHUNKS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrateConfig {
    /// Chunks synthesized immediately before the rest is queued
    #[serde(default = "default_initial_chunks")]
    pub initial_chunks: usize,

    /// Formatter settings, stored at the top level of the file
    #[serde(flatten)]
    pub formatter: ProsodyConfig,
}

fn default_initial_chunks() -> usize {
    DEFAULT_INITIAL_CHUNKS
}

impl Default for NarrateConfig {
    fn default() -> Self {
        Self {
            initial_chunks: default_initial_chunks(),
            formatter: ProsodyConfig::default(),
        }
    }
}

impl NarrateConfig {
    /// Get the config file path: <config_dir>/cli-programs/narrate.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cli-programs")
            .join("narrate.toml")
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: NarrateConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .formatter
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarrateConfig::default();
        assert_eq!(config.initial_chunks, 2);
        assert_eq!(config.formatter.target_chars, 800);
        assert!(!config.formatter.use_pause_markup);
    }

    #[test]
    fn test_config_path() {
        let path = NarrateConfig::config_path();
        assert!(path.ends_with("cli-programs/narrate.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
initial_chunks = 3
target_chars = 400
use_pause_markup = true
max_parenthetical_length = 50
"#;
        let config: NarrateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.initial_chunks, 3);
        assert_eq!(config.formatter.target_chars, 400);
        assert!(config.formatter.use_pause_markup);
        assert_eq!(config.formatter.max_parenthetical_length, 50);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: NarrateConfig = toml::from_str("").unwrap();
        assert_eq!(config, NarrateConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli-programs").join("narrate.toml");

        let mut config = NarrateConfig::default();
        config.formatter.target_chars = 320;
        config.initial_chunks = 1;
        config.save_to(&path).unwrap();

        let loaded = NarrateConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = NarrateConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, NarrateConfig::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narrate.toml");
        fs::write(&path, "target_chars = 0\n").unwrap();
        assert!(NarrateConfig::load_from(&path).is_err());
    }
}
