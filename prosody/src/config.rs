//! Formatter configuration.

use crate::error::{ProsodyError, Result};
use crate::tables::{DEFAULT_BULLET_GLYPHS, TRANSITION_WORDS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default chunk budget in characters.
pub const DEFAULT_TARGET_CHARS: usize = 800;

/// Parentheticals longer than this many characters are dropped.
pub const DEFAULT_MAX_PARENTHETICAL_LENGTH: usize = 100;

/// An extra abbreviation, matched literally and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationEntry {
    pub abbreviation: String,
    pub expansion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProsodyConfig {
    /// Character budget per streaming chunk
    #[serde(default = "default_target_chars")]
    pub target_chars: usize,

    /// Render pauses as `<break>` instructions instead of relying on punctuation
    #[serde(default)]
    pub use_pause_markup: bool,

    /// Parentheticals longer than this are removed
    #[serde(default = "default_max_parenthetical_length")]
    pub max_parenthetical_length: usize,

    /// Glyphs that mark a bulleted list line
    #[serde(default = "default_bullet_glyphs")]
    pub bullet_glyphs: Vec<char>,

    /// Applied after the built-in abbreviation table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_abbreviations: Vec<AbbreviationEntry>,

    /// Replaces the built-in transition word list when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_words: Option<Vec<String>>,

    /// Split sentences longer than the budget at clause boundaries
    #[serde(default)]
    pub split_oversized_sentences: bool,
}

fn default_target_chars() -> usize {
    DEFAULT_TARGET_CHARS
}

fn default_max_parenthetical_length() -> usize {
    DEFAULT_MAX_PARENTHETICAL_LENGTH
}

fn default_bullet_glyphs() -> Vec<char> {
    DEFAULT_BULLET_GLYPHS.to_vec()
}

impl Default for ProsodyConfig {
    fn default() -> Self {
        Self {
            target_chars: default_target_chars(),
            use_pause_markup: false,
            max_parenthetical_length: default_max_parenthetical_length(),
            bullet_glyphs: default_bullet_glyphs(),
            extra_abbreviations: Vec::new(),
            transition_words: None,
            split_oversized_sentences: false,
        }
    }
}

impl ProsodyConfig {
    /// Set the chunk budget.
    pub fn with_target_chars(mut self, target_chars: usize) -> Self {
        self.target_chars = target_chars;
        self
    }

    /// Enable or disable pause markup.
    pub fn with_pause_markup(mut self, enabled: bool) -> Self {
        self.use_pause_markup = enabled;
        self
    }

    /// Set the parenthetical length threshold.
    pub fn with_max_parenthetical_length(mut self, max: usize) -> Self {
        self.max_parenthetical_length = max;
        self
    }

    /// Add an abbreviation on top of the built-in table.
    pub fn with_abbreviation(mut self, abbreviation: &str, expansion: &str) -> Self {
        self.extra_abbreviations.push(AbbreviationEntry {
            abbreviation: abbreviation.to_string(),
            expansion: expansion.to_string(),
        });
        self
    }

    /// Transition words in effect, built-in unless overridden.
    pub fn transition_words(&self) -> Vec<String> {
        match &self.transition_words {
            Some(words) => words.clone(),
            None => TRANSITION_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_chars == 0 {
            return Err(ProsodyError::InvalidConfig(
                "target_chars must be greater than zero".into(),
            ));
        }
        if self.bullet_glyphs.is_empty() {
            return Err(ProsodyError::InvalidConfig(
                "bullet_glyphs must not be empty".into(),
            ));
        }
        if let Some(bad) = self.bullet_glyphs.iter().find(|c| c.is_alphanumeric()) {
            return Err(ProsodyError::InvalidConfig(format!(
                "bullet glyph '{}' is alphanumeric",
                bad
            )));
        }
        if let Some(entry) = self
            .extra_abbreviations
            .iter()
            .find(|e| e.abbreviation.trim().is_empty())
        {
            return Err(ProsodyError::InvalidConfig(format!(
                "abbreviation for '{}' is empty",
                entry.expansion
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProsodyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, returning defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProsodyConfig::default();
        assert_eq!(config.target_chars, 800);
        assert!(!config.use_pause_markup);
        assert_eq!(config.max_parenthetical_length, 100);
        assert!(config.bullet_glyphs.contains(&'•'));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ProsodyConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProsodyConfig::default());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
target_chars = 400
use_pause_markup = true
max_parenthetical_length = 60
bullet_glyphs = ["•", "+"]
transition_words = ["however", "anyway"]

[[extra_abbreviations]]
abbreviation = "k8s"
expansion = "kubernetes"
"#;
        let config = ProsodyConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.target_chars, 400);
        assert!(config.use_pause_markup);
        assert_eq!(config.max_parenthetical_length, 60);
        assert_eq!(config.bullet_glyphs, vec!['•', '+']);
        assert_eq!(config.transition_words(), vec!["however", "anyway"]);
        assert_eq!(config.extra_abbreviations[0].expansion, "kubernetes");
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = ProsodyConfig::from_toml_str("target_chars = 0").unwrap_err();
        assert!(matches!(err, ProsodyError::InvalidConfig(_)));
    }

    #[test]
    fn test_alphanumeric_bullet_rejected() {
        let config = ProsodyConfig {
            bullet_glyphs: vec!['o'],
            ..ProsodyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let config = ProsodyConfig::default()
            .with_target_chars(300)
            .with_pause_markup(true)
            .with_max_parenthetical_length(40)
            .with_abbreviation("PR", "pull request");
        assert_eq!(config.target_chars, 300);
        assert!(config.use_pause_markup);
        assert_eq!(config.max_parenthetical_length, 40);
        assert_eq!(config.extra_abbreviations.len(), 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prosody.toml");
        let config = ProsodyConfig::default().with_target_chars(512);
        config.save_to(&path).unwrap();
        let loaded = ProsodyConfig::load_from(&path).unwrap();
        assert_eq!(loaded.target_chars, 512);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ProsodyConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, ProsodyConfig::default());
    }
}
