use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_TARGET: &str = "lrcview::config";

/// Main configuration structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcViewConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Parser behavior. The defaults give the strict word-level format, which
/// keeps timed lines only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Keep lines without a leading time tag in `LrcDocument::untimed`
    #[serde(default)]
    pub preserve_untimed_lines: bool,
    /// Keep info tags such as `[ar:Artist]` in `LrcDocument::metadata`
    #[serde(default)]
    pub preserve_metadata: bool,
    /// Whitespace trimming applied to preserved untimed lines
    #[serde(default)]
    pub trim: TrimConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimConfig {
    #[serde(default)]
    pub start: bool,
    #[serde(default)]
    pub end: bool,
}

impl TrimConfig {
    /// Trim `text` according to the enabled sides
    #[must_use]
    pub fn apply(self, text: &str) -> &str {
        match (self.start, self.end) {
            (true, true) => text.trim(),
            (true, false) => text.trim_start(),
            (false, true) => text.trim_end(),
            (false, false) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Resolve and highlight the active word in addition to the active line
    #[serde(default = "default_true")]
    pub word_level: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            word_level: default_true(),
        }
    }
}

impl LrcViewConfig {
    /// Get the config file path (~/.config/lrcview/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Parse config from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML for this structure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(target: LOG_TARGET, "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from the default location, falling back to defaults when
    /// no file exists there
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            debug!(
                target: LOG_TARGET,
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load(&config_path)
    }
}

/// Commented config file matching the defaults
pub const CONFIG_TEMPLATE: &str = r#"# lrcview Configuration
# ~/.config/lrcview/config.toml

[parser]
# Keep lines that have no leading [mm:ss] tag instead of dropping them
preserve_untimed_lines = false
# Keep info tags such as [ar:Artist] and [ti:Title]
preserve_metadata = false

[parser.trim]
# Whitespace trimming for preserved untimed lines
start = false
end = false

[tracker]
# Highlight the active word as well as the active line
word_level = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_template_matches_defaults() {
        let config = LrcViewConfig::from_toml_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, LrcViewConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LrcViewConfig::from_toml_str("").unwrap();
        assert!(!config.parser.preserve_untimed_lines);
        assert!(!config.parser.preserve_metadata);
        assert!(config.tracker.word_level);
    }

    #[test]
    fn test_partial_config() {
        let config = LrcViewConfig::from_toml_str(
            r"
[parser]
preserve_metadata = true

[tracker]
word_level = false
",
        )
        .unwrap();
        assert!(config.parser.preserve_metadata);
        assert!(!config.parser.preserve_untimed_lines);
        assert!(!config.tracker.word_level);
    }

    #[test]
    fn test_invalid_config() {
        let result = LrcViewConfig::from_toml_str("[parser]\npreserve_metadata = \"yes\"");
        assert!(matches!(result, Err(CoreError::ConfigParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lrcview-config-{}.toml", std::process::id()));
        fs::write(&path, "[parser.trim]\nstart = true\n").unwrap();
        let config = LrcViewConfig::load(&path);
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert!(config.parser.trim.start);
        assert!(!config.parser.trim.end);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("lrcview-config-does-not-exist.toml");
        let result = LrcViewConfig::load(&path);
        assert!(matches!(result, Err(CoreError::IoError(_))));
    }

    #[test]
    fn test_trim_apply() {
        let text = "  words  ";
        assert_eq!(TrimConfig::default().apply(text), "  words  ");
        assert_eq!(TrimConfig { start: true, end: false }.apply(text), "words  ");
        assert_eq!(TrimConfig { start: false, end: true }.apply(text), "  words");
        assert_eq!(TrimConfig { start: true, end: true }.apply(text), "words");
    }
}
