//! Tessera configuration
//!
//! Loaded from `tessera.toml`; every section and key is optional.
//!
//! ```toml
//! [transient]
//! default_duration_ms = 1000
//!
//! [icons]
//! glyph_font_class = "material-icons"
//! outlined_font_class = "material-icons-outlined"
//!
//! [icons.scale]
//! small = "1.5em"
//! medium = "2.5em"
//! large = "3.5em"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Root configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TesseraConfig {
    #[serde(default)]
    pub transient: TransientConfig,
    #[serde(default)]
    pub icons: IconConfig,
}

/// Flash feedback settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TransientConfig {
    /// Used when a widget leaves its toggle duration unset
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: i64,
}

fn default_duration_ms() -> i64 {
    1000
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
        }
    }
}

/// Icon rendering settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IconConfig {
    #[serde(default = "default_glyph_font_class")]
    pub glyph_font_class: String,
    /// Font used for unchecked toggle icons
    #[serde(default = "default_outlined_font_class")]
    pub outlined_font_class: String,
    /// Size used when a widget leaves its icon size unset
    #[serde(default)]
    pub default_size: Option<String>,
    #[serde(default)]
    pub scale: IconScale,
}

fn default_glyph_font_class() -> String {
    "material-icons".to_string()
}

fn default_outlined_font_class() -> String {
    "material-icons-outlined".to_string()
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            glyph_font_class: default_glyph_font_class(),
            outlined_font_class: default_outlined_font_class(),
            default_size: None,
            scale: IconScale::default(),
        }
    }
}

/// Text size for the `small`/`medium`/`large` keywords
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IconScale {
    #[serde(default = "default_small")]
    pub small: String,
    #[serde(default = "default_medium")]
    pub medium: String,
    #[serde(default = "default_large")]
    pub large: String,
}

fn default_small() -> String {
    "1.5em".to_string()
}

fn default_medium() -> String {
    "2.5em".to_string()
}

fn default_large() -> String {
    "3.5em".to_string()
}

impl Default for IconScale {
    fn default() -> Self {
        Self {
            small: default_small(),
            medium: default_medium(),
            large: default_large(),
        }
    }
}

impl TesseraConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TesseraConfig::default();
        assert_eq!(config.transient.default_duration_ms, 1000);
        assert_eq!(config.icons.glyph_font_class, "material-icons");
        assert_eq!(config.icons.outlined_font_class, "material-icons-outlined");
        assert_eq!(config.icons.scale.medium, "2.5em");
    }

    #[test]
    fn test_partial_file() {
        let config = TesseraConfig::from_toml_str(
            r#"
            [transient]
            default_duration_ms = 250

            [icons.scale]
            large = "4em"
            "#,
        )
        .unwrap();
        assert_eq!(config.transient.default_duration_ms, 250);
        assert_eq!(config.icons.scale.large, "4em");
        assert_eq!(config.icons.scale.small, "1.5em");
        assert_eq!(config.icons.glyph_font_class, "material-icons");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            TesseraConfig::from_toml_str("").unwrap(),
            TesseraConfig::default()
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = TesseraConfig::from_toml_str("[transient\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TesseraConfig::load("/nonexistent/tessera.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = TesseraConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(TesseraConfig::from_toml_str(&text).unwrap(), config);
    }
}
