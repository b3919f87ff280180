//! Theme store configuration.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Call sites that present only part of the mode set declare it here:
//!
//! ```rust
//! use shade::{ThemeConfig, ThemeMode};
//!
//! let config = ThemeConfig::from_yaml(r#"
//! storage_key: admin-theme
//! presented: [light, dark, luxury]
//! reflect_on_body: false
//! classes:
//!   luxury: theme-gold
//! "#).unwrap();
//!
//! assert_eq!(config.presented, vec![ThemeMode::Light, ThemeMode::Dark, ThemeMode::Luxury]);
//! assert_eq!(config.classes.luxury, "theme-gold");
//! assert_eq!(config.classes.dark, "dark");
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mode::{ResolvedTheme, ThemeMode};
use crate::persistence::DEFAULT_STORAGE_KEY;

/// Class names applied for each resolved theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassNames {
    pub light: String,
    pub dark: String,
    pub luxury: String,
}

impl ClassNames {
    pub fn for_theme(&self, theme: ResolvedTheme) -> &str {
        match theme {
            ResolvedTheme::Light => &self.light,
            ResolvedTheme::Dark => &self.dark,
            ResolvedTheme::Luxury => &self.luxury,
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            light: ResolvedTheme::Light.as_str().to_string(),
            dark: ResolvedTheme::Dark.as_str().to_string(),
            luxury: ResolvedTheme::Luxury.as_str().to_string(),
        }
    }
}

/// Configuration for a [`ThemeStore`](crate::ThemeStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key the selected mode is persisted under.
    pub storage_key: String,
    /// Mode used when nothing valid is persisted.
    pub default_mode: ThemeMode,
    /// Modes this call site offers, in cycle order.
    pub presented: Vec<ThemeMode>,
    /// Whether the body element carries the theme class too.
    pub reflect_on_body: bool,
    pub classes: ClassNames,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_mode: ThemeMode::Light,
            presented: ThemeMode::ALL.to_vec(),
            reflect_on_body: true,
            classes: ClassNames::default(),
        }
    }
}

impl ThemeConfig {
    /// Light, dark and luxury, without system following.
    pub fn luxury_variant() -> Self {
        Self {
            presented: vec![ThemeMode::Light, ThemeMode::Dark, ThemeMode::Luxury],
            ..Self::default()
        }
    }

    /// Light, dark and system following.
    pub fn system_variant() -> Self {
        Self {
            presented: vec![ThemeMode::Light, ThemeMode::Dark, ThemeMode::System],
            ..Self::default()
        }
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::invalid("storage_key must not be empty"));
        }

        if self.presented.is_empty() {
            return Err(ConfigError::invalid("presented must list at least one mode"));
        }
        let mut seen = HashSet::new();
        for mode in &self.presented {
            if !seen.insert(mode) {
                return Err(ConfigError::invalid(format!(
                    "presented lists {} more than once",
                    mode
                )));
            }
        }

        let mut names = HashSet::new();
        for theme in ResolvedTheme::ALL {
            let name = self.classes.for_theme(theme);
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid(format!(
                    "class name for {} must be a single non-empty token, got {:?}",
                    theme, name
                )));
            }
            if !names.insert(name) {
                return Err(ConfigError::invalid(format!(
                    "class name {:?} is used for more than one theme",
                    name
                )));
            }
        }

        Ok(())
    }
}
