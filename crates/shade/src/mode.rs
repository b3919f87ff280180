//! Theme mode types.
//!
//! [`ThemeMode`] is what the user selects, [`ResolvedTheme`] is what gets
//! rendered. The two differ only for [`ThemeMode::System`], which delegates
//! to the host's [`ColorMode`] preference.
//!
//! ```rust
//! use shade::{ColorMode, ResolvedTheme, ThemeMode};
//!
//! let mode: ThemeMode = "system".parse().unwrap();
//! assert_eq!(mode.resolve(ColorMode::Dark), ResolvedTheme::Dark);
//! assert_eq!(ThemeMode::Luxury.resolve(ColorMode::Dark), ResolvedTheme::Luxury);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The user's preferred color mode, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    /// The other color mode.
    pub fn opposite(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }
}

/// A selectable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// The non-standard luxury variant.
    Luxury,
    /// Follow the host's light/dark preference.
    System,
}

impl ThemeMode {
    /// Every mode, in canonical order.
    pub const ALL: [ThemeMode; 4] = [
        ThemeMode::Light,
        ThemeMode::Dark,
        ThemeMode::Luxury,
        ThemeMode::System,
    ];

    /// The literal used for persistence and parsing.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Luxury => "luxury",
            ThemeMode::System => "system",
        }
    }

    /// Resolves this mode against the host preference.
    pub fn resolve(self, preference: ColorMode) -> ResolvedTheme {
        match self {
            ThemeMode::Light => ResolvedTheme::Light,
            ThemeMode::Dark => ResolvedTheme::Dark,
            ThemeMode::Luxury => ResolvedTheme::Luxury,
            ThemeMode::System => preference.into(),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four mode literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "luxury" => Ok(ThemeMode::Luxury),
            "system" => Ok(ThemeMode::System),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// The concrete theme applied to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    Light,
    Dark,
    Luxury,
}

impl ResolvedTheme {
    pub const ALL: [ResolvedTheme; 3] = [
        ResolvedTheme::Light,
        ResolvedTheme::Dark,
        ResolvedTheme::Luxury,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
            ResolvedTheme::Luxury => "luxury",
        }
    }
}

impl From<ColorMode> for ResolvedTheme {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => ResolvedTheme::Light,
            ColorMode::Dark => ResolvedTheme::Dark,
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the store's state.
///
/// `resolved` is always consistent with `mode` and the last host preference
/// the store observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub resolved: ResolvedTheme,
}

impl ThemeState {
    pub(crate) fn new(mode: ThemeMode, preference: ColorMode) -> Self {
        Self {
            mode,
            resolved: mode.resolve(preference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exact_literals() {
        for mode in ThemeMode::ALL {
            assert_eq!(mode.as_str().parse::<ThemeMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_parse_rejects_other_strings() {
        for input in ["", "Dark", "LIGHT", " light", "auto", "sepia"] {
            let err = input.parse::<ThemeMode>().unwrap_err();
            assert_eq!(err, ParseModeError(input.to_string()));
        }
    }

    #[test]
    fn test_system_resolves_to_preference() {
        assert_eq!(
            ThemeMode::System.resolve(ColorMode::Light),
            ResolvedTheme::Light
        );
        assert_eq!(
            ThemeMode::System.resolve(ColorMode::Dark),
            ResolvedTheme::Dark
        );
    }

    #[test]
    fn test_concrete_modes_ignore_preference() {
        for pref in [ColorMode::Light, ColorMode::Dark] {
            assert_eq!(ThemeMode::Light.resolve(pref), ResolvedTheme::Light);
            assert_eq!(ThemeMode::Dark.resolve(pref), ResolvedTheme::Dark);
            assert_eq!(ThemeMode::Luxury.resolve(pref), ResolvedTheme::Luxury);
        }
    }

    #[test]
    fn test_serde_uses_literals() {
        let json = serde_json::to_string(&ThemeMode::Luxury).unwrap();
        assert_eq!(json, "\"luxury\"");
        let mode: ThemeMode = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(mode, ThemeMode::System);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(ColorMode::Light.opposite(), ColorMode::Dark);
        assert_eq!(ColorMode::Dark.opposite(), ColorMode::Light);
    }
}
