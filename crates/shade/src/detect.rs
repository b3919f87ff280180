//! Host color mode detection.
//!
//! [`detect_color_mode`] asks the operating system whether the user prefers
//! a light or dark appearance. The detector is process-wide and can be
//! replaced for testing with [`set_theme_detector`]:
//!
//! ```rust
//! use shade::{detect_color_mode, set_theme_detector, ColorMode};
//!
//! set_theme_detector(|| ColorMode::Dark);
//! assert_eq!(detect_color_mode(), ColorMode::Dark);
//! ```

use std::sync::{Mutex, PoisonError};

use dark_light::Mode as OsThemeMode;
use once_cell::sync::Lazy;

use crate::mode::ColorMode;

type ThemeDetector = fn() -> ColorMode;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Overrides the detector used to determine whether the user prefers a light or dark theme.
///
/// Use [`reset_theme_detector`] to go back to querying the OS.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores OS detection after [`set_theme_detector`].
pub fn reset_theme_detector() {
    set_theme_detector(os_theme_detector);
}

/// Detects the user's preferred color mode.
///
/// Uses the `dark-light` crate unless overridden. Hosts that cannot report a
/// preference (or fail to) are treated as light.
pub fn detect_color_mode() -> ColorMode {
    let detector = *THEME_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    detector()
}

fn os_theme_detector() -> ColorMode {
    match dark_light::detect() {
        Ok(OsThemeMode::Dark) => ColorMode::Dark,
        Ok(_) => ColorMode::Light,
        Err(err) => {
            tracing::debug!(error = ?err, "color scheme detection failed, assuming light");
            ColorMode::Light
        }
    }
}
