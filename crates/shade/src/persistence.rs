//! Best-effort persistence of the selected theme mode.

use crate::mode::ThemeMode;
use crate::storage::KeyValueStore;

/// Key used when the configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Reads and writes one [`ThemeMode`] literal under a fixed key.
///
/// Neither operation fails: unreadable or unrecognized values load as
/// absent, and failed writes are logged and dropped.
pub struct ThemePersistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl ThemePersistence {
    pub fn new(store: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored mode, treating anything unrecognized as absent.
    pub fn load(&self) -> Option<ThemeMode> {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(mode) => Some(mode),
                Err(err) => {
                    tracing::debug!(key = %self.key, %err, "ignoring stored theme");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "failed to read stored theme");
                None
            }
        }
    }

    /// Stores `mode`. Failures are logged, never returned.
    pub fn save(&self, mode: ThemeMode) {
        if let Err(err) = self.store.set(&self.key, mode.as_str()) {
            tracing::warn!(key = %self.key, %mode, %err, "failed to persist theme");
        }
    }

    /// Forgets the stored mode, so the next load falls back to the default.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, %err, "failed to clear stored theme");
        }
    }
}

impl std::fmt::Debug for ThemePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
