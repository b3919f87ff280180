//! The theme state store.
//!
//! [`ThemeStore`] owns the canonical [`ThemeState`]. It is constructed once
//! at application bootstrap and handed (cloned) to every consumer; all
//! clones share one state.
//!
//! ```text
//! persistence ──load──► ThemeStore ──apply──► DomReflector
//!      ▲                  │    ▲
//!      └──────save────────┘    └── preference changes (only while `system`)
//! ```
//!
//! While the mode is [`ThemeMode::System`] the store holds a subscription to
//! its [`PreferenceSource`]; leaving `system` releases it, and so does
//! dropping the last store handle.
//!
//! ```rust
//! use shade::{ColorMode, Element, MemoryDocument, MemoryStorage, MockPreference, ThemeMode, ThemeStore};
//!
//! let pref = MockPreference::new(ColorMode::Light);
//! let doc = MemoryDocument::new();
//! let store = ThemeStore::builder()
//!     .storage(MemoryStorage::new())
//!     .preference(pref.clone())
//!     .document(doc.clone())
//!     .build()
//!     .unwrap();
//!
//! store.set_mode(ThemeMode::System);
//! pref.set(ColorMode::Dark);
//!
//! assert_eq!(store.state().mode, ThemeMode::System);
//! assert_eq!(doc.classes(Element::Root), vec!["dark".to_string()]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::ThemeConfig;
use crate::error::ConfigError;
use crate::mode::{ColorMode, ResolvedTheme, ThemeMode, ThemeState};
use crate::persistence::ThemePersistence;
use crate::preference::{OsPreference, PreferenceSource, Subscription};
use crate::reflector::{DocumentTarget, DomReflector, MemoryDocument};
use crate::storage::{KeyValueStore, MemoryStorage};

struct StoreInner {
    state: ThemeState,
    config: ThemeConfig,
    persistence: ThemePersistence,
    preference: Box<dyn PreferenceSource>,
    reflector: DomReflector,
    subscription: Option<Subscription>,
}

impl StoreInner {
    fn on_preference_change(&mut self, preference: ColorMode) {
        if self.state.mode != ThemeMode::System {
            return;
        }
        self.state.resolved = ResolvedTheme::from(preference);
        tracing::debug!(resolved = %self.state.resolved, "following system color scheme");
        self.reflector.apply(self.state.resolved);
    }

    fn release_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("stopped tracking system color scheme");
        }
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        self.release_subscription();
    }
}

/// Handle to the process-wide theme state.
///
/// Cloning is cheap; clones share state. The store is single-threaded and
/// every operation settles completely (persist, resolve, reflect) before it
/// returns.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl ThemeStore {
    pub fn builder() -> ThemeStoreBuilder {
        ThemeStoreBuilder::default()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> ThemeState {
        self.inner.borrow().state
    }

    pub fn mode(&self) -> ThemeMode {
        self.state().mode
    }

    pub fn resolved(&self) -> ResolvedTheme {
        self.state().resolved
    }

    /// Modes the configured call site offers, in cycle order.
    pub fn presented(&self) -> Vec<ThemeMode> {
        self.inner.borrow().config.presented.clone()
    }

    /// Whether the store is currently subscribed to preference changes.
    pub fn is_tracking_system(&self) -> bool {
        self.inner
            .borrow()
            .subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Selects `mode`, persists it, and reflects the result.
    pub fn set_mode(&self, mode: ThemeMode) {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.state.mode;

        let preference = inner.preference.current();
        inner.state = ThemeState::new(mode, preference);
        inner.persistence.save(mode);
        inner.reflector.apply(inner.state.resolved);

        if mode == ThemeMode::System {
            if inner.subscription.is_none() {
                let subscription = self.track_system(&inner);
                inner.subscription = Some(subscription);
                tracing::debug!("tracking system color scheme");
            }
        } else {
            inner.release_subscription();
        }

        tracing::debug!(from = %previous, to = %mode, resolved = %inner.state.resolved, "theme mode set");
    }

    /// Selects the mode named by `literal`. Unrecognized names are ignored.
    pub fn set_mode_named(&self, literal: &str) {
        match literal.parse() {
            Ok(mode) => self.set_mode(mode),
            Err(err) => tracing::debug!(%err, "ignoring theme selection"),
        }
    }

    /// Flips between light and dark.
    ///
    /// From `system` this pins the opposite of the current host preference.
    /// From `luxury` it goes to `light`.
    pub fn toggle_mode(&self) {
        let next = {
            let inner = self.inner.borrow();
            match inner.state.mode {
                ThemeMode::Light => ThemeMode::Dark,
                ThemeMode::Dark | ThemeMode::Luxury => ThemeMode::Light,
                ThemeMode::System => match inner.preference.current().opposite() {
                    ColorMode::Light => ThemeMode::Light,
                    ColorMode::Dark => ThemeMode::Dark,
                },
            }
        };
        self.set_mode(next);
    }

    /// Advances to the entry after the current mode in `sequence`, wrapping.
    ///
    /// If the current mode is not in `sequence`, selects its first entry. An
    /// empty sequence does nothing.
    pub fn cycle_mode(&self, sequence: &[ThemeMode]) {
        let Some(&first) = sequence.first() else {
            return;
        };
        let current = self.mode();
        let next = sequence
            .iter()
            .position(|&m| m == current)
            .map_or(first, |i| sequence[(i + 1) % sequence.len()]);
        self.set_mode(next);
    }

    /// [`cycle_mode`](Self::cycle_mode) over the configured presented modes.
    pub fn cycle_presented(&self) {
        let presented = self.presented();
        self.cycle_mode(&presented);
    }

    fn track_system(&self, inner: &StoreInner) -> Subscription {
        let weak: Weak<RefCell<StoreInner>> = Rc::downgrade(&self.inner);
        inner
            .preference
            .subscribe(Rc::new(move |preference: ColorMode| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match inner.try_borrow_mut() {
                    Ok(mut inner) => inner.on_preference_change(preference),
                    // The store is mid-operation and reads the preference itself.
                    Err(_) => {
                        tracing::debug!(?preference, "preference change during theme update skipped");
                    }
                };
            }))
    }

    fn initialize(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.reflector.apply(inner.state.resolved);

        if inner.state.mode == ThemeMode::System {
            let subscription = self.track_system(&inner);
            inner.subscription = Some(subscription);
        }

        tracing::debug!(mode = %inner.state.mode, resolved = %inner.state.resolved, "theme store initialized");
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("ThemeStore")
                .field("state", &inner.state)
                .field("tracking_system", &inner.subscription.is_some())
                .finish(),
            Err(_) => f.debug_struct("ThemeStore").finish_non_exhaustive(),
        }
    }
}

/// Builder for [`ThemeStore`].
///
/// Unset collaborators default to in-memory storage, the OS preference and
/// an in-memory document.
#[derive(Default)]
pub struct ThemeStoreBuilder {
    config: Option<ThemeConfig>,
    storage: Option<Box<dyn KeyValueStore>>,
    preference: Option<Box<dyn PreferenceSource>>,
    document: Option<Box<dyn DocumentTarget>>,
}

impl ThemeStoreBuilder {
    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn preference(mut self, preference: impl PreferenceSource + 'static) -> Self {
        self.preference = Some(Box::new(preference));
        self
    }

    pub fn document(mut self, document: impl DocumentTarget + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    /// Validates the configuration, loads the persisted mode, and applies it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn build(self) -> Result<ThemeStore, ConfigError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemoryStorage::new()));
        let preference = self
            .preference
            .unwrap_or_else(|| Box::new(OsPreference::new()));
        let document = self
            .document
            .unwrap_or_else(|| Box::new(MemoryDocument::new()));

        let persistence = ThemePersistence::new(storage, config.storage_key.clone());
        let reflector = DomReflector::new(document, config.classes.clone(), config.reflect_on_body);
        let mode = persistence.load().unwrap_or(config.default_mode);
        let initial = ThemeState::new(mode, preference.current());

        let store = ThemeStore {
            inner: Rc::new(RefCell::new(StoreInner {
                state: initial,
                config,
                persistence,
                preference,
                reflector,
                subscription: None,
            })),
        };
        store.initialize();
        Ok(store)
    }
}

impl fmt::Debug for ThemeStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStoreBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
