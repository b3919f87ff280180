//! # Shade - Theme Mode State
//!
//! `shade` owns an application's theme selection: which of `light`, `dark`,
//! `luxury` or `system` the user picked, what that resolves to given the
//! host's color scheme preference, where the choice is persisted, and how it
//! is reflected onto the document for stylesheets to pick up.
//!
//! ## Core Concepts
//!
//! - [`ThemeMode`]: what the user selects, including the delegating `system`
//! - [`ResolvedTheme`]: what is rendered (`system` resolved to light/dark)
//! - [`ThemeStore`]: the single owner of the current [`ThemeState`]
//! - [`KeyValueStore`]: durable storage the selection is written through to
//! - [`PreferenceSource`]: the host light/dark preference, observable
//! - [`DocumentTarget`]: where the resolved theme class is applied
//!
//! ## Quick Start
//!
//! ```rust
//! use shade::{
//!     ColorMode, Element, MemoryDocument, MemoryStorage, MockPreference, ResolvedTheme,
//!     ThemeConfig, ThemeMode, ThemeStore,
//! };
//!
//! let storage = MemoryStorage::new();
//! let doc = MemoryDocument::new();
//! let store = ThemeStore::builder()
//!     .config(ThemeConfig::luxury_variant())
//!     .storage(storage.clone())
//!     .preference(MockPreference::new(ColorMode::Light))
//!     .document(doc.clone())
//!     .build()
//!     .unwrap();
//!
//! store.toggle_mode();
//! assert_eq!(store.state().resolved, ResolvedTheme::Dark);
//!
//! store.cycle_presented();
//! assert_eq!(store.mode(), ThemeMode::Luxury);
//! assert_eq!(storage.peek("theme").as_deref(), Some("luxury"));
//! assert_eq!(doc.classes(Element::Root), vec!["luxury".to_string()]);
//! ```
//!
//! ## Hosts
//!
//! Desktop hosts use [`FileStorage`] and [`OsPreference`] (backed by the
//! `dark-light` crate); browser hosts enable the `web` feature for
//! `localStorage`, the `prefers-color-scheme` media query and the live DOM.
//! [`MemoryStorage`], [`MockPreference`] and [`MemoryDocument`] serve tests
//! and headless rendering.
//!
//! ## Failure Model
//!
//! Theme switching never fails. Unreadable or unrecognized persisted values
//! load as absent, write failures are logged through `tracing` and dropped,
//! and unrecognized mode names passed to [`ThemeStore::set_mode_named`] are
//! ignored.

pub mod config;
mod detect;
mod error;
pub mod mode;
pub mod persistence;
pub mod preference;
pub mod reflector;
pub mod storage;
pub mod store;
#[cfg(feature = "web")]
pub mod web;

pub use config::{ClassNames, ThemeConfig};
pub use detect::{detect_color_mode, reset_theme_detector, set_theme_detector};
pub use error::{ConfigError, StorageError};
pub use mode::{ColorMode, ParseModeError, ResolvedTheme, ThemeMode, ThemeState};
pub use persistence::{ThemePersistence, DEFAULT_STORAGE_KEY};
pub use preference::{
    MockPreference, OsPreference, PreferenceCallback, PreferenceChannel, PreferenceSource,
    Subscription,
};
pub use reflector::{DocumentTarget, DomReflector, Element, MemoryDocument};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{ThemeStore, ThemeStoreBuilder};
