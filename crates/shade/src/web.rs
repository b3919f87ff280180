//! Browser bindings (feature `web`).
//!
//! Connects the store to the real browser environment:
//!
//! - [`LocalStorage`]: the per-origin `window.localStorage`.
//! - [`MediaQueryPreference`]: the `(prefers-color-scheme: dark)` media query.
//! - [`WebDocument`]: class lists of `<html>` and `<body>`.
//!
//! ```rust,ignore
//! use shade::web::{LocalStorage, MediaQueryPreference, WebDocument};
//! use shade::{ThemeConfig, ThemeStore};
//!
//! let store = ThemeStore::builder()
//!     .config(ThemeConfig::luxury_variant())
//!     .storage(LocalStorage::new()?)
//!     .preference(MediaQueryPreference::new()?)
//!     .document(WebDocument::new()?)
//!     .build()?;
//! ```

use std::fmt;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, MediaQueryList, MediaQueryListEvent, Storage, Window};

use crate::error::StorageError;
use crate::mode::ColorMode;
use crate::preference::{PreferenceCallback, PreferenceChannel, PreferenceSource, Subscription};
use crate::reflector::{DocumentTarget, Element};
use crate::storage::KeyValueStore;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn window() -> Result<Window, StorageError> {
    web_sys::window().ok_or_else(|| StorageError::Unavailable("no global window".to_string()))
}

fn describe(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Fails when storage is disabled (private browsing, sandboxed iframes).
    pub fn new() -> Result<Self, StorageError> {
        let storage = window()?
            .local_storage()
            .map_err(|err| StorageError::Unavailable(describe(err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Rejected(describe(err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(describe(err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StorageError::Rejected(describe(err)))
    }
}

/// Preference backed by the `prefers-color-scheme` media query.
///
/// Registers one `change` listener on construction and removes it on drop.
pub struct MediaQueryPreference {
    query: MediaQueryList,
    channel: PreferenceChannel,
    on_change: Closure<dyn FnMut(MediaQueryListEvent)>,
}

impl MediaQueryPreference {
    pub fn new() -> Result<Self, StorageError> {
        let query = window()?
            .match_media(DARK_SCHEME_QUERY)
            .map_err(|err| StorageError::Rejected(describe(err)))?
            .ok_or_else(|| StorageError::Unavailable("matchMedia is not supported".to_string()))?;

        let channel = PreferenceChannel::new(scheme(query.matches()));
        let publisher = channel.clone();
        let on_change = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
            move |event: MediaQueryListEvent| {
                publisher.publish(scheme(event.matches()));
            },
        );
        query
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|err| StorageError::Rejected(describe(err)))?;

        Ok(Self {
            query,
            channel,
            on_change,
        })
    }
}

fn scheme(prefers_dark: bool) -> ColorMode {
    if prefers_dark {
        ColorMode::Dark
    } else {
        ColorMode::Light
    }
}

impl PreferenceSource for MediaQueryPreference {
    fn current(&self) -> ColorMode {
        scheme(self.query.matches())
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        self.channel.subscribe(callback)
    }
}

impl Drop for MediaQueryPreference {
    fn drop(&mut self) {
        if let Err(err) = self
            .query
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %describe(err), "failed to remove color scheme listener");
        }
    }
}

impl fmt::Debug for MediaQueryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaQueryPreference")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

/// The current page's document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new() -> Result<Self, StorageError> {
        let document = window()?
            .document()
            .ok_or_else(|| StorageError::Unavailable("window has no document".to_string()))?;
        Ok(Self { document })
    }

    fn element(&self, element: Element) -> Option<web_sys::Element> {
        match element {
            Element::Root => self.document.document_element(),
            Element::Body => self.document.body().map(Into::into),
        }
    }
}

impl DocumentTarget for WebDocument {
    fn add_class(&self, element: Element, class: &str) {
        if let Some(el) = self.element(element) {
            if let Err(err) = el.class_list().add_1(class) {
                tracing::warn!(?element, class, error = %describe(err), "failed to add theme class");
            }
        }
    }

    fn remove_class(&self, element: Element, class: &str) {
        if let Some(el) = self.element(element) {
            if let Err(err) = el.class_list().remove_1(class) {
                tracing::warn!(?element, class, error = %describe(err), "failed to remove theme class");
            }
        }
    }
}
