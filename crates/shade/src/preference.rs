//! Host light/dark preference observation.
//!
//! A [`PreferenceSource`] reports the current [`ColorMode`] and notifies
//! subscribers when it changes. Every source in this crate is backed by a
//! [`PreferenceChannel`], which only publishes actual changes.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use shade::{ColorMode, MockPreference, PreferenceSource};
//!
//! let pref = MockPreference::new(ColorMode::Light);
//! let seen = Rc::new(Cell::new(0));
//!
//! let counter = seen.clone();
//! let mut sub = pref.subscribe(Rc::new(move |_: ColorMode| counter.set(counter.get() + 1)));
//!
//! pref.set(ColorMode::Dark);
//! pref.set(ColorMode::Dark); // no change, no notification
//! sub.unsubscribe();
//! pref.set(ColorMode::Light);
//!
//! assert_eq!(seen.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::detect::detect_color_mode;
use crate::mode::ColorMode;

/// Callback invoked with the new preference.
pub type PreferenceCallback = Rc<dyn Fn(ColorMode)>;

/// Abstraction over the host's color scheme preference.
pub trait PreferenceSource {
    /// Reads the preference now.
    fn current(&self) -> ColorMode;

    /// Registers `callback` for future changes.
    ///
    /// Notifications continue until [`Subscription::unsubscribe`] is called.
    fn subscribe(&self, callback: PreferenceCallback) -> Subscription;
}

impl<T: PreferenceSource + ?Sized> PreferenceSource for Rc<T> {
    fn current(&self) -> ColorMode {
        (**self).current()
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        (**self).subscribe(callback)
    }
}

/// Handle returned by [`PreferenceSource::subscribe`].
///
/// Dropping a subscription does not stop notifications; call
/// [`unsubscribe`](Self::unsubscribe), which may be called any number of times.
#[must_use = "notifications continue until `unsubscribe` is called"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// Stops notifications. Later calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(dispose) = self.disposer.take() {
            dispose();
        }
    }

    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct Listener {
    id: u64,
    callback: PreferenceCallback,
}

#[derive(Default)]
struct ChannelInner {
    next_id: u64,
    listeners: Vec<Listener>,
    last: Option<ColorMode>,
}

/// Listener registry shared by preference sources.
///
/// Clones share listeners. [`publish`](Self::publish) notifies only when the
/// value differs from the previously published one.
#[derive(Clone, Default)]
pub struct PreferenceChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

impl PreferenceChannel {
    /// Creates a channel whose last known value is `initial`.
    pub fn new(initial: ColorMode) -> Self {
        let channel = Self::default();
        channel.inner.borrow_mut().last = Some(initial);
        channel
    }

    pub fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push(Listener { id, callback });
            id
        };

        let weak: Weak<RefCell<ChannelInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }

    /// Publishes `mode` if it differs from the last value. Returns whether
    /// listeners were notified.
    ///
    /// Listeners may subscribe or unsubscribe from inside their callback. A
    /// listener removed mid-publish is skipped.
    pub fn publish(&self, mode: ColorMode) -> bool {
        let pending: Vec<(u64, PreferenceCallback)> = {
            let mut inner = self.inner.borrow_mut();
            if inner.last == Some(mode) {
                return false;
            }
            inner.last = Some(mode);
            inner
                .listeners
                .iter()
                .map(|l| (l.id, Rc::clone(&l.callback)))
                .collect()
        };

        for (id, callback) in pending {
            let still_registered = self.inner.borrow().listeners.iter().any(|l| l.id == id);
            if still_registered {
                callback(mode);
            }
        }
        true
    }

    pub fn last(&self) -> Option<ColorMode> {
        self.inner.borrow().last
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl fmt::Debug for PreferenceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PreferenceChannel")
            .field("last", &inner.last)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Preference read from the operating system via [`detect_color_mode`].
///
/// The OS is not watched in the background. Hosts call
/// [`refresh`](Self::refresh) from their event loop (window focus, a timer,
/// a settings-changed message) and subscribers hear about real changes.
#[derive(Debug, Clone)]
pub struct OsPreference {
    channel: PreferenceChannel,
}

impl OsPreference {
    pub fn new() -> Self {
        Self {
            channel: PreferenceChannel::new(detect_color_mode()),
        }
    }

    /// Re-reads the OS preference and notifies subscribers if it changed.
    pub fn refresh(&self) -> bool {
        self.sync(detect_color_mode())
    }

    fn sync(&self, detected: ColorMode) -> bool {
        let changed = self.channel.publish(detected);
        if changed {
            tracing::debug!(preference = ?detected, "os color scheme changed");
        }
        changed
    }
}

impl Default for OsPreference {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceSource for OsPreference {
    /// Reads the OS preference. A change seen here is published like one
    /// seen by [`refresh`](OsPreference::refresh).
    fn current(&self) -> ColorMode {
        let detected = detect_color_mode();
        self.sync(detected);
        detected
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        self.channel.subscribe(callback)
    }
}

/// Settable preference for tests and headless hosts. Clones share state.
#[derive(Debug, Clone)]
pub struct MockPreference {
    current: Rc<Cell<ColorMode>>,
    channel: PreferenceChannel,
}

impl MockPreference {
    pub fn new(initial: ColorMode) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
            channel: PreferenceChannel::new(initial),
        }
    }

    /// Changes the simulated preference, notifying subscribers on change.
    pub fn set(&self, mode: ColorMode) {
        self.current.set(mode);
        self.channel.publish(mode);
    }

    pub fn subscriber_count(&self) -> usize {
        self.channel.listener_count()
    }
}

impl PreferenceSource for MockPreference {
    fn current(&self) -> ColorMode {
        self.current.get()
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        self.channel.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{reset_theme_detector, set_theme_detector};
    use serial_test::serial;

    fn recorder() -> (Rc<RefCell<Vec<ColorMode>>>, PreferenceCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, Rc::new(move |mode: ColorMode| sink.borrow_mut().push(mode)))
    }

    #[test]
    fn publishes_only_changes() {
        let pref = MockPreference::new(ColorMode::Light);
        let (log, callback) = recorder();
        let _sub = pref.subscribe(callback);

        pref.set(ColorMode::Light);
        pref.set(ColorMode::Dark);
        pref.set(ColorMode::Dark);
        pref.set(ColorMode::Light);

        assert_eq!(*log.borrow(), vec![ColorMode::Dark, ColorMode::Light]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let pref = MockPreference::new(ColorMode::Light);
        let (log, callback) = recorder();
        let mut sub = pref.subscribe(callback);
        assert!(sub.is_active());

        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(pref.subscriber_count(), 0);

        pref.set(ColorMode::Dark);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn subscriptions_are_independent() {
        let pref = MockPreference::new(ColorMode::Light);
        let (first_log, first) = recorder();
        let (second_log, second) = recorder();
        let mut first_sub = pref.subscribe(first);
        let _second_sub = pref.subscribe(second);

        pref.set(ColorMode::Dark);
        first_sub.unsubscribe();
        pref.set(ColorMode::Light);

        assert_eq!(*first_log.borrow(), vec![ColorMode::Dark]);
        assert_eq!(
            *second_log.borrow(),
            vec![ColorMode::Dark, ColorMode::Light]
        );
    }

    #[test]
    fn dropping_subscription_keeps_listening() {
        let pref = MockPreference::new(ColorMode::Light);
        let (log, callback) = recorder();
        drop(pref.subscribe(callback));

        pref.set(ColorMode::Dark);
        assert_eq!(*log.borrow(), vec![ColorMode::Dark]);
    }

    #[test]
    fn listener_can_unsubscribe_another_mid_publish() {
        let channel = PreferenceChannel::new(ColorMode::Light);
        let (log, callback) = recorder();

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&victim);
        let _killer = channel.subscribe(Rc::new(move |_: ColorMode| {
            if let Some(mut sub) = slot.borrow_mut().take() {
                sub.unsubscribe();
            }
        }));
        *victim.borrow_mut() = Some(channel.subscribe(callback));

        assert!(channel.publish(ColorMode::Dark));
        assert!(log.borrow().is_empty());
        assert_eq!(channel.listener_count(), 1);
    }

    #[test]
    fn listener_can_unsubscribe_itself() {
        let channel = PreferenceChannel::new(ColorMode::Light);
        let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&own);
        let sub = channel.subscribe(Rc::new(move |_: ColorMode| {
            if let Some(mut sub) = slot.borrow_mut().take() {
                sub.unsubscribe();
            }
        }));
        *own.borrow_mut() = Some(sub);

        channel.publish(ColorMode::Dark);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn disposer_outliving_channel_is_harmless() {
        let mut sub = {
            let channel = PreferenceChannel::new(ColorMode::Light);
            channel.subscribe(Rc::new(|_: ColorMode| {}))
        };
        sub.unsubscribe();
    }

    #[test]
    #[serial]
    fn os_preference_refresh_publishes_changes() {
        set_theme_detector(|| ColorMode::Light);
        let pref = OsPreference::new();
        let (log, callback) = recorder();
        let _sub = pref.subscribe(callback);

        assert!(!pref.refresh());
        set_theme_detector(|| ColorMode::Dark);
        assert!(pref.refresh());
        assert!(!pref.refresh());

        assert_eq!(*log.borrow(), vec![ColorMode::Dark]);
        reset_theme_detector();
    }

    #[test]
    #[serial]
    fn os_preference_current_publishes_changes() {
        set_theme_detector(|| ColorMode::Light);
        let pref = OsPreference::new();
        let (log, callback) = recorder();
        let _sub = pref.subscribe(callback);

        set_theme_detector(|| ColorMode::Dark);
        assert_eq!(pref.current(), ColorMode::Dark);
        assert_eq!(*log.borrow(), vec![ColorMode::Dark]);

        // Already seen through current(), so nothing left to publish.
        assert!(!pref.refresh());

        set_theme_detector(|| ColorMode::Light);
        assert!(pref.refresh());
        assert_eq!(*log.borrow(), vec![ColorMode::Dark, ColorMode::Light]);
        reset_theme_detector();
    }
}
