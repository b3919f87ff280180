//! Property tests: arbitrary sequences of user actions and host preference
//! changes never leave the store inconsistent.

use proptest::prelude::*;
use shade::{
    ColorMode, Element, MemoryDocument, MemoryStorage, MockPreference, ThemeMode, ThemeStore,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Action {
    Set(ThemeMode),
    SetNamed(String),
    Toggle,
    Cycle(Vec<ThemeMode>),
    Os(ColorMode),
}

fn theme_mode() -> impl Strategy<Value = ThemeMode> {
    prop_oneof![
        Just(ThemeMode::Light),
        Just(ThemeMode::Dark),
        Just(ThemeMode::Luxury),
        Just(ThemeMode::System),
    ]
}

fn color_mode() -> impl Strategy<Value = ColorMode> {
    prop_oneof![Just(ColorMode::Light), Just(ColorMode::Dark)]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        theme_mode().prop_map(Action::Set),
        "[a-z]{0,8}".prop_map(Action::SetNamed),
        Just(Action::Toggle),
        prop::collection::vec(theme_mode(), 0..5).prop_map(Action::Cycle),
        color_mode().prop_map(Action::Os),
    ]
}

fn harness(os: ColorMode) -> (ThemeStore, MemoryStorage, MockPreference, MemoryDocument) {
    let storage = MemoryStorage::new();
    let pref = MockPreference::new(os);
    let doc = MemoryDocument::new();
    let store = ThemeStore::builder()
        .storage(storage.clone())
        .preference(pref.clone())
        .document(doc.clone())
        .build()
        .unwrap();
    (store, storage, pref, doc)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any selection reads back exactly and is persisted as its literal.
    #[test]
    fn set_mode_then_state_returns_it(os in color_mode(), mode in theme_mode()) {
        let (store, storage, _pref, _doc) = harness(os);
        store.set_mode(mode);
        prop_assert_eq!(store.state().mode, mode);
        prop_assert_eq!(storage.peek("theme"), Some(mode.as_str().to_string()));
    }

    /// After every step, resolved, document, subscription and storage agree
    /// with the mode and the last host preference.
    #[test]
    fn state_stays_consistent(
        os in color_mode(),
        actions in prop::collection::vec(action(), 0..40),
    ) {
        let (store, storage, pref, doc) = harness(os);
        let mut os = os;

        for action in actions {
            match action {
                Action::Set(mode) => store.set_mode(mode),
                Action::SetNamed(name) => store.set_mode_named(&name),
                Action::Toggle => store.toggle_mode(),
                Action::Cycle(seq) => store.cycle_mode(&seq),
                Action::Os(next) => {
                    os = next;
                    pref.set(next);
                }
            }

            let state = store.state();
            prop_assert_eq!(state.resolved, state.mode.resolve(os));
            prop_assert_eq!(
                doc.classes(Element::Root),
                vec![state.resolved.as_str().to_string()]
            );
            prop_assert_eq!(
                store.is_tracking_system(),
                state.mode == ThemeMode::System
            );
            prop_assert_eq!(
                pref.subscriber_count(),
                usize::from(state.mode == ThemeMode::System)
            );
            if let Some(saved) = storage.peek("theme") {
                prop_assert_eq!(saved, state.mode.as_str().to_string());
            }
        }
    }

    #[test]
    fn toggle_never_lands_on_system(os in color_mode(), start in theme_mode()) {
        let (store, _storage, _pref, _doc) = harness(os);
        store.set_mode(start);
        store.toggle_mode();
        let mode = store.mode();
        prop_assert!(mode == ThemeMode::Light || mode == ThemeMode::Dark);
        if start == ThemeMode::System {
            prop_assert_ne!(store.resolved(), start.resolve(os));
        }
    }

    /// Cycling len(seq) times from anywhere visits each entry once.
    #[test]
    fn cycle_visits_every_entry(
        start in theme_mode(),
        seq in prop::sample::subsequence(ThemeMode::ALL.to_vec(), 1..=4),
    ) {
        let (store, _storage, _pref, _doc) = harness(ColorMode::Light);
        store.set_mode(start);

        let mut visited = Vec::new();
        for _ in 0..seq.len() {
            store.cycle_mode(&seq);
            visited.push(store.mode());
        }
        visited.sort_by_key(|m| m.as_str());
        let mut expected = seq.clone();
        expected.sort_by_key(|m| m.as_str());
        prop_assert_eq!(visited, expected);
    }
}
