use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::document::MemoryDocument;
use crate::store::MemoryStore;

const KEY: &str = "v2ray-theme";

// =============================================================
// Helpers
// =============================================================

fn controller(store: &MemoryStore, doc: &MemoryDocument) -> ThemeController {
    controller_with(ThemeConfig::default(), store, doc)
}

fn controller_with(config: ThemeConfig, store: &MemoryStore, doc: &MemoryDocument) -> ThemeController {
    ThemeController::new(config, Box::new(store.clone()), Box::new(doc.clone()))
}

fn initialized(store: &MemoryStore, doc: &MemoryDocument) -> ThemeController {
    let mut ctl = controller(store, doc);
    ctl.initialize(Box::new(|| {}));
    ctl
}

fn applied(doc: &MemoryDocument) -> Option<String> {
    doc.root_attribute("data-theme")
}

// =============================================================
// Construction and initialize
// =============================================================

#[test]
fn new_defaults_to_light_without_touching_document() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let ctl = controller(&store, &doc);
    assert_eq!(ctl.current_theme(), Theme::Light);
    assert!(!ctl.is_initialized());
    assert_eq!(applied(&doc), None);
    assert!(doc.elements().is_empty());
}

#[test]
fn initialize_without_stored_value_applies_and_persists_light() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let ctl = initialized(&store, &doc);

    assert_eq!(ctl.current_theme(), Theme::Light);
    assert_eq!(applied(&doc).as_deref(), Some("light"));
    assert_eq!(store.entry(KEY).as_deref(), Some("light"));
    assert_eq!(ctl.icon(), Icon::Moon);
    assert_eq!(doc.class_of("theme-icon").as_deref(), Some("fas fa-moon"));
}

#[test]
fn initialize_with_stored_dark_applies_dark_immediately() {
    let store = MemoryStore::with_entry(KEY, "dark");
    let doc = MemoryDocument::new();
    let ctl = initialized(&store, &doc);

    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert_eq!(doc.class_of("theme-icon").as_deref(), Some("fas fa-sun"));
}

#[test]
fn initialize_normalizes_garbage_stored_value() {
    let store = MemoryStore::with_entry(KEY, "purple");
    let doc = MemoryDocument::new();
    let ctl = initialized(&store, &doc);

    assert_eq!(ctl.current_theme(), Theme::Light);
    assert_eq!(applied(&doc).as_deref(), Some("light"));
    assert_eq!(store.entry(KEY).as_deref(), Some("light"));
}

#[test]
fn initialize_uses_configured_default() {
    let config = ThemeConfig { default_theme: Theme::Dark, ..ThemeConfig::default() };
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = controller_with(config, &store, &doc);
    ctl.initialize(Box::new(|| {}));
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
}

#[test]
fn initialize_injects_styles_and_button() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let ctl = initialized(&store, &doc);

    assert!(ctl.is_rendered());
    let palette = doc.element("theme-switcher-palette").unwrap();
    assert!(palette.text.unwrap().contains("[data-theme=\"dark\"]"));
    let toggle_css = doc.element("theme-switcher-toggle").unwrap();
    assert!(toggle_css.text.unwrap().contains(".theme-toggle-btn"));

    let button = doc.element("theme-toggle").unwrap();
    assert_eq!(button.class, "theme-toggle-btn");
    assert_eq!(button.title.as_deref(), Some("تغییر تم"));
}

#[test]
fn initialize_twice_injects_once() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);
    ctl.initialize(Box::new(|| {}));

    assert_eq!(doc.count("theme-switcher-palette"), 1);
    assert_eq!(doc.count("theme-switcher-toggle"), 1);
    assert_eq!(doc.count("theme-toggle"), 1);
}

#[test]
fn second_controller_on_same_page_reuses_injected_elements() {
    let doc = MemoryDocument::new();
    let first = initialized(&MemoryStore::new(), &doc);
    let second = initialized(&MemoryStore::new(), &doc);

    assert!(first.is_rendered());
    assert!(second.is_rendered());
    assert_eq!(doc.count("theme-switcher-palette"), 1);
    assert_eq!(doc.count("theme-toggle"), 1);
}

#[test]
fn render_button_off_skips_button_and_its_styles() {
    let config = ThemeConfig { render_button: false, ..ThemeConfig::default() };
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = controller_with(config, &store, &doc);
    ctl.initialize(Box::new(|| {}));

    assert!(!ctl.is_rendered());
    assert!(doc.has_element("theme-switcher-palette"));
    assert!(!doc.has_element("theme-switcher-toggle"));
    assert!(!doc.has_element("theme-toggle"));
    assert_eq!(applied(&doc).as_deref(), Some("light"));
}

#[test]
fn toggle_waits_for_body_then_retries() {
    let store = MemoryStore::with_entry(KEY, "dark");
    let doc = MemoryDocument::loading();
    let mut ctl = initialized(&store, &doc);

    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert!(!ctl.is_rendered());
    assert!(!doc.has_element("theme-toggle"));
    assert!(!ctl.retry_render());

    doc.finish_loading();
    assert!(ctl.retry_render());
    assert!(ctl.is_rendered());
    assert_eq!(doc.class_of("theme-icon").as_deref(), Some("fas fa-sun"));
    assert!(ctl.retry_render());
    assert_eq!(doc.count("theme-toggle"), 1);
}

#[test]
fn retry_render_before_initialize_does_nothing() {
    let doc = MemoryDocument::new();
    let mut ctl = controller(&MemoryStore::new(), &doc);
    assert!(!ctl.retry_render());
    assert!(doc.elements().is_empty());
}

// =============================================================
// apply_theme
// =============================================================

#[test]
fn apply_theme_sets_state_attribute_and_store() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    for theme in Theme::ALL {
        ctl.apply_theme(theme);
        assert_eq!(ctl.current_theme(), theme);
        assert_eq!(applied(&doc).as_deref(), Some(theme.as_str()));
        assert_eq!(store.entry(KEY).as_deref(), Some(theme.as_str()));
        assert_eq!(ctl.stored_theme(), Some(theme));
        assert_eq!(doc.class_of("theme-icon").as_deref(), Some(theme.icon().class_name()));
    }
}

#[test]
fn apply_theme_is_idempotent() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    ctl.apply_theme(Theme::Dark);
    let elements = doc.elements();
    ctl.apply_theme(Theme::Dark);
    assert_eq!(doc.elements(), elements);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
}

#[test]
fn apply_theme_before_initialize_still_tracks_state() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = controller(&store, &doc);
    ctl.apply_theme(Theme::Dark);
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert!(!doc.has_element("theme-icon"));
}

#[test]
fn apply_theme_named_normalizes_unknown_names() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    assert_eq!(ctl.apply_theme_named("dark"), Theme::Dark);
    assert_eq!(ctl.apply_theme_named("neon"), Theme::Light);
    assert_eq!(applied(&doc).as_deref(), Some("light"));
    assert_eq!(store.entry(KEY).as_deref(), Some("light"));
}

// =============================================================
// toggle_theme
// =============================================================

#[test]
fn toggle_flips_and_persists() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    assert_eq!(ctl.toggle_theme(), Theme::Dark);
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
    assert_eq!(doc.class_of("theme-icon").as_deref(), Some("fas fa-sun"));
}

#[test]
fn toggle_twice_returns_to_start() {
    for start in Theme::ALL {
        let store = MemoryStore::with_entry(KEY, start.as_str());
        let doc = MemoryDocument::new();
        let mut ctl = initialized(&store, &doc);
        ctl.toggle_theme();
        ctl.toggle_theme();
        assert_eq!(ctl.current_theme(), start);
        assert_eq!(applied(&doc).as_deref(), Some(start.as_str()));
    }
}

#[test]
fn toggle_primes_body_transition() {
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&MemoryStore::new(), &doc);
    assert_eq!(doc.body_transition(), None);
    ctl.toggle_theme();
    assert_eq!(doc.body_transition().as_deref(), Some("background 0.3s ease, color 0.3s ease"));
}

#[test]
fn toggle_without_body_still_flips() {
    let doc = MemoryDocument::loading();
    let mut ctl = initialized(&MemoryStore::new(), &doc);
    assert_eq!(ctl.toggle_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert_eq!(doc.body_transition(), None);
}

// =============================================================
// System preference
// =============================================================

#[test]
fn system_change_applies_and_persists_when_nothing_stored() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = controller(&store, &doc);

    assert!(ctl.system_preference_changed(true));
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
    assert_eq!(ctl.stored_theme(), Some(ctl.current_theme()));
}

#[test]
fn system_change_ignored_once_choice_persisted() {
    let store = MemoryStore::with_entry(KEY, "dark");
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    assert!(!ctl.system_preference_changed(false));
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
}

#[test]
fn system_change_after_store_cleared_becomes_the_choice() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);
    store.clear();

    assert!(ctl.system_preference_changed(true));
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));

    assert!(!ctl.system_preference_changed(false));
    assert_eq!(ctl.current_theme(), Theme::Dark);
}

#[test]
fn system_choice_survives_reload() {
    let store = MemoryStore::new();
    let mut first = initialized(&store, &MemoryDocument::new());
    store.clear();
    first.system_preference_changed(true);

    let doc = MemoryDocument::new();
    let reloaded = initialized(&store, &doc);
    assert_eq!(reloaded.current_theme(), Theme::Dark);
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
}

#[test]
fn match_system_replaces_explicit_choice() {
    let store = MemoryStore::new();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);
    ctl.apply_theme(Theme::Light);

    assert_eq!(ctl.match_system(true), Theme::Dark);
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
    assert_eq!(ctl.stored_theme(), Some(Theme::Dark));
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
    assert_eq!(doc.class_of("theme-icon").as_deref(), Some("fas fa-sun"));
}

#[test]
fn match_system_survives_reload() {
    let store = MemoryStore::new();
    let mut first = initialized(&store, &MemoryDocument::new());
    assert_eq!(first.match_system(true), Theme::Dark);
    first.teardown();

    let doc = MemoryDocument::new();
    let mut reloaded = initialized(&store, &doc);
    assert_eq!(reloaded.current_theme(), Theme::Dark);
    assert_eq!(reloaded.stored_theme(), Some(Theme::Dark));
    assert_eq!(store.entry(KEY).as_deref(), Some("dark"));
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
}

// =============================================================
// Degraded persistence
// =============================================================

#[test]
fn unavailable_store_keeps_session_state() {
    let store = MemoryStore::unavailable();
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&store, &doc);

    assert_eq!(ctl.persistence(), Persistence::SessionOnly);
    assert_eq!(ctl.current_theme(), Theme::Light);

    ctl.toggle_theme();
    assert_eq!(ctl.current_theme(), Theme::Dark);
    assert_eq!(ctl.stored_theme(), Some(Theme::Dark));
    assert!(!ctl.system_preference_changed(false));
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
}

// =============================================================
// Listeners and teardown
// =============================================================

#[test]
fn listeners_see_every_applied_theme() {
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&MemoryStore::new(), &doc);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ctl.on_change(Box::new(move |theme| sink.borrow_mut().push(theme)));

    ctl.toggle_theme();
    ctl.apply_theme(Theme::Dark);
    ctl.match_system(false);
    assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Dark, Theme::Light]);
}

#[test]
fn removed_listener_is_not_called_again() {
    let mut ctl = initialized(&MemoryStore::new(), &MemoryDocument::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = ctl.on_change(Box::new(move |theme| sink.borrow_mut().push(theme)));
    let kept = ctl.on_change(Box::new(|_| {}));
    assert_ne!(id, kept);

    ctl.toggle_theme();
    assert!(ctl.remove_listener(id));
    assert!(!ctl.remove_listener(id));
    ctl.toggle_theme();

    assert_eq!(*seen.borrow(), vec![Theme::Dark]);
    assert_eq!(ctl.listener_count(), 1);
}

#[test]
fn teardown_removes_injected_elements() {
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&MemoryStore::new(), &doc);
    ctl.apply_theme(Theme::Dark);
    ctl.teardown();

    assert!(doc.elements().is_empty());
    assert!(!ctl.is_rendered());
    assert!(!ctl.is_initialized());
    assert_eq!(applied(&doc).as_deref(), Some("dark"));
}

#[test]
fn teardown_leaves_adopted_elements_alone() {
    let doc = MemoryDocument::new();
    let _first = initialized(&MemoryStore::new(), &doc);
    let mut second = initialized(&MemoryStore::new(), &doc);
    second.teardown();

    assert!(doc.has_element("theme-toggle"));
    assert!(doc.has_element("theme-switcher-palette"));
}

#[test]
fn initialize_after_teardown_renders_again() {
    let doc = MemoryDocument::new();
    let mut ctl = initialized(&MemoryStore::new(), &doc);
    ctl.teardown();
    ctl.initialize(Box::new(|| {}));
    assert!(ctl.is_rendered());
    assert_eq!(doc.count("theme-toggle"), 1);
    assert_eq!(doc.count("theme-switcher-palette"), 1);
}
