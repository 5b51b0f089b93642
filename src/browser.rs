//! `web-sys` implementations of the widget's collaborators, and the
//! `wasm-bindgen` exports the host page calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled with `hydrate`. Everything here is glue: the decisions live
//! in [`crate::controller`], which sees these types only through the
//! [`PreferenceStore`], [`ThemeDocument`], and [`PreferenceSignal`] traits.
//!
//! ERROR HANDLING
//! ==============
//! `JsValue` errors are stringified into the crate's error enums at this
//! boundary. Missing browser objects (no `window`, blocked `localStorage`,
//! no `matchMedia`) become the "unavailable" variants and the controller
//! degrades around them.

use std::str::FromStr;

use leptos::logging::{log, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, MediaQueryList, MediaQueryListEvent, Storage};

use crate::config::ThemeConfig;
use crate::document::{DomError, ThemeDocument, ToggleHandler, ToggleMarkup};
use crate::page;
use crate::signal::{PreferenceListener, PreferenceSignal, SignalError};
use crate::store::{PreferenceStore, StoreError};
use crate::switcher::ThemeSwitcher;

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

// =============================================================================
// STORAGE
// =============================================================================

/// `window.localStorage`, or nothing when the browser blocks it.
pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    #[must_use]
    pub fn local() -> Self {
        let storage = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(err)) => {
                warn!("localStorage blocked: {}", describe(&err));
                None
            }
            None => None,
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

fn rejected(operation: &'static str, key: &str, err: &JsValue) -> StoreError {
    StoreError::Rejected { operation, key: key.to_owned(), reason: describe(err) }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(|err| rejected("read", key, &err))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(|err| rejected("write", key, &err))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(|err| rejected("remove", key, &err))
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

fn js(err: JsValue) -> DomError {
    DomError::Js(describe(&err))
}

/// The live `document`. Keeps click closures alive while their button is
/// on the page.
pub struct BrowserDocument {
    document: Document,
    click_handlers: Vec<(String, Closure<dyn FnMut(Event)>)>,
}

impl BrowserDocument {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document, click_handlers: Vec::new() }
    }

    fn create(&self, tag: &str) -> Result<web_sys::Element, DomError> {
        self.document.create_element(tag).map_err(js)
    }
}

impl ThemeDocument for BrowserDocument {
    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), DomError> {
        let root = self.document.document_element().ok_or(DomError::MissingRoot)?;
        root.set_attribute(name, value).map_err(js)
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.document.document_element()?.get_attribute(name)
    }

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError> {
        let head = self.document.head().ok_or(DomError::MissingHead)?;
        let style = self.create("style")?;
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style).map_err(js)?;
        Ok(())
    }

    fn body_ready(&self) -> bool {
        self.document.body().is_some()
    }

    fn mount_toggle(&mut self, markup: &ToggleMarkup, on_click: ToggleHandler) -> Result<(), DomError> {
        let body = self.document.body().ok_or(DomError::MissingBody)?;

        let button = self.create("button")?;
        button.set_id(&markup.button_id);
        button.set_class_name(&markup.button_class);
        button.set_attribute("type", "button").map_err(js)?;
        button.set_attribute("title", &markup.title).map_err(js)?;
        button.set_attribute("aria-label", &markup.title).map_err(js)?;

        let icon = self.create("i")?;
        icon.set_id(&markup.icon_id);
        icon.set_class_name(&markup.icon_class);
        button.append_child(&icon).map_err(js)?;

        let mut on_click = on_click;
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| on_click());
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js)?;

        body.append_child(&button).map_err(js)?;
        self.click_handlers.push((markup.button_id.clone(), closure));
        Ok(())
    }

    fn set_element_class(&mut self, id: &str, class: &str) -> Result<bool, DomError> {
        let Some(element) = self.document.get_element_by_id(id) else {
            return Ok(false);
        };
        element.set_class_name(class);
        Ok(true)
    }

    fn set_body_transition(&mut self, transition: &str) -> Result<(), DomError> {
        let body = self.document.body().ok_or(DomError::MissingBody)?;
        body.style().set_property("transition", transition).map_err(js)
    }

    fn remove_element(&mut self, id: &str) -> Result<bool, DomError> {
        let Some(element) = self.document.get_element_by_id(id) else {
            return Ok(false);
        };
        element.remove();
        self.click_handlers.retain(|(owner, _)| owner != id);
        Ok(true)
    }
}

// =============================================================================
// SYSTEM PREFERENCE
// =============================================================================

/// `window.matchMedia(query)` change notifications.
pub struct BrowserSignal {
    query: Option<MediaQueryList>,
    listener: Option<Closure<dyn FnMut(MediaQueryListEvent)>>,
}

impl BrowserSignal {
    #[must_use]
    pub fn new(media_query: &str) -> Self {
        let query = match web_sys::window().map(|w| w.match_media(media_query)) {
            Some(Ok(query)) => query,
            Some(Err(err)) => {
                warn!("matchMedia({media_query}) failed: {}", describe(&err));
                None
            }
            None => None,
        };
        Self { query, listener: None }
    }
}

impl PreferenceSignal for BrowserSignal {
    fn prefers_dark(&self) -> bool {
        self.query.as_ref().is_some_and(MediaQueryList::matches)
    }

    fn subscribe(&mut self, listener: PreferenceListener) -> Result<(), SignalError> {
        self.unsubscribe();
        let query = self.query.as_ref().ok_or(SignalError::Unsupported)?;
        let mut listener = listener;
        let closure =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| listener(event.matches()));
        query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(|err| SignalError::Rejected(describe(&err)))?;
        self.listener = Some(closure);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        let (Some(query), Some(closure)) = (self.query.as_ref(), self.listener.take()) else {
            return;
        };
        if let Err(err) = query.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
            warn!("failed to stop observing color scheme: {}", describe(&err));
        }
    }
}

// =============================================================================
// STARTUP
// =============================================================================

fn init_logging(level: &str) {
    console_error_panic_hook::set_once();
    let level = match ::log::Level::from_str(level) {
        Ok(level) => level,
        Err(err) => {
            warn!("unknown log level {level:?} ({err}); using info");
            ::log::Level::Info
        }
    };
    if let Err(err) = console_log::init_with_level(level) {
        log!("console logger not installed ({err}); keeping the host's logger");
    }
}

/// Start the page switcher, deferring to `DOMContentLoaded` while the
/// document is still loading.
pub fn start(config: ThemeConfig) {
    init_logging(&config.log_level);
    if page::is_active() {
        log!("theme switcher already active on this page");
        return;
    }
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        warn!("no document; theme switcher not started");
        return;
    };

    if document.ready_state() == "loading" {
        let deferred = Closure::once_into_js(move || launch(config));
        if let Err(err) =
            document.add_event_listener_with_callback("DOMContentLoaded", deferred.unchecked_ref::<js_sys::Function>())
        {
            warn!("failed to defer theme switcher start: {}", describe(&err));
        }
        return;
    }
    launch(config);
}

fn launch(config: ThemeConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let render_button = config.render_button;
    let signal = BrowserSignal::new(&config.media_query);
    let switcher = ThemeSwitcher::start(
        config,
        Box::new(BrowserStore::local()),
        Box::new(BrowserDocument::new(document)),
        Box::new(signal),
    );
    let rendered = switcher.is_rendered();
    if !page::install(switcher.clone()) {
        switcher.destroy();
        return;
    }

    if render_button && !rendered {
        // Body was missing; try again once the page has fully loaded.
        let retry = Closure::once_into_js(|| {
            if !page::retry_render() {
                warn!("theme toggle could not be rendered");
            }
        });
        if let Err(err) = window.add_event_listener_with_callback("load", retry.unchecked_ref()) {
            warn!("failed to schedule theme toggle render: {}", describe(&err));
        }
    }
    log!("theme switcher started");
}

// =============================================================================
// JS EXPORTS
// =============================================================================

/// Start with defaults, or with a JSON object of [`ThemeConfig`] overrides.
/// An invalid config is reported and replaced by the defaults.
#[wasm_bindgen(js_name = startThemeSwitcher)]
pub fn start_theme_switcher(config_json: Option<String>) {
    let config = match config_json.as_deref().map(ThemeConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            warn!("{err}; starting theme switcher with defaults");
            ThemeConfig::default()
        }
        None => ThemeConfig::default(),
    };
    start(config);
}

/// Toggle and return the new theme name (empty when not started).
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> String {
    page::toggle().map(|theme| theme.as_str().to_owned()).unwrap_or_default()
}

/// Apply a theme by name; unknown names fall back to the default theme.
#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme(name: &str) -> String {
    page::apply(name).map(|theme| theme.as_str().to_owned()).unwrap_or_default()
}

#[wasm_bindgen(js_name = currentTheme)]
pub fn current_theme() -> String {
    page::active_theme().map(|theme| theme.as_str().to_owned()).unwrap_or_default()
}

/// Replace the stored choice with the current system preference.
#[wasm_bindgen(js_name = matchSystemTheme)]
pub fn match_system_theme() -> String {
    page::match_system().map(|theme| theme.as_str().to_owned()).unwrap_or_default()
}

/// Remove the button and styles and stop observing the system preference.
#[wasm_bindgen(js_name = destroyThemeSwitcher)]
pub fn destroy_theme_switcher() -> bool {
    page::stop()
}

#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn autostart() {
    start(ThemeConfig::default());
}
