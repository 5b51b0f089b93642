//! Theme state machine.
//!
//! DESIGN
//! ======
//! [`ThemeController`] is the single authority over the theme: it reads the
//! persisted preference, writes the root attribute, keeps the toggle icon in
//! step, and decides whether a system preference change should apply. It
//! owns its collaborators as trait objects and never reaches for browser
//! globals, so several isolated instances can run side by side in tests.
//!
//! Two states, `light` and `dark`. `apply_theme` sets the state directly,
//! `toggle_theme` flips it, and a system preference change sets it only while
//! no preference is persisted. Every transition goes through `apply_theme`,
//! so the persisted value always equals the applied one once initialized.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error. Storage failures degrade to session-only
//! memory (see [`PreferenceSlot`]); DOM failures are logged and the in-memory
//! state still moves. A missing `<body>` leaves the toggle pending until
//! [`ThemeController::retry_render`] succeeds.

use leptos::logging::{log, warn};

use crate::config::ThemeConfig;
use crate::document::{ThemeDocument, ToggleHandler, ToggleMarkup};
use crate::store::{Persistence, PreferenceSlot, PreferenceStore};
use crate::styles;
use crate::theme::{Icon, Theme};

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

/// Observer called with the theme after every apply.
pub type ThemeListener = Box<dyn FnMut(Theme)>;

/// Handle for removing a registered [`ThemeListener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Lifecycle of the floating toggle button.
enum ToggleState {
    /// Not rendered (before `initialize`, after teardown, or disabled).
    Absent,
    /// Waiting for `<body>`; holds the click handler to attach.
    Pending(ToggleHandler),
    /// Mounted by this controller.
    Mounted,
    /// An element with the button id already existed; left alone.
    Adopted,
}

pub struct ThemeController {
    config: ThemeConfig,
    preference: PreferenceSlot,
    document: Box<dyn ThemeDocument>,
    current: Theme,
    initialized: bool,
    toggle: ToggleState,
    /// Style block ids this controller inserted (and so removes on teardown).
    owned_styles: Vec<String>,
    listeners: Vec<(ListenerId, ThemeListener)>,
    next_listener: u64,
}

impl ThemeController {
    /// Build a controller whose current theme is the persisted preference,
    /// or the configured default when nothing usable is stored.
    ///
    /// Nothing is written to the document until [`Self::initialize`].
    pub fn new(config: ThemeConfig, store: Box<dyn PreferenceStore>, document: Box<dyn ThemeDocument>) -> Self {
        let mut preference = PreferenceSlot::new(store, config.storage_key.clone());
        let current = match preference.load() {
            Some(raw) => Theme::parse_or(&raw, config.default_theme),
            None => config.default_theme,
        };
        Self {
            config,
            preference,
            document,
            current,
            initialized: false,
            toggle: ToggleState::Absent,
            owned_styles: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // --- Lifecycle ---

    /// Inject styles, apply the current theme, and render the toggle.
    ///
    /// Applying persists the theme, so a first visit writes the default.
    /// Calling this twice is a no-op.
    pub fn initialize(&mut self, on_toggle: ToggleHandler) {
        if self.initialized {
            log!("theme controller already initialized");
            return;
        }
        self.initialized = true;

        self.inject_styles();
        self.apply_theme(self.current);
        if self.config.render_button {
            self.toggle = ToggleState::Pending(on_toggle);
            self.retry_render();
        }
    }

    /// Mount a toggle that was deferred because `<body>` was missing.
    ///
    /// Returns `true` once the toggle is on the page (mounted or adopted).
    pub fn retry_render(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.inject_styles();
        match self.toggle {
            ToggleState::Mounted | ToggleState::Adopted => return true,
            ToggleState::Absent => return false,
            ToggleState::Pending(_) => {}
        }

        if self.document.has_element(&self.config.button_id) {
            log!("toggle #{} already on the page; not mounting another", self.config.button_id);
            self.toggle = ToggleState::Adopted;
            return true;
        }
        if !self.document.body_ready() {
            log!("document body not ready; toggle render deferred");
            return false;
        }

        let ToggleState::Pending(handler) = std::mem::replace(&mut self.toggle, ToggleState::Absent) else {
            return false;
        };
        let markup = self.markup();
        match self.document.mount_toggle(&markup, handler) {
            Ok(()) => {
                self.toggle = ToggleState::Mounted;
                true
            }
            Err(err) => {
                warn!("failed to render theme toggle: {err}");
                false
            }
        }
    }

    /// Remove what this controller injected. The root attribute keeps the
    /// last applied theme.
    pub fn teardown(&mut self) {
        if matches!(self.toggle, ToggleState::Mounted) {
            let button_id = self.config.button_id.clone();
            self.remove(&button_id);
        }
        for id in std::mem::take(&mut self.owned_styles) {
            self.remove(&id);
        }
        self.toggle = ToggleState::Absent;
        self.listeners.clear();
        self.initialized = false;
    }

    // --- Transitions ---

    /// Apply `theme` to the document and persist it.
    ///
    /// Idempotent: applying the active theme again changes nothing visible.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.render_theme(theme);
        self.preference.save(theme.as_str());
    }

    /// Apply a theme by name, normalizing unknown names to the default.
    pub fn apply_theme_named(&mut self, name: &str) -> Theme {
        let theme = Theme::parse_or(name, self.config.default_theme);
        self.apply_theme(theme);
        theme
    }

    /// Switch to the other theme and animate the change.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.current.toggled();
        self.apply_theme(next);
        if let Err(err) = self.document.set_body_transition(&self.config.body_transition) {
            warn!("failed to prime theme transition: {err}");
        }
        next
    }

    /// React to the system color-scheme preference changing.
    ///
    /// An explicit persisted choice always wins; the change is applied (and
    /// so persisted) only while nothing is stored, which means the first
    /// system change after the store was emptied becomes the choice. Returns
    /// whether the theme was applied.
    pub fn system_preference_changed(&mut self, prefers_dark: bool) -> bool {
        if self.preference.load().is_some() {
            log!("system color scheme changed; explicit theme choice kept");
            return false;
        }
        self.apply_theme(Theme::from_prefers_dark(prefers_dark));
        true
    }

    /// Replace the explicit choice with the current system preference.
    ///
    /// The result is persisted like any other choice, so it survives a
    /// reload; later system changes do not apply until the store is emptied.
    pub fn match_system(&mut self, prefers_dark: bool) -> Theme {
        let theme = Theme::from_prefers_dark(prefers_dark);
        self.apply_theme(theme);
        theme
    }

    /// Register an observer for applied themes. Observers must not call back
    /// into the controller.
    pub fn on_change(&mut self, listener: ThemeListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Drop a registered observer. Returns `false` if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(owner, _)| *owner != id);
        self.listeners.len() != before
    }

    // --- Queries ---

    #[must_use]
    pub fn current_theme(&self) -> Theme {
        self.current
    }

    #[must_use]
    pub fn icon(&self) -> Icon {
        self.current.icon()
    }

    /// Validated persisted preference, if the user has made a choice.
    pub fn stored_theme(&mut self) -> Option<Theme> {
        let raw = self.preference.load()?;
        Some(Theme::parse_or(&raw, self.config.default_theme))
    }

    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.preference.persistence()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the toggle is on the page (mounted here or adopted).
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self.toggle, ToggleState::Mounted | ToggleState::Adopted)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    // --- Internals ---

    fn render_theme(&mut self, theme: Theme) {
        if let Err(err) = self.document.set_root_attribute(&self.config.attribute, theme.as_str()) {
            warn!("failed to apply theme {theme}: {err}");
        }
        self.current = theme;

        if let Err(err) = self.document.set_element_class(&self.config.icon_id, theme.icon().class_name()) {
            warn!("failed to update theme icon: {err}");
        }

        for (_, listener) in &mut self.listeners {
            listener(theme);
        }
    }

    fn inject_styles(&mut self) {
        let mut blocks = vec![(self.config.palette_style_id.clone(), styles::palette_css(&self.config.attribute))];
        if self.config.render_button {
            blocks.push((self.config.toggle_style_id.clone(), styles::toggle_css(&self.config.button_class)));
        }

        for (id, css) in blocks {
            if self.owned_styles.contains(&id) || self.document.has_element(&id) {
                continue;
            }
            match self.document.inject_stylesheet(&id, &css) {
                Ok(()) => self.owned_styles.push(id),
                Err(err) => warn!("failed to inject stylesheet #{id}: {err}"),
            }
        }
    }

    fn markup(&self) -> ToggleMarkup {
        ToggleMarkup {
            button_id: self.config.button_id.clone(),
            button_class: self.config.button_class.clone(),
            title: self.config.title.clone(),
            icon_id: self.config.icon_id.clone(),
            icon_class: self.current.icon().class_name().to_owned(),
        }
    }

    fn remove(&mut self, id: &str) {
        if let Err(err) = self.document.remove_element(id) {
            warn!("failed to remove #{id}: {err}");
        }
    }
}
