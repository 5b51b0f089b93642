//! Shared handle that wires a controller to its event sources.
//!
//! SYSTEM CONTEXT
//! ==============
//! Click and system-preference callbacks outlive the call that registers
//! them, so the controller sits behind `Rc<RefCell<_>>` and the callbacks
//! hold a `Weak` to it. Dropping every [`ThemeSwitcher`] clone lets the
//! controller go even if the host never calls [`ThemeSwitcher::destroy`].
//!
//! Both callbacks are wired inside [`ThemeSwitcher::start`], after the theme
//! is applied and before control returns to the event loop, so no click can
//! reach a half-initialized controller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::logging::warn;

use crate::config::ThemeConfig;
use crate::controller::{ListenerId, ThemeController, ThemeListener};
use crate::document::ThemeDocument;
use crate::signal::PreferenceSignal;
use crate::store::{Persistence, PreferenceStore};
use crate::theme::Theme;

#[cfg(test)]
#[path = "switcher_test.rs"]
mod switcher_test;

/// A running theme widget. Clones share the same controller.
#[derive(Clone)]
pub struct ThemeSwitcher {
    controller: Rc<RefCell<ThemeController>>,
    signal: Rc<RefCell<Box<dyn PreferenceSignal>>>,
}

impl ThemeSwitcher {
    /// Construct, initialize, and subscribe in one step.
    pub fn start(
        config: ThemeConfig,
        store: Box<dyn PreferenceStore>,
        document: Box<dyn ThemeDocument>,
        signal: Box<dyn PreferenceSignal>,
    ) -> Self {
        let controller = Rc::new(RefCell::new(ThemeController::new(config, store, document)));
        let switcher = Self { controller, signal: Rc::new(RefCell::new(signal)) };

        let on_click = {
            let weak = Rc::downgrade(&switcher.controller);
            Box::new(move || {
                with_controller(&weak, "toggle click", |ctl| {
                    ctl.toggle_theme();
                });
            })
        };
        switcher.controller.borrow_mut().initialize(on_click);
        switcher.subscribe();
        switcher
    }

    fn subscribe(&self) {
        let weak = Rc::downgrade(&self.controller);
        let listener = Box::new(move |prefers_dark: bool| {
            with_controller(&weak, "system color-scheme change", |ctl| {
                ctl.system_preference_changed(prefers_dark);
            });
        });
        if let Err(err) = self.signal.borrow_mut().subscribe(listener) {
            warn!("{err}; theme will not follow the system");
        }
    }

    // --- Operations ---

    pub fn toggle_theme(&self) -> Theme {
        self.controller.borrow_mut().toggle_theme()
    }

    pub fn apply_theme(&self, theme: Theme) {
        self.controller.borrow_mut().apply_theme(theme);
    }

    pub fn apply_theme_named(&self, name: &str) -> Theme {
        self.controller.borrow_mut().apply_theme_named(name)
    }

    /// Make the current system preference the persisted choice.
    pub fn match_system(&self) -> Theme {
        let prefers_dark = self.signal.borrow().prefers_dark();
        self.controller.borrow_mut().match_system(prefers_dark)
    }

    /// Mount a toggle deferred for lack of `<body>`.
    pub fn retry_render(&self) -> bool {
        self.controller.borrow_mut().retry_render()
    }

    /// Observe applied themes. The listener must not call back into the
    /// switcher.
    pub fn on_change(&self, listener: ThemeListener) -> ListenerId {
        self.controller.borrow_mut().on_change(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.controller.borrow_mut().remove_listener(id)
    }

    /// Unsubscribe from the system signal and remove the injected elements.
    pub fn destroy(&self) {
        self.signal.borrow_mut().unsubscribe();
        self.controller.borrow_mut().teardown();
    }

    // --- Queries ---

    #[must_use]
    pub fn current_theme(&self) -> Theme {
        self.controller.borrow().current_theme()
    }

    #[must_use]
    pub fn stored_theme(&self) -> Option<Theme> {
        self.controller.borrow_mut().stored_theme()
    }

    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.controller.borrow().persistence()
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.controller.borrow().is_rendered()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.controller.borrow().listener_count()
    }

    /// Whether both handles drive the same controller.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
    }
}

/// Run `f` against a controller reached from an event callback.
fn with_controller(weak: &Weak<RefCell<ThemeController>>, event: &str, f: impl FnOnce(&mut ThemeController)) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut ctl) => f(&mut ctl),
        Err(_) => warn!("theme controller busy; dropped {event}"),
    }
}
