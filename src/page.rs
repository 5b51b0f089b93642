//! The page's one theme switcher.
//!
//! SYSTEM CONTEXT
//! ==============
//! A page has a single root element and a single persisted key, so it gets a
//! single active [`ThemeSwitcher`]. This module holds it in a thread-local
//! slot (the browser runs WASM on one thread) and exposes the operations
//! JS glue and Leptos components need without threading a handle around.
//!
//! TRADE-OFFS
//! ==========
//! Starting is browser-only; without `hydrate` [`start`] no-ops so server
//! and host test builds stay deterministic. Everything else works on any
//! installed switcher, including ones built from in-memory collaborators.

use std::cell::RefCell;

use leptos::logging::log;

use crate::config::ThemeConfig;
use crate::controller::{ListenerId, ThemeListener};
use crate::switcher::ThemeSwitcher;
use crate::theme::Theme;

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

thread_local! {
    static ACTIVE: RefCell<Option<ThemeSwitcher>> = const { RefCell::new(None) };
}

/// Start the browser-backed switcher for this page.
///
/// Defers to `DOMContentLoaded` while the document is still loading. A
/// second call while one is active is ignored.
pub fn start(config: ThemeConfig) {
    #[cfg(feature = "hydrate")]
    {
        crate::browser::start(config);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        log!("theme switcher needs a browser; ignoring start for key {}", config.storage_key);
    }
}

/// Make `switcher` the page's active switcher. Returns `false` (and leaves
/// the current one in place) if one is already installed.
pub fn install(switcher: ThemeSwitcher) -> bool {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            log!("theme switcher already active on this page");
            return false;
        }
        *slot = Some(switcher);
        true
    })
}

#[must_use]
pub fn is_active() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}

/// Handle to the active switcher.
#[must_use]
pub fn active() -> Option<ThemeSwitcher> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

#[must_use]
pub fn active_theme() -> Option<Theme> {
    active().map(|switcher| switcher.current_theme())
}

/// Toggle the active switcher; `None` when nothing is running.
pub fn toggle() -> Option<Theme> {
    active().map(|switcher| switcher.toggle_theme())
}

/// Apply a theme by name; unknown names fall back to the default theme.
pub fn apply(name: &str) -> Option<Theme> {
    active().map(|switcher| switcher.apply_theme_named(name))
}

/// Persist the current system preference as the choice.
pub fn match_system() -> Option<Theme> {
    active().map(|switcher| switcher.match_system())
}

/// Retry a toggle render deferred for lack of `<body>`.
pub fn retry_render() -> bool {
    active().is_some_and(|switcher| switcher.retry_render())
}

/// Observe theme changes on the active switcher. Returns `None` when
/// nothing is running.
pub fn watch(listener: ThemeListener) -> Option<ListenerId> {
    active().map(|switcher| switcher.on_change(listener))
}

/// Remove an observer added with [`watch`]. Returns `false` when it is gone
/// already (removed, or the switcher was stopped).
pub fn unwatch(id: ListenerId) -> bool {
    active().is_some_and(|switcher| switcher.remove_listener(id))
}

/// Destroy and uninstall the active switcher.
pub fn stop() -> bool {
    let Some(switcher) = ACTIVE.with(|slot| slot.borrow_mut().take()) else {
        return false;
    };
    switcher.destroy();
    true
}
