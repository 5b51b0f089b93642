//! Leptos toggle button for hosts that render the control themselves.
//!
//! Start the page switcher with `render_button: false`, then place
//! `<ThemeToggle/>` wherever the host layout wants it. The button drives the
//! page switcher and follows theme changes made elsewhere (system signal,
//! JS calls) for as long as it is mounted.

use leptos::logging::log;
use leptos::prelude::*;

use crate::consts::{TOGGLE_BUTTON_CLASS, TOGGLE_TITLE};
use crate::controller::ListenerId;
use crate::page;
use crate::theme::Theme;

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

/// Theme toggle button bound to the page switcher.
#[component]
pub fn ThemeToggle(
    /// Extra class names appended to the default button class.
    #[prop(optional, into)]
    class: Option<String>,
    /// Tooltip; defaults to the widget's standard title.
    #[prop(optional, into)]
    title: Option<String>,
) -> impl IntoView {
    let theme = RwSignal::new(page::active_theme().unwrap_or_default());
    if let Some(id) = follow_page(move |next| theme.set(next)) {
        on_cleanup(move || {
            page::unwatch(id);
        });
    }

    let class = button_class(class.as_deref());
    let title = title.unwrap_or_else(|| TOGGLE_TITLE.to_owned());

    let on_click = move |_| {
        if let Some(next) = page::toggle() {
            theme.set(next);
        }
    };

    view! {
        <button type="button" class=class title=title.clone() aria-label=title on:click=on_click>
            <i class=move || theme.get().icon().class_name()></i>
        </button>
    }
}

fn button_class(extra: Option<&str>) -> String {
    match extra.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{TOGGLE_BUTTON_CLASS} {extra}"),
        _ => TOGGLE_BUTTON_CLASS.to_owned(),
    }
}

/// Feed themes applied by the page switcher into `sink`. Returns the
/// registration to drop on unmount, or `None` when no switcher is running
/// (the button then shows the default theme until clicked).
fn follow_page(sink: impl FnMut(Theme) + 'static) -> Option<ListenerId> {
    let id = page::watch(Box::new(sink));
    if id.is_none() {
        log!("ThemeToggle mounted before the theme switcher started; not following page changes");
    }
    id
}
