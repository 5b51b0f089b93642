//! Light/dark theme switcher for the dashboard pages.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It reads
//! the user's persisted theme (or defaults to light), applies it as a
//! `data-theme` attribute on `<html>`, injects the palette and a floating
//! toggle button, and applies the system color-scheme preference whenever no
//! choice is stored.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | The theme state machine, [`controller::ThemeController`] |
//! | [`switcher`] | Shared handle wiring clicks and system changes to a controller |
//! | [`page`] | The page's single active switcher and its operations |
//! | [`theme`] | `Theme` and `Icon` values, parsing and normalization |
//! | [`store`] | Persisted preference capability and session-only fallback |
//! | [`document`] | DOM mutation capability and an in-memory document |
//! | [`signal`] | System color-scheme capability and an in-memory signal |
//! | [`styles`] | Palette and toggle-button CSS |
//! | [`config`] | `ThemeConfig` defaults and JSON overrides |
//! | [`consts`] | Fixed names (storage key, element ids, media query) |
//! | [`component`] | Leptos `ThemeToggle` button |
//! | `browser` | `web-sys` backends and JS exports (`hydrate` only) |

pub mod component;
pub mod config;
pub mod consts;
pub mod controller;
pub mod document;
pub mod page;
pub mod signal;
pub mod store;
pub mod styles;
pub mod switcher;
pub mod theme;

#[cfg(feature = "hydrate")]
pub mod browser;

pub use config::ThemeConfig;
pub use controller::ThemeController;
pub use switcher::ThemeSwitcher;
pub use theme::{Icon, Theme};
