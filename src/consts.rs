//! Fixed names shared by the controller, the browser backend, and the CSS.

// ── Persistence ─────────────────────────────────────────────────

/// `localStorage` key holding the persisted theme. Kept compatible with
/// preferences written by earlier releases of the dashboard.
pub const STORAGE_KEY: &str = "v2ray-theme";

// ── Document ────────────────────────────────────────────────────

/// Root element attribute read by the page's style rules.
pub const THEME_ATTRIBUTE: &str = "data-theme";

pub const TOGGLE_BUTTON_ID: &str = "theme-toggle";
pub const TOGGLE_BUTTON_CLASS: &str = "theme-toggle-btn";
pub const TOGGLE_ICON_ID: &str = "theme-icon";

/// Tooltip on the toggle button ("change theme").
pub const TOGGLE_TITLE: &str = "تغییر تم";

pub const PALETTE_STYLE_ID: &str = "theme-switcher-palette";
pub const TOGGLE_STYLE_ID: &str = "theme-switcher-toggle";

/// Transition primed on `<body>` when the user toggles.
pub const BODY_TRANSITION: &str = "background 0.3s ease, color 0.3s ease";

// ── System preference ───────────────────────────────────────────

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

// ── Logging ─────────────────────────────────────────────────────

pub const DEFAULT_LOG_LEVEL: &str = "info";
