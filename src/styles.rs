//! CSS injected into the host page.
//!
//! Two blocks: the palette (color variables plus dark overrides for the
//! dashboard's surfaces) and the floating toggle button. Selectors are built
//! from the configured attribute and class names so they always match what
//! the controller writes.

#[cfg(test)]
#[path = "styles_test.rs"]
mod styles_test;

/// Color variables declared on `:root` for the light theme.
pub const LIGHT_VARIABLES: &[(&str, &str)] = &[
    ("--bg-primary", "#ffffff"),
    ("--bg-secondary", "#f8f9fa"),
    ("--text-primary", "#000000"),
    ("--text-secondary", "#666666"),
    ("--card-bg", "rgba(255, 255, 255, 0.95)"),
    ("--border-color", "#e0e0e0"),
];

/// Overrides for the same variables when the root carries the dark theme.
pub const DARK_VARIABLES: &[(&str, &str)] = &[
    ("--bg-primary", "#1a1a1a"),
    ("--bg-secondary", "#2d2d2d"),
    ("--text-primary", "#ffffff"),
    ("--text-secondary", "#aaaaaa"),
    ("--card-bg", "rgba(45, 45, 45, 0.95)"),
    ("--border-color", "#404040"),
];

/// Page sections that switch to card colors in the dark theme.
pub const DARK_SURFACES: &[&str] = &[
    ".dashboard-header",
    ".hero-section",
    ".stat-card",
    ".chart-card",
    ".table-card",
    ".protocol-card",
    ".country-card",
];

const DARK_BODY_BACKGROUND: &str = "linear-gradient(135deg, #2d3561 0%, #3d2d54 100%)";

const TOGGLE_CSS_TEMPLATE: &str = "
.__CLASS__ {
    position: fixed;
    bottom: 30px;
    right: 30px;
    width: 60px;
    height: 60px;
    border-radius: 50%;
    background: var(--primary-gradient, linear-gradient(135deg, #667eea 0%, #764ba2 100%));
    border: none;
    color: white;
    font-size: 24px;
    cursor: pointer;
    box-shadow: 0 10px 30px rgba(0, 0, 0, 0.3);
    z-index: 9999;
    transition: all 0.3s ease;
}

.__CLASS__:hover {
    transform: scale(1.1) rotate(15deg);
    box-shadow: 0 15px 40px rgba(0, 0, 0, 0.4);
}

.__CLASS__:active {
    transform: scale(0.95);
}

@media (max-width: 768px) {
    .__CLASS__ {
        width: 50px;
        height: 50px;
        bottom: 20px;
        right: 20px;
        font-size: 20px;
    }
}
";

/// Selector prefix matching the root element in the dark theme.
#[must_use]
pub fn dark_selector(attribute: &str) -> String {
    format!("[{attribute}=\"dark\"]")
}

fn rule(selector: &str, declarations: &[(&str, &str)]) -> String {
    let body: String = declarations
        .iter()
        .map(|(property, value)| format!("    {property}: {value};\n"))
        .collect();
    format!("{selector} {{\n{body}}}\n\n")
}

/// Palette stylesheet keyed on `attribute` (normally `data-theme`).
#[must_use]
pub fn palette_css(attribute: &str) -> String {
    let dark = dark_selector(attribute);
    let mut css = String::new();

    css.push_str(&rule(":root", LIGHT_VARIABLES));
    css.push_str(&rule(&dark, DARK_VARIABLES));
    css.push_str(&rule(
        &format!("{dark} body"),
        &[("background", DARK_BODY_BACKGROUND), ("color", "var(--text-primary)")],
    ));

    let surfaces = DARK_SURFACES
        .iter()
        .map(|surface| format!("{dark} {surface}"))
        .collect::<Vec<_>>()
        .join(",\n");
    css.push_str(&rule(
        &surfaces,
        &[
            ("background", "var(--card-bg)"),
            ("color", "var(--text-primary)"),
            ("border", "1px solid var(--border-color)"),
        ],
    ));

    css.push_str(&rule(&format!("{dark} .custom-table"), &[("color", "var(--text-primary)")]));
    css.push_str(&rule(
        &format!("{dark} .custom-table thead"),
        &[("background", "rgba(102, 126, 234, 0.2)")],
    ));
    css.push_str(&rule(
        &format!("{dark} .custom-table tbody tr"),
        &[("background", "rgba(255, 255, 255, 0.05)")],
    ));
    css.push_str(&rule(
        &format!("{dark} .custom-table tbody tr:hover"),
        &[("background", "rgba(102, 126, 234, 0.1)")],
    ));
    css
}

/// Stylesheet for the floating toggle button with class `button_class`.
#[must_use]
pub fn toggle_css(button_class: &str) -> String {
    TOGGLE_CSS_TEMPLATE.replace("__CLASS__", button_class)
}
