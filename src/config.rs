//! Widget configuration.
//!
//! DESIGN
//! ======
//! Every field has a default matching the constants in [`crate::consts`], so
//! hosts only spell out what they override. Browsers have no process
//! environment, so overrides arrive as a JSON object passed to the start
//! entry point rather than as env vars.

use serde::{Deserialize, Serialize};

use crate::consts::{
    BODY_TRANSITION, DARK_SCHEME_QUERY, DEFAULT_LOG_LEVEL, PALETTE_STYLE_ID, STORAGE_KEY, THEME_ATTRIBUTE,
    TOGGLE_BUTTON_CLASS, TOGGLE_BUTTON_ID, TOGGLE_ICON_ID, TOGGLE_STYLE_ID, TOGGLE_TITLE,
};
use crate::theme::Theme;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid theme config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("theme config field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// Names, defaults, and switches for one theme controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key of the persisted preference.
    pub storage_key: String,
    /// Root element attribute carrying the applied theme.
    pub attribute: String,
    /// Theme used when nothing (or garbage) is persisted.
    pub default_theme: Theme,
    pub button_id: String,
    pub button_class: String,
    pub icon_id: String,
    pub title: String,
    pub media_query: String,
    pub body_transition: String,
    pub palette_style_id: String,
    pub toggle_style_id: String,
    /// Inject the floating toggle button. Hosts rendering
    /// [`crate::component::ThemeToggle`] turn this off.
    pub render_button: bool,
    /// Console log level used by the browser entry point.
    pub log_level: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_owned(),
            attribute: THEME_ATTRIBUTE.to_owned(),
            default_theme: Theme::Light,
            button_id: TOGGLE_BUTTON_ID.to_owned(),
            button_class: TOGGLE_BUTTON_CLASS.to_owned(),
            icon_id: TOGGLE_ICON_ID.to_owned(),
            title: TOGGLE_TITLE.to_owned(),
            media_query: DARK_SCHEME_QUERY.to_owned(),
            body_transition: BODY_TRANSITION.to_owned(),
            palette_style_id: PALETTE_STYLE_ID.to_owned(),
            toggle_style_id: TOGGLE_STYLE_ID.to_owned(),
            render_button: true,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl ThemeConfig {
    /// Parse a JSON object of overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::EmptyField`] when a required name is blank.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank names; they would produce unusable selectors or keys.
    ///
    /// # Errors
    ///
    /// Returns the first blank field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storage_key", &self.storage_key),
            ("attribute", &self.attribute),
            ("button_id", &self.button_id),
            ("button_class", &self.button_class),
            ("icon_id", &self.icon_id),
            ("media_query", &self.media_query),
            ("palette_style_id", &self.palette_style_id),
            ("toggle_style_id", &self.toggle_style_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        Ok(())
    }
}
