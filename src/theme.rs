//! Theme values and the icon shown for each.
//!
//! DESIGN
//! ======
//! The theme is a closed two-value enum. Anything read from outside the
//! crate (persisted strings, JS callers) is validated here and normalized to
//! a default instead of being pushed into the document as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

/// Visual presentation mode applied to the document root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Both themes, light first.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    /// Attribute/storage spelling of the theme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Theme matching a `prefers-color-scheme: dark` query result.
    #[must_use]
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// Parse `raw`, falling back to `fallback` for anything unrecognized.
    #[must_use]
    pub fn parse_or(raw: &str, fallback: Self) -> Self {
        match raw.parse::<Self>() {
            Ok(theme) => theme,
            Err(err) => {
                leptos::logging::warn!("{err}; using {fallback}");
                fallback
            }
        }
    }

    /// Icon offered by the toggle while this theme is active.
    ///
    /// The icon points at the theme a click switches to: the sun while dark,
    /// the moon while light.
    #[must_use]
    pub fn icon(self) -> Icon {
        match self {
            Self::Light => Icon::Moon,
            Self::Dark => Icon::Sun,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme {0:?}")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

/// Icon-font glyph rendered inside the toggle button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Sun,
    Moon,
}

impl Icon {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
        }
    }

    /// Font Awesome class list for the `<i>` element.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Sun => "fas fa-sun",
            Self::Moon => "fas fa-moon",
        }
    }
}
