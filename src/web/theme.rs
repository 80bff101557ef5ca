//! Theme context for the rendered shell. The visitor's choice lives in the
//! `theme` cookie; `system` defers to the browser's `prefers-color-scheme`.

use axum_extra::extract::cookie::CookieJar;
use std::{fmt, str::FromStr};

pub const THEME_COOKIE: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }

    /// Class applied to `<html>`; `system` leaves it to CSS media queries.
    #[must_use]
    pub const fn html_class(self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Dark => Some("dark"),
            Self::System => None,
        }
    }

    /// Value for `<meta name="color-scheme">`.
    #[must_use]
    pub const fn color_scheme(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "light dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ThemeConfig {
    default_mode: ThemeMode,
}

impl ThemeConfig {
    #[must_use]
    pub fn with_default_mode(mut self, mode: ThemeMode) -> Self {
        self.default_mode = mode;
        self
    }

    #[must_use]
    pub fn default_mode(&self) -> ThemeMode {
        self.default_mode
    }

    /// Effective mode for a request. Unknown values fall back to the
    /// configured default.
    #[must_use]
    pub fn resolve(&self, jar: &CookieJar) -> ThemeMode {
        jar.get(THEME_COOKIE)
            .and_then(|cookie| cookie.value().parse::<ThemeMode>().ok())
            .unwrap_or(self.default_mode)
    }
}
