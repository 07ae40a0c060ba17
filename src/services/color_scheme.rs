//! The fixed catalogue of site palettes.
//!
//! A palette maps CSS custom properties (without the leading `--`) to colors.
//! The client applies them to `:root` as soon as the admin saves a choice.

use std::collections::BTreeMap;

use crate::web::models::settings_models::ColorSchemeResponse;

/// Key of the site setting that stores the active palette name.
pub const COLOR_SCHEME_SETTING_KEY: &str = "colorScheme";

pub const DEFAULT_SCHEME: &str = "classic";

const PROPERTIES: [&str; 6] = [
    "primary",
    "primary-foreground",
    "secondary",
    "accent",
    "background",
    "foreground",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub label: &'static str,
    values: [&'static str; 6],
}

impl ColorScheme {
    /// CSS custom properties of this palette keyed by property name.
    pub fn colors(&self) -> BTreeMap<&'static str, &'static str> {
        PROPERTIES.iter().copied().zip(self.values).collect()
    }
}

impl From<&ColorScheme> for ColorSchemeResponse {
    fn from(scheme: &ColorScheme) -> Self {
        ColorSchemeResponse {
            name: scheme.name,
            label: scheme.label,
            colors: scheme.colors(),
        }
    }
}

pub const SCHEMES: [ColorScheme; 5] = [
    ColorScheme {
        name: "classic",
        label: "Классическая роза",
        values: ["#d6336c", "#ffffff", "#fce4ec", "#8bc34a", "#fffafb", "#2d1b22"],
    },
    ColorScheme {
        name: "spring",
        label: "Весенний сад",
        values: ["#43a047", "#ffffff", "#e8f5e9", "#ffb300", "#fbfff8", "#1b2e1c"],
    },
    ColorScheme {
        name: "lavender",
        label: "Лавандовое поле",
        values: ["#7e57c2", "#ffffff", "#ede7f6", "#f06292", "#fcfaff", "#261d33"],
    },
    ColorScheme {
        name: "sunset",
        label: "Закатные пионы",
        values: ["#f4511e", "#ffffff", "#fff3e0", "#ab47bc", "#fffaf6", "#35201a"],
    },
    ColorScheme {
        name: "mint",
        label: "Мятная свежесть",
        values: ["#26a69a", "#ffffff", "#e0f2f1", "#ef5350", "#f7fffd", "#15302d"],
    },
];

pub fn find_by_name(name: &str) -> Option<&'static ColorScheme> {
    SCHEMES.iter().find(|scheme| scheme.name == name)
}

pub fn default_scheme() -> &'static ColorScheme {
    &SCHEMES[0]
}

/// Resolves a stored setting value, falling back to the default palette
/// when nothing is stored or the stored name is no longer in the catalogue.
pub fn resolve(stored: Option<&str>) -> &'static ColorScheme {
    stored.and_then(find_by_name).unwrap_or_else(default_scheme)
}
