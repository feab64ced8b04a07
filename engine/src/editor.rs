//! Form model behind the theme editor.
//!
//! Holds the editable values (colors, fonts, spacing, dark mode) read from
//! a variable set and turns them back into the variable set that gets
//! saved when the user applies.

use crate::color::Rgb;
use crate::defaults::{
    COLOR_DEFAULTS, CURRENT_ENGINE_VERSION, DEFAULT_DARK, DEFAULT_DASHLET_HEIGHT,
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_FAMILY_HEADINGS, DEFAULT_FONT_SIZE, DEFAULT_HIDPI_SCALE,
    DEFAULT_MARGIN, ENGINE_VERSION_VARIABLE, GRAY_COLORS, GRAY_NAMES, color_default,
};
use crate::upgrade::leading_integer;
use crate::variables::ThemeVariableSet;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 8..=24;
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=80;
pub const DASHLET_HEIGHT_RANGE: RangeInclusive<u32> = 50..=1000;
pub const DASHLET_HEIGHT_STEP: u32 = 4;
pub const HIDPI_SCALE_RANGE: RangeInclusive<u32> = 50..=300;

/// Generic families that must not be quoted in CSS
const GENERIC_FAMILIES: &[&str] = &["serif", "sans-serif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("'{0}' is not a theme color")]
    UnknownColor(String),
    #[error("'{value}' is not a valid color for {name}")]
    InvalidColor { name: String, value: String },
    #[error("'{0}' is not an editable setting")]
    UnknownSetting(String),
    #[error("'{value}' is not a valid value for {name}")]
    InvalidValue { name: String, value: String },
}

/// Values of the theme editor form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEditor {
    colors: IndexMap<String, String>,
    font_size: u32,
    font_family: String,
    font_family_headings: String,
    hidpi_scale: u32,
    margin: u32,
    dashlet_height: u32,
    dark: bool,
}

impl Default for ThemeEditor {
    fn default() -> Self {
        Self::from_variables(&ThemeVariableSet::new())
    }
}

impl ThemeEditor {
    pub fn from_variables(theme: &ThemeVariableSet) -> Self {
        let colors = COLOR_DEFAULTS
            .iter()
            .map(|entry| {
                let value = theme
                    .get(entry.name)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(entry.value);
                (entry.name.to_string(), value.to_string())
            })
            .collect();

        Self {
            colors,
            font_size: integer_or(theme, "font-size-base", DEFAULT_FONT_SIZE),
            font_family: unquoted_or(theme, "font-family-base", DEFAULT_FONT_FAMILY),
            font_family_headings: unquoted_or(
                theme,
                "font-family-headings",
                DEFAULT_FONT_FAMILY_HEADINGS,
            ),
            hidpi_scale: integer_or(theme, "hidpi-scale-factor", DEFAULT_HIDPI_SCALE),
            margin: integer_or(theme, "gutter-width", DEFAULT_MARGIN),
            dashlet_height: integer_or(theme, "dashlet-height", DEFAULT_DASHLET_HEIGHT),
            dark: theme
                .get("dark-theme")
                .map(|v| v == "true")
                .unwrap_or(DEFAULT_DARK),
        }
    }

    /// Discard unsaved edits
    pub fn revert(&mut self, theme: &ThemeVariableSet) {
        *self = Self::from_variables(theme);
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    pub fn colors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_family_headings(&self) -> &str {
        &self.font_family_headings
    }

    pub fn hidpi_scale(&self) -> u32 {
        self.hidpi_scale
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn dashlet_height(&self) -> u32 {
        self.dashlet_height
    }

    pub fn dark(&self) -> bool {
        self.dark
    }

    /// Set a palette color; stored as lowercase `#rrggbb`
    pub fn set_color(&mut self, name: &str, hex: &str) -> Result<(), EditorError> {
        if color_default(name).is_none() {
            return Err(EditorError::UnknownColor(name.to_string()));
        }
        let rgb = Rgb::from_hex(hex).map_err(|_| EditorError::InvalidColor {
            name: name.to_string(),
            value: hex.to_string(),
        })?;
        self.colors.insert(name.to_string(), rgb.to_hex());
        Ok(())
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = clamp(size, &FONT_SIZE_RANGE);
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.trim_matches('"').to_string();
    }

    pub fn set_font_family_headings(&mut self, family: &str) {
        self.font_family_headings = family.trim_matches('"').to_string();
    }

    pub fn set_hidpi_scale(&mut self, scale: u32) {
        self.hidpi_scale = clamp(scale, &HIDPI_SCALE_RANGE);
    }

    pub fn set_margin(&mut self, margin: u32) {
        self.margin = clamp(margin, &MARGIN_RANGE);
    }

    /// Clamped, then snapped down to the slider step
    pub fn set_dashlet_height(&mut self, height: u32) {
        let height = clamp(height, &DASHLET_HEIGHT_RANGE);
        let start = *DASHLET_HEIGHT_RANGE.start();
        self.dashlet_height = start + (height - start) / DASHLET_HEIGHT_STEP * DASHLET_HEIGHT_STEP;
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }

    /// Set a color or form field by its variable name
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), EditorError> {
        if color_default(name).is_some() {
            return self.set_color(name, value);
        }

        let invalid = || EditorError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "font-size-base" => self.set_font_size(leading_integer(value).ok_or_else(invalid)?),
            "hidpi-scale-factor" => {
                self.set_hidpi_scale(leading_integer(value).ok_or_else(invalid)?)
            }
            "gutter-width" => self.set_margin(leading_integer(value).ok_or_else(invalid)?),
            "dashlet-height" => {
                self.set_dashlet_height(leading_integer(value).ok_or_else(invalid)?)
            }
            "font-family-base" => self.set_font_family(value),
            "font-family-headings" => self.set_font_family_headings(value),
            "dark-theme" => match value {
                "true" => self.set_dark(true),
                "false" => self.set_dark(false),
                _ => return Err(invalid()),
            },
            _ => return Err(EditorError::UnknownSetting(name.to_string())),
        }
        Ok(())
    }

    /// The variable set written when the user applies the form
    pub fn to_variables(&self) -> ThemeVariableSet {
        let mut theme: ThemeVariableSet = self
            .colors
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let font_family = if GENERIC_FAMILIES.contains(&self.font_family.as_str()) {
            self.font_family.clone()
        } else {
            format!("\"{}\"", self.font_family)
        };

        theme.insert("font-size-base", format!("{}px", self.font_size));
        theme.insert("hidpi-scale-factor", format!("{}%", self.hidpi_scale));
        theme.insert("font-family-base", font_family);
        theme.insert(
            "font-family-headings",
            format!("\"{}\"", self.font_family_headings),
        );
        theme.insert("gutter-width", format!("{}px", self.margin));
        theme.insert("dashlet-height", format!("{}px", self.dashlet_height));
        theme.insert("dark-theme", if self.dark { "true" } else { "false" });

        let grays: Vec<&str> = if self.dark {
            GRAY_COLORS.iter().rev().copied().collect()
        } else {
            GRAY_COLORS.to_vec()
        };
        for (name, hex) in GRAY_NAMES.iter().zip(grays) {
            theme.insert(*name, format!("#{hex}"));
        }

        theme.insert(ENGINE_VERSION_VARIABLE, CURRENT_ENGINE_VERSION.to_string());
        theme
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn integer_or(theme: &ThemeVariableSet, name: &str, default: u32) -> u32 {
    theme.get(name).and_then(leading_integer).unwrap_or(default)
}

fn unquoted_or(theme: &ThemeVariableSet, name: &str, default: &str) -> String {
    theme
        .get(name)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .trim_matches('"')
        .to_string()
}

/// Fonts offered in the family pickers.
///
/// `Roboto` and `BebasNeue` come first, then the given system families
/// sorted; duplicates keep their first position.
pub fn available_fonts<I, S>(system_fonts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut system: Vec<String> = system_fonts.into_iter().map(Into::into).collect();
    system.sort();

    let mut seen = HashSet::new();
    ["Roboto".to_string(), "BebasNeue".to_string()]
        .into_iter()
        .chain(system)
        .filter(|font| seen.insert(font.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_set() {
        let editor = ThemeEditor::default();
        assert_eq!(editor.font_size(), 12);
        assert_eq!(editor.font_family(), "Roboto");
        assert_eq!(editor.font_family_headings(), "Montserrat");
        assert_eq!(editor.hidpi_scale(), 100);
        assert_eq!(editor.margin(), 30);
        assert_eq!(editor.dashlet_height(), 120);
        assert!(editor.dark());
        assert_eq!(editor.color("primary"), Some("#d98f40"));
        assert_eq!(editor.colors().count(), COLOR_DEFAULTS.len());
    }

    #[test]
    fn test_reads_saved_values() {
        let theme: ThemeVariableSet = [
            ("primary", "#112233"),
            ("font-size-base", "16px"),
            ("font-family-base", "\"Fira Sans\""),
            ("font-family-headings", "\"Oswald\""),
            ("gutter-width", "12px"),
            ("dashlet-height", "200px"),
            ("hidpi-scale-factor", "150%"),
            ("dark-theme", "false"),
        ]
        .into_iter()
        .collect();

        let editor = ThemeEditor::from_variables(&theme);
        assert_eq!(editor.color("primary"), Some("#112233"));
        assert_eq!(editor.font_size(), 16);
        assert_eq!(editor.font_family(), "Fira Sans");
        assert_eq!(editor.font_family_headings(), "Oswald");
        assert_eq!(editor.margin(), 12);
        assert_eq!(editor.dashlet_height(), 200);
        assert_eq!(editor.hidpi_scale(), 150);
        assert!(!editor.dark());
    }

    #[test]
    fn test_apply_output() {
        let mut editor = ThemeEditor::default();
        editor.set_font_family("sans-serif");
        let theme = editor.to_variables();

        assert_eq!(theme.get("font-size-base"), Some("12px"));
        assert_eq!(theme.get("hidpi-scale-factor"), Some("100%"));
        assert_eq!(theme.get("font-family-base"), Some("sans-serif"));
        assert_eq!(theme.get("font-family-headings"), Some("\"Montserrat\""));
        assert_eq!(theme.get("gutter-width"), Some("30px"));
        assert_eq!(theme.get("dashlet-height"), Some("120px"));
        assert_eq!(theme.get("dark-theme"), Some("true"));
        assert_eq!(theme.get("theme-engine-version"), Some("2"));
        assert_eq!(theme.get("primary"), Some("#d98f40"));

        editor.set_font_family("Roboto");
        assert_eq!(
            editor.to_variables().get("font-family-base"),
            Some("\"Roboto\"")
        );
    }

    #[test]
    fn test_gray_ramp_reverses_for_dark_themes() {
        let mut editor = ThemeEditor::default();
        let dark = editor.to_variables();
        assert_eq!(dark.get("gray-lighter"), Some("#2A2C2B"));
        assert_eq!(dark.get("gray-darker"), Some("#DEE2E6"));

        editor.set_dark(false);
        let light = editor.to_variables();
        assert_eq!(light.get("gray-lighter"), Some("#DEE2E6"));
        assert_eq!(light.get("gray"), Some("#A9A9A9"));
    }

    #[test]
    fn test_setters_clamp() {
        let mut editor = ThemeEditor::default();
        editor.set_font_size(100);
        assert_eq!(editor.font_size(), 24);
        editor.set_margin(200);
        assert_eq!(editor.margin(), 80);
        editor.set_dashlet_height(10);
        assert_eq!(editor.dashlet_height(), 50);
        editor.set_dashlet_height(123);
        assert_eq!(editor.dashlet_height(), 122);
    }

    #[test]
    fn test_set_by_name() {
        let mut editor = ThemeEditor::default();
        editor.set("accent", "#ABCDEF").unwrap();
        editor.set("font-size-base", "14px").unwrap();
        editor.set("dark-theme", "false").unwrap();

        assert_eq!(editor.color("accent"), Some("#abcdef"));
        assert_eq!(editor.font_size(), 14);
        assert!(!editor.dark());

        assert_eq!(
            editor.set("brand-primary", "#000000"),
            Err(EditorError::UnknownSetting("brand-primary".to_string()))
        );
        assert!(matches!(
            editor.set("accent", "blue"),
            Err(EditorError::InvalidColor { .. })
        ));
        assert!(matches!(
            editor.set("dark-theme", "maybe"),
            Err(EditorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_revert_discards_edits() {
        let saved = ThemeEditor::default().to_variables();
        let mut editor = ThemeEditor::from_variables(&saved);
        editor.set_margin(5);
        editor.set_color("primary", "#000000").unwrap();

        editor.revert(&saved);
        assert_eq!(editor, ThemeEditor::from_variables(&saved));
        assert_eq!(editor.margin(), 30);
    }

    #[test]
    fn test_available_fonts() {
        let fonts = available_fonts(["Verdana", "Arial", "Roboto", "Arial"]);
        assert_eq!(fonts, vec!["Roboto", "BebasNeue", "Arial", "Verdana"]);
    }
}
