//! Fixed tables: the version-2 color palette, the mapping from legacy
//! color variables onto it, and the defaults of the editor form.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Name of the file holding a theme's variables
pub const VARIABLES_FILE: &str = "variables.scss";

/// Variable tagging the palette version a theme was written for
pub const ENGINE_VERSION_VARIABLE: &str = "theme-engine-version";

/// Palette version written by this crate
pub const CURRENT_ENGINE_VERSION: u32 = 2;

/// Version assumed when a theme carries no version variable
pub const IMPLICIT_ENGINE_VERSION: u32 = 1;

/// Theme selected after the current one is removed
pub const DEFAULT_THEME: &str = "default";

/// Prefix marking a logical name as referring to a bundled theme
pub const BUNDLED_PREFIX: &str = "__";

/// A canonical color variable and its fallback value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    pub name: &'static str,
    pub value: &'static str,
}

const fn entry(name: &'static str, value: &'static str) -> ColorEntry {
    ColorEntry { name, value }
}

pub const COLOR_DEFAULTS: &[ColorEntry] = &[
    entry("primary", "#d98f40"),
    entry("primary-darker", "#c87b28"),
    entry("primary-lighter", "#e0a362"),
    entry("secondary", "#2a2c2b"),
    entry("secondary-darker", "#161717"),
    entry("secondary-lighter", "#3e413f"),
    entry("tertiary", "#dddddd"),
    entry("tertiary-darker", "#c9c9c9"),
    entry("tertiary-lighter", "#f1f1f1"),
    // Backgrounds
    entry("background-primary", "#101010"),
    entry("background-secondary", "#181818"),
    entry("background-tertiary", "#222222"),
    entry("content-primary", "#1c1c1c"),
    entry("content-secondary", "#2b2d2f"),
    // Statuses
    entry("error", "#cc0000"),
    entry("error-darker", "#a30000"),
    entry("error-lighter", "#f50000"),
    entry("warning", "#f4b740"),
    entry("warning-darker", "#f2a819"),
    entry("warning-lighter", "#f6c667"),
    entry("success", "#1c8930"),
    entry("success-darker", "#156724"),
    entry("success-lighter", "#23ab3c"),
    entry("accent", "#388ffa"),
    entry("accent-darker", "#1079f9"),
    entry("accent-lighter", "#60a5fb"),
    // Borders
    entry("border-structural", "#303236"),
    entry("border-container", "#3c3f44"),
    // Fonts
    entry("font-primary-dark", "#ffffff"),
    entry("font-secondary-dark", "#aaaaaa"),
    entry("font-tertiary-dark", "#5a5a5a"),
    entry("font-primary-light", "#303030"),
    entry("font-secondary-light", "#666666"),
    entry("font-tertiary-light", "#b3b3b3"),
];

static COLOR_DEFAULT_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    COLOR_DEFAULTS
        .iter()
        .map(|entry| (entry.name, entry.value))
        .collect()
});

/// Default value of a canonical color, `None` for names outside the palette
pub fn color_default(name: &str) -> Option<&'static str> {
    COLOR_DEFAULT_INDEX.get(name).copied()
}

/// How one version-2 color is derived from a legacy variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacySource {
    pub variable: &'static str,
    /// Negative shifts toward black, positive toward white
    pub shade: f64,
}

const fn legacy(
    new_name: &'static str,
    variable: &'static str,
    shade: f64,
) -> (&'static str, LegacySource) {
    (new_name, LegacySource { variable, shade })
}

/// Legacy-to-current mapping. Tertiary and border colors had no
/// counterpart before version 2 and keep their defaults.
pub const LEGACY_COLOR_MAP: &[(&str, LegacySource)] = &[
    legacy("primary", "brand-primary", 0.0),
    legacy("primary-darker", "brand-primary", -0.22),
    legacy("primary-lighter", "brand-primary", 0.22),
    legacy("secondary", "brand-menu", 0.0),
    legacy("secondary-darker", "brand-menu", -0.22),
    legacy("secondary-lighter", "brand-menu", 0.22),
    legacy("background-primary", "brand-menu", 0.0),
    legacy("background-secondary", "brand-bg", 0.0),
    legacy("background-tertiary", "brand-bg", -0.22),
    legacy("content-primary", "brand-menu", 0.0),
    legacy("content-secondary", "brand-menu", 0.0),
    legacy("error", "brand-danger", 0.0),
    legacy("error-darker", "brand-danger", -0.22),
    legacy("error-lighter", "brand-danger", 0.22),
    legacy("warning", "brand-warning", 0.0),
    legacy("warning-darker", "brand-warning", -0.22),
    legacy("warning-lighter", "brand-warning", 0.22),
    legacy("success", "brand-success", 0.0),
    legacy("success-darker", "brand-success", -0.22),
    legacy("success-lighter", "brand-success", 0.22),
    legacy("accent", "brand-highlight", 0.0),
    legacy("accent-darker", "brand-highlight", -0.22),
    legacy("accent-lighter", "brand-highlight", 0.22),
    legacy("font-primary-dark", "text-color", 0.0),
    legacy("font-secondary-dark", "text-color", 0.22),
    legacy("font-tertiary-dark", "text-color", 0.33),
    legacy("font-primary-light", "text-color", 0.0),
    legacy("font-secondary-light", "text-color", 0.22),
    legacy("font-tertiary-light", "text-color", 0.33),
];

/// Legacy source for a version-2 color, if it has one
pub fn legacy_source(new_name: &str) -> Option<LegacySource> {
    LEGACY_COLOR_MAP
        .iter()
        .find(|(name, _)| *name == new_name)
        .map(|(_, source)| *source)
}

// Editor form defaults
pub const DEFAULT_FONT_SIZE: u32 = 12;
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";
pub const DEFAULT_FONT_FAMILY_HEADINGS: &str = "Montserrat";
pub const DEFAULT_HIDPI_SCALE: u32 = 100;
pub const DEFAULT_MARGIN: u32 = 30;
pub const DEFAULT_DASHLET_HEIGHT: u32 = 120;
pub const DEFAULT_DARK: bool = true;

/// Fonts offered before system fonts have been enumerated
pub const STANDARD_FONTS: &[&str] = &[
    "Roboto",
    "Montserrat",
    "BebasNeue",
    "sans-serif",
    "serif",
    "Arial",
    "Courier New",
    "Georgia",
    "Impact",
    "Marlett",
    "Monaco",
    "Tahoma",
    "Times New Roman",
    "Verdana",
];

/// Gray ramp variable names, lightest first
pub const GRAY_NAMES: &[&str] = &[
    "gray-lighter",
    "gray-light",
    "gray",
    "gray-dark",
    "gray-darker",
];

/// Gray ramp for light themes; reversed for dark ones
pub const GRAY_COLORS: &[&str] = &["DEE2E6", "DDDDDD", "A9A9A9", "4C4C4C", "2A2C2B"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_names_are_unique() {
        assert_eq!(COLOR_DEFAULT_INDEX.len(), COLOR_DEFAULTS.len());
        assert_eq!(COLOR_DEFAULTS.len(), 34);
    }

    #[test]
    fn test_legacy_map_targets_palette() {
        for (name, source) in LEGACY_COLOR_MAP {
            assert!(color_default(name).is_some(), "{name} is not a palette color");
            assert!((-1.0..=1.0).contains(&source.shade));
        }
    }

    #[test]
    fn test_unmapped_colors() {
        assert!(legacy_source("tertiary").is_none());
        assert!(legacy_source("border-container").is_none());
        assert_eq!(legacy_source("primary-darker").map(|s| s.shade), Some(-0.22));
    }
}
