//! Upgrade of themes written before the version-2 palette.
//!
//! A legacy theme only knows a handful of `brand-*` colors. When one is
//! loaded, the editor is handed a full version-2 palette derived from
//! them instead; the file on disk is left alone until the user saves.

use crate::color;
use crate::defaults::{
    COLOR_DEFAULTS, CURRENT_ENGINE_VERSION, ENGINE_VERSION_VARIABLE, IMPLICIT_ENGINE_VERSION,
    LEGACY_COLOR_MAP, legacy_source,
};
use crate::variables::ThemeVariableSet;
use std::collections::HashSet;

/// Palette generation a theme was written for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeState {
    /// Engine version below 2, including an absent version
    Legacy,
    Current,
}

impl ThemeState {
    pub fn from_version(version: u32) -> Self {
        if version < CURRENT_ENGINE_VERSION {
            ThemeState::Legacy
        } else {
            ThemeState::Current
        }
    }
}

/// Engine version of a variable set.
///
/// Absent or non-numeric versions count as version 1.
pub fn engine_version(variables: &ThemeVariableSet) -> u32 {
    variables
        .get(ENGINE_VERSION_VARIABLE)
        .and_then(|raw| leading_integer(raw))
        .unwrap_or(IMPLICIT_ENGINE_VERSION)
}

/// Parse the leading decimal digits of a value, `"2px"` -> 2
pub(crate) fn leading_integer(raw: &str) -> Option<u32> {
    let raw = raw.trim().trim_matches('"');
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn classify(variables: &ThemeVariableSet) -> ThemeState {
    ThemeState::from_version(engine_version(variables))
}

/// Whether the panel flags a theme as old.
///
/// A theme is flagged when its version is legacy and non-zero: an
/// explicit `theme-engine-version: 0` is treated as not old.
pub fn is_old_theme(version: u32) -> bool {
    version != 0 && ThemeState::from_version(version) == ThemeState::Legacy
}

/// Variables of a loaded theme as presented to the editor
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTheme {
    pub variables: ThemeVariableSet,
    pub engine_version: u32,
    pub is_old_theme: bool,
}

/// Prepare freshly read variables for editing, upgrading old themes
pub fn load(raw: ThemeVariableSet) -> LoadedTheme {
    let version = engine_version(&raw);
    let is_old = is_old_theme(version);
    let variables = match ThemeState::from_version(version) {
        ThemeState::Legacy => upgrade(&raw),
        ThemeState::Current => raw,
    };

    LoadedTheme {
        variables,
        engine_version: version,
        is_old_theme: is_old,
    }
}

/// Build a version-2 variable set from a legacy one.
///
/// Every palette color starts at its default. Colors with a legacy source
/// take the source value shaded by the mapped factor, falling back to the
/// default when the source is missing or not a color. Variables that are
/// neither palette colors nor legacy sources (fonts, spacing) carry over.
pub fn upgrade(legacy: &ThemeVariableSet) -> ThemeVariableSet {
    let mut upgraded = ThemeVariableSet::new();

    for entry in COLOR_DEFAULTS {
        let derived = legacy_source(entry.name).and_then(|source| {
            let raw = legacy.get(source.variable)?;
            let shaded = color::shade(raw, source.shade);
            if shaded.is_none() {
                log::warn!(
                    "Legacy color {}='{raw}' is not a hex color, using default for {}",
                    source.variable,
                    entry.name
                );
            }
            shaded
        });
        upgraded.insert(entry.name, derived.unwrap_or_else(|| entry.value.to_string()));
    }

    let consumed: HashSet<&str> = LEGACY_COLOR_MAP
        .iter()
        .map(|(_, source)| source.variable)
        .chain([ENGINE_VERSION_VARIABLE])
        .collect();
    for (name, value) in legacy {
        if !consumed.contains(name.as_str()) && !upgraded.contains(name) {
            upgraded.insert(name.as_str(), value.as_str());
        }
    }

    upgraded
}
