//! The `variables.scss` format.
//!
//! Each theme directory carries one file of SCSS variable assignments:
//!
//! ```text
//! // Automatically generated. Changes to this file will be overwritten.
//! $primary: #d98f40;
//! $font-size-base: 12px;
//! ```
//!
//! Lines are CRLF-separated on write. Reading is permissive: anything that
//! does not look like an assignment is skipped, and a missing or
//! unreadable file reads as an empty set so defaults apply.

use crate::defaults::VARIABLES_FILE;
use crate::error::{ThemeError, ThemeResult};
use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};
use std::path::Path;

/// First line of every generated variables file
pub const GENERATED_HEADER: &str =
    "// Automatically generated. Changes to this file will be overwritten.";

const LINE_SEPARATOR: &str = "\r\n";

/// Theme variables by name, in insertion order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeVariableSet {
    entries: IndexMap<String, String>,
}

impl ThemeVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Insert or overwrite; an overwritten key keeps its position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ThemeVariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ThemeVariableSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for ThemeVariableSet {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ThemeVariableSet {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Render variables as the contents of `variables.scss`.
///
/// Values are written verbatim; they must not contain line breaks.
pub fn serialize(variables: &ThemeVariableSet) -> String {
    let lines: Vec<String> = variables
        .iter()
        .map(|(name, value)| format!("${name}: {value};"))
        .collect();

    format!(
        "{GENERATED_HEADER}{LINE_SEPARATOR}{}",
        lines.join(LINE_SEPARATOR)
    )
}

/// Parse the contents of `variables.scss`. Never fails.
///
/// Keys are trimmed before the leading `$` is stripped, and lines whose
/// key ends up empty are skipped. A set with blank or space-padded keys
/// therefore does not survive a write and read back; every key the
/// editor and the upgrader produce is a plain variable name.
pub fn deserialize(text: &str) -> ThemeVariableSet {
    let mut variables = ThemeVariableSet::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim();
        let key = key.strip_prefix('$').unwrap_or(key);
        if key.is_empty() {
            continue;
        }

        let value = value.trim().trim_end_matches(';');
        variables.insert(key, value);
    }

    variables
}

/// Read a theme directory's variables; missing or unreadable reads as empty
pub async fn read_variables(theme_dir: &Path) -> ThemeVariableSet {
    let path = theme_dir.join(VARIABLES_FILE);
    match tokio::fs::read(&path).await {
        Ok(bytes) => deserialize(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            // no variables set, that's fine, defaults are used
            log::debug!("No variables read from {}: {e}", path.display());
            ThemeVariableSet::new()
        }
    }
}

/// Overwrite a theme directory's variables file
pub async fn write_variables(theme_dir: &Path, variables: &ThemeVariableSet) -> ThemeResult<()> {
    let path = theme_dir.join(VARIABLES_FILE);
    tokio::fs::write(&path, serialize(variables))
        .await
        .map_err(|e| ThemeError::io(&path, e))?;
    log::debug!("Wrote {} variables to {}", variables.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_format() {
        let variables: ThemeVariableSet = [("primary", "#d98f40"), ("font-size-base", "12px")]
            .into_iter()
            .collect();

        assert_eq!(
            serialize(&variables),
            "// Automatically generated. Changes to this file will be overwritten.\r\n\
             $primary: #d98f40;\r\n\
             $font-size-base: 12px;"
        );
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let mut variables = ThemeVariableSet::new();
        variables.insert("zeta", "1");
        variables.insert("alpha", "2");
        variables.insert("zeta", "3");

        let text = serialize(&variables);
        let zeta = text.find("$zeta: 3;").unwrap();
        let alpha = text.find("$alpha: 2;").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_deserialize_generated_file() {
        let text = "// Automatically generated. Changes to this file will be overwritten.\r\n\
                    $primary: #d98f40;\r\n\
                    $font-family-base: \"Roboto\";;\r\n\
                    $dark-theme: true;";
        let variables = deserialize(text);

        assert_eq!(variables.len(), 3);
        assert_eq!(variables.get("primary"), Some("#d98f40"));
        assert_eq!(variables.get("font-family-base"), Some("\"Roboto\""));
        assert_eq!(variables.get("dark-theme"), Some("true"));
    }

    #[test]
    fn test_deserialize_is_permissive() {
        assert!(deserialize("").is_empty());
        assert!(deserialize("no colon here\r\n\r\n;;;").is_empty());
        assert!(deserialize("$: orphan;").is_empty());

        let variables = deserialize("garbage\r\n$ok: 1;\r\nmore garbage");
        assert_eq!(variables.get("ok"), Some("1"));
        assert_eq!(variables.len(), 1);
    }

    #[test]
    fn test_deserialize_splits_on_first_colon_only() {
        let variables = deserialize("$font-url: url(http://example.com/a.woff);");
        assert_eq!(
            variables.get("font-url"),
            Some("url(http://example.com/a.woff)")
        );
    }

    #[test]
    fn test_deserialize_last_duplicate_wins() {
        let variables = deserialize("$a: 1;\r\n$a: 2;");
        assert_eq!(variables.get("a"), Some("2"));
    }

    #[test]
    fn test_deserialize_accepts_bare_newlines() {
        let variables = deserialize("$a: 1;\n$b: 2;\n");
        assert_eq!(variables.get("a"), Some("1"));
        assert_eq!(variables.get("b"), Some("2"));
    }

    #[test]
    fn test_empty_set_roundtrip() {
        let empty = ThemeVariableSet::new();
        assert_eq!(deserialize(&serialize(&empty)), empty);
    }

    #[test]
    fn test_deserialize_normalizes_keys() {
        let parsed = deserialize("  $padded : 1px;\r\n$: orphan;\r\n : blank;");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("padded"), Some("1px"));
    }
}
