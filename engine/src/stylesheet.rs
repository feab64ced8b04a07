use crate::host::{StylesheetApplier, StylesheetSlot};
use crate::resolver::ThemeResolver;

/// Load the stylesheets of a theme into the host.
///
/// Every slot whose `.scss` file exists in the theme directory is set,
/// the others are cleared. `None` means "no theme" and clears the
/// variables, fonts and style slots. A name that does not resolve leaves
/// the host untouched. Unless `initial`, everything loaded before is
/// cleared first.
pub async fn apply_theme(
    applier: &dyn StylesheetApplier,
    resolver: &ThemeResolver,
    theme: Option<&str>,
    initial: bool,
) {
    if !initial {
        applier.clear();
    }

    let Some(theme) = theme else {
        applier.set_stylesheet(StylesheetSlot::Variables, None);
        applier.set_stylesheet(StylesheetSlot::Fonts, None);
        applier.set_stylesheet(StylesheetSlot::Style, None);
        return;
    };

    let Some(dir) = resolver.resolve(theme) else {
        log::warn!("Theme '{theme}' not found, stylesheets left unchanged");
        return;
    };

    for slot in StylesheetSlot::ALL {
        let file = dir.join(slot.file_name());
        match tokio::fs::metadata(&file).await {
            Ok(_) => applier.set_stylesheet(slot, Some(&dir.join(slot.key()))),
            Err(_) => applier.set_stylesheet(slot, None),
        }
    }
    log::info!("Applied theme '{theme}' from {}", dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{CaseSensitive, ThemeRoots};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingApplier {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingApplier {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StylesheetApplier for RecordingApplier {
        fn set_stylesheet(&self, slot: StylesheetSlot, path: Option<&Path>) {
            let target = path
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "-".to_string());
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}={target}", slot.key()));
        }

        fn clear(&self) {
            self.calls.lock().unwrap().push("clear".to_string());
        }
    }

    fn resolver_with(dir: &TempDir, files: &[&str]) -> ThemeResolver {
        let theme = dir.path().join("user").join("mine");
        std::fs::create_dir_all(&theme).unwrap();
        for file in files {
            std::fs::write(theme.join(file), "").unwrap();
        }
        let roots = ThemeRoots::new(dir.path().join("bundled"), dir.path().join("user"));
        ThemeResolver::with_themes(roots, vec![theme], Arc::new(CaseSensitive))
    }

    #[tokio::test]
    async fn test_sets_present_slots_and_clears_missing() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with(&dir, &["variables.scss", "style.scss"]);
        let applier = RecordingApplier::default();

        apply_theme(&applier, &resolver, Some("mine"), false).await;

        assert_eq!(
            applier.calls(),
            vec![
                "clear",
                "variables=variables",
                "details=-",
                "fonts=-",
                "style=style"
            ]
        );
    }

    #[tokio::test]
    async fn test_initial_application_does_not_clear() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with(&dir, &["fonts.scss"]);
        let applier = RecordingApplier::default();

        apply_theme(&applier, &resolver, Some("mine"), true).await;

        assert_eq!(applier.calls()[0], "variables=-");
        assert!(applier.calls().contains(&"fonts=fonts".to_string()));
    }

    #[tokio::test]
    async fn test_no_theme_clears_three_slots() {
        let resolver = ThemeResolver::with_themes(
            ThemeRoots::new("/b", "/u"),
            Vec::<PathBuf>::new(),
            Arc::new(CaseSensitive),
        );
        let applier = RecordingApplier::default();

        apply_theme(&applier, &resolver, None, true).await;

        assert_eq!(applier.calls(), vec!["variables=-", "fonts=-", "style=-"]);
    }

    #[tokio::test]
    async fn test_unknown_theme_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with(&dir, &["variables.scss"]);
        let applier = RecordingApplier::default();

        apply_theme(&applier, &resolver, Some("ghost"), true).await;

        assert!(applier.calls().is_empty());
    }
}
