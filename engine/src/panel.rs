//! The theme settings panel.
//!
//! [`ThemePanel`] owns the scanned theme list and the variables of the
//! current theme, and implements what the user can do from the panel:
//! select, clone, remove, save edits, reload and open the stylesheet for
//! manual editing. Everything that needs the user or the host goes
//! through the collaborators in [`PanelServices`].
//!
//! Operations run one at a time from user actions. Within a clone the
//! new variables file is written before sibling files are copied, and
//! the clone becomes selectable only once both exist.

use crate::defaults::{
    CURRENT_ENGINE_VERSION, DEFAULT_THEME, ENGINE_VERSION_VARIABLE, VARIABLES_FILE,
};
use crate::editor::ThemeEditor;
use crate::error::{ThemeError, ThemeResult};
use crate::host::{
    DialogKind, DialogRequest, DialogService, FileOpener, Notifier, OpenFailure, SettingsStore,
    StylesheetApplier, ThemeEvent,
};
use crate::resolver::{ThemeDescriptor, ThemeResolver, dir_name};
use crate::stylesheet::apply_theme;
use crate::upgrade::{self, LoadedTheme, ThemeState};
use crate::validation::{ThemeNameValidator, UniqueNameValidator, Validator};
use crate::variables::{ThemeVariableSet, read_variables, write_variables};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;

const CLONE_ACTION: &str = "Clone";
const CONFIRM_ACTION: &str = "Confirm";
const CANCEL_ACTION: &str = "Cancel";
const NAME_INPUT: &str = "name";

/// Host collaborators used by the panel
#[derive(Clone)]
pub struct PanelServices {
    pub settings: Arc<dyn SettingsStore>,
    pub dialogs: Arc<dyn DialogService>,
    pub notifier: Arc<dyn Notifier>,
    pub opener: Arc<dyn FileOpener>,
}

pub struct ThemePanel {
    resolver: ThemeResolver,
    services: PanelServices,
    loaded: LoadedTheme,
    editor: ThemeEditor,
}

impl ThemePanel {
    pub fn new(resolver: ThemeResolver, services: PanelServices) -> Self {
        Self {
            resolver,
            services,
            loaded: upgrade::load(ThemeVariableSet::new()),
            editor: ThemeEditor::default(),
        }
    }

    /// Scan theme directories and load the current theme
    pub async fn mount(&mut self) {
        self.resolver.rescan().await;
        self.reload().await;
    }

    pub fn resolver(&self) -> &ThemeResolver {
        &self.resolver
    }

    /// Current theme name, or the default sentinel when none is set
    pub fn current_theme(&self) -> String {
        self.services
            .settings
            .current_theme()
            .unwrap_or_else(|| DEFAULT_THEME.to_string())
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.resolver
            .resolve(&self.current_theme())
            .map(Path::to_path_buf)
    }

    /// False for bundled themes, which must be cloned before editing
    pub fn is_editable(&self) -> bool {
        self.resolver.is_editable(&self.current_theme())
    }

    pub fn is_old_theme(&self) -> bool {
        self.loaded.is_old_theme
    }

    /// Variables of the current theme as handed to the editor
    pub fn variables(&self) -> &ThemeVariableSet {
        &self.loaded.variables
    }

    pub fn editor(&self) -> &ThemeEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ThemeEditor {
        &mut self.editor
    }

    pub fn theme_names(&self) -> Vec<String> {
        self.resolver.names()
    }

    pub async fn descriptors(&self) -> Vec<ThemeDescriptor> {
        self.resolver.descriptors().await
    }

    /// Re-read the current theme's variables and reset the editor
    pub async fn reload(&mut self) {
        let theme = self.current_theme();
        let raw = match self.resolver.resolve(&theme) {
            Some(dir) => read_variables(dir).await,
            None => {
                log::debug!("Current theme '{theme}' not resolved, using defaults");
                ThemeVariableSet::new()
            }
        };

        self.loaded = upgrade::load(raw);
        if self.loaded.is_old_theme {
            log::info!(
                "Theme '{theme}' uses engine version {}, showing upgraded palette",
                self.loaded.engine_version
            );
        }
        self.editor = ThemeEditor::from_variables(&self.loaded.variables);
    }

    /// Record a new current theme and notify subscribers. No file I/O.
    ///
    /// The name must resolve, except for the default sentinel.
    pub fn select(&self, name: &str) -> ThemeResult<()> {
        let name = match self.resolver.resolve(name) {
            Some(path) => dir_name(path),
            None if name == DEFAULT_THEME => name.to_string(),
            None => return Err(ThemeError::ThemeNotFound(name.to_string())),
        };
        self.services.settings.set_current_theme(&name)?;
        log::info!("Selected theme '{name}'");
        Ok(())
    }

    /// Select and load a theme
    pub async fn switch_to(&mut self, name: &str) -> ThemeResult<()> {
        self.select(name)?;
        self.reload().await;
        Ok(())
    }

    /// Ask the host to apply the current theme again
    pub fn refresh(&self) {
        self.services
            .settings
            .emit(ThemeEvent::Reloaded(self.current_theme()));
    }

    /// Load the current theme's stylesheets through `applier`
    pub async fn apply_stylesheets(&self, applier: &dyn StylesheetApplier, initial: bool) {
        let theme = self.current_theme();
        apply_theme(applier, &self.resolver, Some(&theme), initial).await;
    }

    /// Reject names that are invalid or already taken
    pub fn validate_new_name(&self, name: &str) -> ThemeResult<()> {
        ThemeNameValidator.validate(name)?;
        UniqueNameValidator::new(self.resolver.names(), self.resolver.normalizer())
            .validate(name)?;
        Ok(())
    }

    /// Prompt for a name and clone the current theme under it.
    ///
    /// Invalid names re-open the prompt with the reason. Returns the new
    /// theme's name, or `None` when the user cancelled.
    pub async fn clone_theme(&mut self) -> ThemeResult<Option<String>> {
        let mut error: Option<String> = None;
        let name = loop {
            let request = DialogRequest::new(DialogKind::Question, "Enter a name")
                .with_error(error.take())
                .with_input(NAME_INPUT, "Theme Name", &self.current_theme())
                .with_actions(&[CANCEL_ACTION, CLONE_ACTION]);
            let result = self.services.dialogs.show(request).await?;

            if result.action != CLONE_ACTION {
                return Ok(None);
            }

            let name = result.input.get(NAME_INPUT).cloned().unwrap_or_default();
            match self.validate_new_name(&name) {
                Ok(()) => break name,
                Err(ThemeError::NameValidation(e)) => {
                    log::debug!("Rejected clone name '{name}': {e}");
                    error = Some(e.user_message());
                }
                Err(e) => return Err(e),
            }
        };

        self.clone_as(&name).await.map(Some)
    }

    /// Clone the current theme under `name` without prompting
    pub async fn clone_as(&mut self, name: &str) -> ThemeResult<String> {
        self.validate_new_name(name)?;

        match self.create_clone(name).await {
            Ok(target) => {
                self.resolver.register(target);
                self.switch_to(name).await?;
                log::info!("Cloned theme '{name}'");
                Ok(name.to_string())
            }
            Err(e) => {
                self.services.notifier.show_error(
                    "Failed to read theme directory",
                    &e,
                    !e.is_not_found(),
                );
                Err(e)
            }
        }
    }

    async fn create_clone(&self, name: &str) -> ThemeResult<PathBuf> {
        let target = self.resolver.roots().user.join(name);

        tokio::fs::create_dir_all(&target)
            .await
            .map_err(|e| ThemeError::io(&target, e))?;

        if let Err(e) = self.fill_clone(&target).await {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&target).await {
                log::error!(
                    "Failed to remove incomplete clone {}: {cleanup}",
                    target.display()
                );
            }
            return Err(e);
        }
        Ok(target)
    }

    async fn fill_clone(&self, target: &Path) -> ThemeResult<()> {
        // an upgraded palette is already in the current format
        let mut variables = self.loaded.variables.clone();
        if ThemeState::from_version(self.loaded.engine_version) == ThemeState::Legacy {
            variables.insert(ENGINE_VERSION_VARIABLE, CURRENT_ENGINE_VERSION.to_string());
        }
        write_variables(target, &variables).await?;

        let Some(source) = self.current_path() else {
            return Ok(());
        };
        let copied =
            copy_dir_contents(source.clone(), target.to_path_buf(), Some(VARIABLES_FILE)).await;
        match copied {
            Err(e) if e.is_not_found() => {
                if tokio::fs::try_exists(&source).await.unwrap_or(false) {
                    return Err(e);
                }
                log::warn!(
                    "Clone source {} disappeared, cloning variables only",
                    source.display()
                );
                Ok(())
            }
            result => result,
        }
    }

    /// Ask for confirmation and remove the current theme.
    ///
    /// Only user themes can be removed; calling this for a bundled or
    /// unknown theme is a programming error and fails immediately. After
    /// confirmation the default theme is selected first, then the
    /// directory is deleted in the background. Deletion failures are only
    /// logged. Returns the deletion task, or `None` when cancelled.
    pub async fn remove_theme(&mut self) -> ThemeResult<Option<JoinHandle<()>>> {
        let theme = self.current_theme();
        let path = match self.resolver.resolve(&theme) {
            Some(path) if self.resolver.roots().is_user_path(path) => path.to_path_buf(),
            Some(_) => {
                return Err(ThemeError::NotRemovable {
                    name: theme,
                    reason: "bundled themes are read-only".to_string(),
                });
            }
            None => {
                return Err(ThemeError::NotRemovable {
                    name: theme,
                    reason: "theme is not installed".to_string(),
                });
            }
        };

        let request = DialogRequest::new(DialogKind::Question, "Confirm removal")
            .with_text(format!(
                "Are you sure you want to remove the theme \"{theme}\""
            ))
            .with_actions(&[CANCEL_ACTION, CONFIRM_ACTION]);
        let result = self.services.dialogs.show(request).await?;
        if result.action != CONFIRM_ACTION {
            return Ok(None);
        }

        self.switch_to(DEFAULT_THEME).await?;
        self.resolver.forget(&path);

        Ok(Some(tokio::spawn(async move {
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => log::info!("Removed theme {}", path.display()),
                Err(e) => log::error!("Failed to remove theme {}: {e}", path.display()),
            }
        })))
    }

    /// Write the editor's values to the current theme.
    ///
    /// Failures are reported through the notifier; "not found" failures
    /// are marked as not reportable.
    pub async fn save(&mut self) -> ThemeResult<()> {
        let theme = self.current_theme();
        let variables = self.editor.to_variables();

        let result = match self.current_path() {
            Some(dir) if self.resolver.roots().is_user_path(&dir) => {
                write_variables(&dir, &variables).await
            }
            Some(_) => Err(ThemeError::ReadOnly(theme.clone())),
            None => Err(ThemeError::ThemeNotFound(theme.clone())),
        };

        match result {
            Ok(()) => {
                self.loaded = upgrade::load(variables);
                self.editor = ThemeEditor::from_variables(&self.loaded.variables);
                log::info!("Saved theme '{theme}'");
                self.services.settings.emit(ThemeEvent::Reloaded(theme));
                Ok(())
            }
            Err(e) => {
                self.services
                    .notifier
                    .show_error("Unable to save theme", &e, !e.is_not_found());
                Err(e)
            }
        }
    }

    /// Make sure `style.scss` exists and open it in the user's editor
    pub async fn edit_manually(&self) -> ThemeResult<PathBuf> {
        let theme = self.current_theme();
        let dir = match self.current_path() {
            Some(dir) if self.resolver.roots().is_user_path(&dir) => dir,
            Some(_) => return Err(ThemeError::ReadOnly(theme)),
            None => return Err(ThemeError::ThemeNotFound(theme)),
        };

        let style = dir.join("style.scss");
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&style)
            .await
            .map_err(|e| ThemeError::io(&style, e))?;

        match self.services.opener.open(&style) {
            Ok(()) => Ok(style),
            Err(OpenFailure::NoHandler(path)) => {
                let request = DialogRequest::new(DialogKind::Error, "No handler found")
                    .with_text(format!(
                        "You don't have an editor associated with scss files. \
                         You can fix this by opening the following file from your file \
                         explorer, pick your favorite text editor and when prompted, choose \
                         to always open that file type with that editor.\n{}",
                        path.display()
                    ))
                    .with_actions(&["Close"]);
                self.services.dialogs.show(request).await?;
                Err(ThemeError::Open {
                    path,
                    reason: "no application associated with scss files".to_string(),
                })
            }
            Err(OpenFailure::Other(reason)) => {
                log::error!("Failed to open {}: {reason}", style.display());
                Err(ThemeError::Open {
                    path: style,
                    reason,
                })
            }
        }
    }
}

/// Copy everything in `source` into `target`, recursing into directories.
///
/// A top-level entry named `skip` is left out.
fn copy_dir_contents(
    source: PathBuf,
    target: PathBuf,
    skip: Option<&'static str>,
) -> Pin<Box<dyn Future<Output = ThemeResult<()>> + Send>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(&source)
            .await
            .map_err(|e| ThemeError::io(&source, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ThemeError::io(&source, e))?
        {
            let name = entry.file_name();
            if skip.is_some_and(|skip| name == skip) {
                continue;
            }

            let from = entry.path();
            let to = target.join(&name);
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ThemeError::io(&from, e))?;

            if file_type.is_dir() {
                tokio::fs::create_dir_all(&to)
                    .await
                    .map_err(|e| ThemeError::io(&to, e))?;
                copy_dir_contents(from, to, None).await?;
            } else {
                tokio::fs::copy(&from, &to)
                    .await
                    .map_err(|e| ThemeError::io(&from, e))?;
            }
        }
        Ok(())
    })
}
