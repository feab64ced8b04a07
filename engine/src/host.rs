//! Narrow interfaces to the services the hosting application provides.
//!
//! The theme panel never draws anything or talks to the user directly.
//! Dialogs, notifications, stylesheet loading, opening files, and the
//! persisted "current theme" setting all go through these traits.

use crate::error::{ThemeError, ThemeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Notification sent to settings subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEvent {
    /// The current theme changed
    Selected(String),
    /// The current theme's files changed and should be applied again
    Reloaded(String),
}

impl ThemeEvent {
    pub fn theme(&self) -> &str {
        match self {
            ThemeEvent::Selected(name) | ThemeEvent::Reloaded(name) => name,
        }
    }
}

/// Host-wide setting holding the current theme name
pub trait SettingsStore: Send + Sync {
    /// `None` when no theme was ever selected
    fn current_theme(&self) -> Option<String>;

    /// Record the new current theme and emit [`ThemeEvent::Selected`]
    fn set_current_theme(&self, name: &str) -> ThemeResult<()>;

    /// Deliver an event to every subscriber
    fn emit(&self, event: ThemeEvent);

    /// Receive every event emitted from now on
    fn subscribe(&self) -> Receiver<ThemeEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Question,
    Info,
    Error,
}

/// A text field in a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogInput {
    pub id: String,
    pub placeholder: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub title: String,
    pub text: Option<String>,
    /// Validation message shown above the inputs
    pub error: Option<String>,
    pub inputs: Vec<DialogInput>,
    /// Button labels, in display order
    pub actions: Vec<String>,
}

impl DialogRequest {
    pub fn new(kind: DialogKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            text: None,
            error: None,
            inputs: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn with_input(mut self, id: &str, placeholder: &str, value: &str) -> Self {
        self.inputs.push(DialogInput {
            id: id.to_string(),
            placeholder: placeholder.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_actions(mut self, actions: &[&str]) -> Self {
        self.actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// What the user did with a dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogResult {
    /// Label of the chosen action
    pub action: String,
    /// Final field values by input id
    pub input: HashMap<String, String>,
}

impl DialogResult {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            input: HashMap::new(),
        }
    }

    pub fn with_input(mut self, id: &str, value: &str) -> Self {
        self.input.insert(id.to_string(), value.to_string());
        self
    }
}

#[async_trait]
pub trait DialogService: Send + Sync {
    /// Show a dialog and wait until the user picks an action
    async fn show(&self, request: DialogRequest) -> ThemeResult<DialogResult>;
}

/// User-visible error notifications
pub trait Notifier: Send + Sync {
    /// `allow_report` is false for failures caused outside the application
    fn show_error(&self, title: &str, error: &ThemeError, allow_report: bool);
}

/// The stylesheet fragments a theme may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylesheetSlot {
    Variables,
    Details,
    Fonts,
    Style,
}

impl StylesheetSlot {
    pub const ALL: [StylesheetSlot; 4] = [
        StylesheetSlot::Variables,
        StylesheetSlot::Details,
        StylesheetSlot::Fonts,
        StylesheetSlot::Style,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StylesheetSlot::Variables => "variables",
            StylesheetSlot::Details => "details",
            StylesheetSlot::Fonts => "fonts",
            StylesheetSlot::Style => "style",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.scss", self.key())
    }
}

/// Loads theme stylesheets into the host's style pipeline
pub trait StylesheetApplier: Send + Sync {
    /// `None` clears the slot. Paths carry no extension.
    fn set_stylesheet(&self, slot: StylesheetSlot, path: Option<&Path>);

    /// Drop every loaded stylesheet
    fn clear(&self);
}

/// Why a file could not be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenFailure {
    /// No application is associated with the file type
    NoHandler(PathBuf),
    Other(String),
}

/// Opens files with the user's preferred application
pub trait FileOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<(), OpenFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_file_names() {
        let names: Vec<String> = StylesheetSlot::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(
            names,
            vec!["variables.scss", "details.scss", "fonts.scss", "style.scss"]
        );
    }

    #[test]
    fn test_dialog_request_builder() {
        let request = DialogRequest::new(DialogKind::Question, "Enter a name")
            .with_error(Some("Name already used.".to_string()))
            .with_input("name", "Theme Name", "default")
            .with_actions(&["Cancel", "Clone"]);

        assert_eq!(request.inputs[0].value, "default");
        assert_eq!(request.actions, vec!["Cancel", "Clone"]);
        assert!(request.text.is_none());
    }
}
