use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ThemeNameError;

/// Errors produced by theme operations.
///
/// Absent files are not errors in this crate: a missing `variables.scss`
/// or a missing legacy color simply means defaults apply. What remains
/// falls into three groups:
///
/// ## Recoverable, user-facing
/// - [`NameValidation`] - a clone target name was rejected; the caller
///   re-prompts with [`ThemeNameError::user_message`].
/// - [`Io`] - a read or write failed. Use [`ThemeError::is_not_found`] to
///   tell external interference (directory removed behind our back) apart
///   from genuine defects.
///
/// ## Refused operations
/// - [`ThemeNotFound`] - the name does not resolve to a scanned directory.
/// - [`ReadOnly`] - saving or editing a bundled theme.
///
/// ## Collaborator failures
/// - [`Settings`], [`Dialog`], [`Open`]
///
/// ## Invariant violations
/// - [`NotRemovable`] - removal was requested for a bundled or unknown
///   theme. The panel never offers this, so hitting it is a bug.
///
/// [`NameValidation`]: ThemeError::NameValidation
/// [`Io`]: ThemeError::Io
/// [`ThemeNotFound`]: ThemeError::ThemeNotFound
/// [`ReadOnly`]: ThemeError::ReadOnly
/// [`Settings`]: ThemeError::Settings
/// [`Dialog`]: ThemeError::Dialog
/// [`Open`]: ThemeError::Open
/// [`NotRemovable`]: ThemeError::NotRemovable
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid theme name: {0}")]
    NameValidation(#[from] ThemeNameError),

    #[error("Theme '{name}' cannot be removed: {reason}")]
    NotRemovable { name: String, reason: String },

    #[error("Theme '{0}' not found")]
    ThemeNotFound(String),

    #[error("Theme '{0}' is bundled and read-only, clone it to make changes")]
    ReadOnly(String),

    #[error("Settings store error: {0}")]
    Settings(String),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },
}

impl ThemeError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure means "the path is gone".
    ///
    /// Such failures are caused by something outside the application
    /// (antivirus, manual deletion) and are not reported as bugs.
    pub fn is_not_found(&self) -> bool {
        match self {
            ThemeError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            ThemeError::ThemeNotFound(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for theme operations
pub type ThemeResult<T> = Result<T, ThemeError>;
