use engine::ThemeError;
use engine::editor::EditorError;
use thiserror::Error;

/// Errors surfaced by the command-line host.
///
/// Theme operation failures keep their [`ThemeError`] so `main` can tell
/// "not found" conditions apart from defects.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// A `set` command named an unknown field or gave a bad value
    #[error("Invalid setting: {0}")]
    Editor(#[from] EditorError),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// Writing command output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
