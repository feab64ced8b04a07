use crate::error::{AppError, AppResult};
use config::{Config, Environment, File};
use engine::resolver::{CaseInsensitive, CaseSensitive, NameNormalizer, platform_normalizer};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_DIR: &str = "themeshop";
const CONFIG_FILE: &str = "themeshop.toml";
const ENV_PREFIX: &str = "THEMESHOP";

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("themes_dir and bundled_dir both point to {path}")]
    SameRoots { path: PathBuf },
    #[error("Unable to determine the configuration directory")]
    NoConfigDir,
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::SameRoots { path } => format!(
                "Theme directories overlap!\n\n\
                Both themes_dir and bundled_dir are set to {}\n\n\
                Bundled themes are read-only, so they need a directory of their own. \
                Please update one of them in {CONFIG_FILE}.",
                path.display()
            ),
            ConfigValidationError::NoConfigDir => format!(
                "No configuration directory found for this platform.\n\n\
                Please set themes_dir, bundled_dir and settings_file in {CONFIG_FILE} \
                or through {ENV_PREFIX}__* environment variables."
            ),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

/// Application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    themes_dir: Option<PathBuf>,
    bundled_dir: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    case_insensitive_names: Option<bool>,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// User-writable themes root
    pub fn themes_dir(&self) -> AppResult<PathBuf> {
        match &self.themes_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(app_dir()?.join("themes")),
        }
    }

    /// Read-only root of bundled themes, next to the user root by default
    pub fn bundled_dir(&self) -> AppResult<PathBuf> {
        if let Some(dir) = &self.bundled_dir {
            return Ok(dir.clone());
        }
        let themes = self.themes_dir()?;
        match themes.parent() {
            Some(parent) => Ok(parent.join("bundled")),
            None => Ok(app_dir()?.join("bundled")),
        }
    }

    pub fn settings_file(&self) -> AppResult<PathBuf> {
        match &self.settings_file {
            Some(file) => Ok(file.clone()),
            None => Ok(app_dir()?.join("settings.json")),
        }
    }

    /// Name comparison rule, the platform's unless configured
    pub fn normalizer(&self) -> Arc<dyn NameNormalizer> {
        match self.case_insensitive_names {
            Some(true) => Arc::new(CaseInsensitive),
            Some(false) => Arc::new(CaseSensitive),
            None => platform_normalizer(),
        }
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        match (self.themes_dir(), self.bundled_dir()) {
            (Ok(themes), Ok(bundled)) if themes == bundled => {
                errors.push(ConfigValidationError::SameRoots { path: themes });
            }
            (Ok(_), Ok(_)) => {}
            _ => errors.push(ConfigValidationError::NoConfigDir),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `<platform config dir>/themeshop`
pub fn app_dir() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AppError::Config(ConfigValidationError::NoConfigDir.user_message()))
}

/// Load configuration from `path` (or the default file) and the environment.
///
/// An explicitly given file must exist; the default one is optional.
pub fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => {
            let default = app_dir()
                .map(|dir| dir.join(CONFIG_FILE))
                .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
            File::from(default).required(false)
        }
    };

    let config = Config::builder()
        .add_source(file_source)
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| {
            AppError::Config(format!(
                "Configuration loading failed: {e}. Please check your {CONFIG_FILE} file and environment variables."
            ))
        })?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| AppError::Config(format!("Failed to deserialize config: {e}")))?;

    if let Err(validation_errors) = app_config.validate() {
        let error_messages: Vec<String> =
            validation_errors.iter().map(|e| e.user_message()).collect();
        return Err(AppError::Config(format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n\n")
        )));
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level(), "info");
        assert_eq!(logging.file(), None);
    }

    #[test]
    fn test_bundled_dir_defaults_next_to_themes_dir() {
        let config = AppConfig {
            themes_dir: Some(PathBuf::from("/data/themeshop/themes")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.bundled_dir().unwrap(),
            PathBuf::from("/data/themeshop/bundled")
        );
    }

    #[test]
    fn test_same_roots_rejected() {
        let config = AppConfig {
            themes_dir: Some(PathBuf::from("/themes")),
            bundled_dir: Some(PathBuf::from("/themes")),
            ..AppConfig::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ConfigValidationError::SameRoots { .. }]
        ));
        assert!(errors[0].user_message().contains("/themes"));
    }

    #[test]
    fn test_configured_normalizer() {
        let config = AppConfig {
            case_insensitive_names: Some(true),
            ..AppConfig::default()
        };
        assert_eq!(config.normalizer().normalize("Dark"), "dark");

        let config = AppConfig {
            case_insensitive_names: Some(false),
            ..AppConfig::default()
        };
        assert_eq!(config.normalizer().normalize("Dark"), "Dark");
    }
}
