use crate::defaults::BUNDLED_PREFIX;
use crate::resolver::NameNormalizer;
use std::sync::Arc;
use thiserror::Error;

/// Core validation trait shared by the theme name validators.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Characters no theme directory name may contain on any supported platform
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names Windows refuses as file names, with or without extension
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const MAX_NAME_BYTES: usize = 255;

/// Reasons a proposed theme name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeNameError {
    #[error("name is empty")]
    Empty,
    #[error("name '{name}' is longer than {max} bytes")]
    TooLong { name: String, max: usize },
    #[error("name '{name}' contains the invalid character {ch:?}")]
    InvalidCharacter { name: String, ch: char },
    #[error("name '{name}' is reserved")]
    Reserved { name: String },
    #[error("name '{name}' cannot end with a dot or a space")]
    InvalidEnding { name: String },
    #[error("name '{name}' is already used by theme '{existing}'")]
    AlreadyUsed { name: String, existing: String },
}

impl ThemeNameError {
    /// Message shown inline next to the name input
    pub fn user_message(&self) -> String {
        match self {
            ThemeNameError::AlreadyUsed { .. } => "Name already used.".to_string(),
            ThemeNameError::Empty => "Please enter a name.".to_string(),
            ThemeNameError::TooLong { max, .. } => {
                format!("Name too long (max {max} bytes).")
            }
            ThemeNameError::InvalidCharacter { ch, .. } => {
                format!("Name contains an invalid character: {ch:?}")
            }
            ThemeNameError::Reserved { name } => {
                format!("'{name}' is reserved and can't be used as a theme name.")
            }
            ThemeNameError::InvalidEnding { .. } => {
                "Name can't end with a dot or a space.".to_string()
            }
        }
    }
}

/// Checks that a name can be used as a theme directory name
pub struct ThemeNameValidator;

impl Validator<str> for ThemeNameValidator {
    type Error = ThemeNameError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Err(ThemeNameError::Empty);
        }

        if input.len() > MAX_NAME_BYTES {
            return Err(ThemeNameError::TooLong {
                name: input.to_string(),
                max: MAX_NAME_BYTES,
            });
        }

        if let Some(ch) = input
            .chars()
            .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
        {
            return Err(ThemeNameError::InvalidCharacter {
                name: input.to_string(),
                ch,
            });
        }

        // "__" marks bundled themes and would be stripped during resolution
        if input == "." || input == ".." || input.starts_with(BUNDLED_PREFIX) {
            return Err(ThemeNameError::Reserved {
                name: input.to_string(),
            });
        }

        let stem = input.split('.').next().unwrap_or(input).to_ascii_uppercase();
        if RESERVED_NAMES.contains(&stem.as_str()) {
            return Err(ThemeNameError::Reserved {
                name: input.to_string(),
            });
        }

        if input.ends_with('.') || input.ends_with(' ') {
            return Err(ThemeNameError::InvalidEnding {
                name: input.to_string(),
            });
        }

        Ok(())
    }
}

/// Rejects names that collide with an existing theme after normalization
pub struct UniqueNameValidator {
    existing: Vec<String>,
    normalizer: Arc<dyn NameNormalizer>,
}

impl UniqueNameValidator {
    pub fn new(existing: Vec<String>, normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self {
            existing,
            normalizer,
        }
    }
}

impl Validator<str> for UniqueNameValidator {
    type Error = ThemeNameError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let wanted = self.normalizer.normalize(input);
        match self
            .existing
            .iter()
            .find(|name| self.normalizer.normalize(name) == wanted)
        {
            Some(existing) => Err(ThemeNameError::AlreadyUsed {
                name: input.to_string(),
                existing: existing.clone(),
            }),
            None => Ok(()),
        }
    }
}
