//! Error taxonomy for locale loading and configuration.
//!
//! None of these ever escape the translation path: the engine logs them and
//! degrades to a fallback. They are surfaced as values only from explicit
//! loading and configuration entry points.

use std::fmt;
use std::path::PathBuf;

/// Errors from i18n operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The default locale is missing or has no dictionary.
    Configuration(String),
    /// A configuration value failed validation or an unknown key was given.
    InvalidConfig {
        field: &'static str,
        message: String,
    },
    /// A dictionary file was missing or unreadable.
    SourceRead { location: PathBuf, message: String },
    /// A dictionary file was read but is not a valid key/value mapping.
    SourceParse { location: PathBuf, message: String },
}

impl I18nError {
    pub(crate) fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn read(location: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::SourceRead {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(location: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::SourceParse {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::InvalidConfig { field, message } => {
                write!(f, "invalid configuration field '{field}': {message}")
            }
            Self::SourceRead { location, message } => {
                write!(f, "unable to read file {}: {message}", location.display())
            }
            Self::SourceParse { location, message } => write!(
                f,
                "unable to parse locales from file (maybe {} is empty or invalid json?): {message}",
                location.display()
            ),
        }
    }
}

impl std::error::Error for I18nError {}
