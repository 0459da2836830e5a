//! Error handling for the cell configuration reader

use std::io;

/// Unified error to report failures while reading the cell configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    WrongAngle(String),
    InvalidLength { field: String, expected: usize, found: usize },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::IoError(err) => write!(f, "IO Error: {}", err),
            ConfigError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::MissingField(field) => write!(f, "Missing Field: {}", field),
            ConfigError::WrongAngle(msg) => write!(f, "Wrong angle representation: {}", msg),
            ConfigError::InvalidLength { field, expected, found } => write!(
                f,
                "Invalid Length of {}: expected {}, found {}",
                field, expected, found
            ),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value of {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}
