//! Error types for the river editor

use thiserror::Error;

/// The main error type for river operations
#[derive(Debug, Error)]
pub enum RiverError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Unknown post-process effect: {value} is not one of {allowed:?}")]
    UnknownEffect {
        value: String,
        allowed: Vec<String>,
    },

    #[error("Too many control points: {count} exceeds the shader limit of {max}")]
    TooManyControlPoints { count: usize, max: usize },
}

/// Result type alias for river operations
pub type Result<T> = std::result::Result<T, RiverError>;

impl From<toml::de::Error> for RiverError {
    fn from(err: toml::de::Error) -> Self {
        RiverError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for RiverError {
    fn from(err: toml::ser::Error) -> Self {
        RiverError::TomlSerError(err.to_string())
    }
}
