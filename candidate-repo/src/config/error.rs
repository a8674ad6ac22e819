//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the config file.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// Explicitly requested config file does not exist.
    #[error("Missing config file: {path}")]
    MissingFile { path: String },

    /// A required value was given neither on the command line nor in the
    /// config file.
    #[error("No {name} given; pass --{name} or set defaults.{name} in the config file")]
    MissingValue { name: &'static str },

    /// A value given on the command line is malformed.
    #[error("Invalid --{name}: {message}")]
    InvalidArgument { name: &'static str, message: String },
}
