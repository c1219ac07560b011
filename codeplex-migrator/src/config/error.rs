//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading the migrator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Cannot read configuration file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("Invalid migrator configuration in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A label table entry is empty or a provenance template does not compile.
    #[error("Rejected migrator configuration '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// The configuration file passed with `--config` does not exist.
    #[error("Configuration file not found: {path}")]
    MissingFile { path: String },
}
