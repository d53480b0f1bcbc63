//! Errors raised while locating, parsing, or validating `ember.toml`.

use std::path::PathBuf;

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("can't read project configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML was malformed or did not fit the configuration schema.
    #[error("invalid project configuration: {0}")]
    ParseError(String),

    /// A configuration file was named explicitly but does not exist.
    #[error("project configuration {} not found", .0.display())]
    NotFound(PathBuf),

    /// A value parsed fine but is not usable.
    #[error("invalid setting: {0}")]
    ValidationError(String),
}
