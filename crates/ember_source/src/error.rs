//! Error types for snapshot loading.

use std::path::PathBuf;

/// Errors that can occur while loading source text into the registry.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read from disk and no content was supplied.
    #[error("can't read file {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl SourceError {
    /// Returns the path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourceError::Io { path, .. } => path,
        }
    }
}
