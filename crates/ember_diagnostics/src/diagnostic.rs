//! Structured diagnostics reported by the compiler backend.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A 1-indexed position in a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The file the diagnostic points into.
    pub path: PathBuf,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// A diagnostic message produced by the backend for one file.
///
/// The backend's message chains are expected to be flattened into `message`
/// before they reach this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The backend's numeric diagnostic code.
    pub code: u32,
    /// Prefix the backend shows before `code` (e.g. `TS`), empty if none.
    #[serde(default)]
    pub code_prefix: String,
    /// The flattened diagnostic message.
    pub message: String,
    /// Where the diagnostic points, if it is tied to a source position.
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Creates a new diagnostic without a location.
    pub fn new(severity: Severity, code: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            code_prefix: String::new(),
            message: message.into(),
            location: None,
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Sets the prefix shown before the numeric code.
    pub fn with_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }

    /// Attaches a source location to this diagnostic.
    pub fn with_location(mut self, path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        self.location = Some(Location {
            path: path.into(),
            line,
            column,
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} - {}", self.code_prefix, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}
