//! Diagnostic severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a backend diagnostic is, from `Message` up to `Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Purely informational.
    Message,
    /// An optional improvement.
    Suggestion,
    /// A likely problem that still allows emission.
    Warning,
    /// A definite problem; the host typically stops the build.
    Error,
}

impl Severity {
    /// Number of severity levels.
    pub const COUNT: usize = 4;

    /// `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Lowercase name as shown to users.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Message => "message",
            Severity::Suggestion => "suggestion",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
