//! Error types for emit operations.

use ember_common::NormalizedPath;
use ember_source::SourceError;

use crate::artifact::ArtifactKind;

/// Errors that abort a single emit request.
///
/// None of these leave partial state behind: a file's cache item is only
/// replaced after a fully successful recomputation, so every failed call can
/// simply be retried.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A file had to be read from disk and could not be.
    #[error(transparent)]
    Io(#[from] SourceError),

    /// The backend declined to produce output for the file.
    #[error("emit failed for file {path}")]
    EmitSkipped {
        /// The file whose emission was skipped.
        path: NormalizedPath,
    },

    /// Emission succeeded but no compiled-code artifact was among the outputs.
    #[error("{path}: no output emitted")]
    NoOutputProduced {
        /// The file that produced no code.
        path: NormalizedPath,
    },

    /// More than one artifact of a single-valued kind was emitted.
    #[error("{path}: {count} {kind} outputs emitted, expected at most one")]
    AmbiguousOutput {
        /// The file whose outputs are ambiguous.
        path: NormalizedPath,
        /// The artifact kind that occurred more than once.
        kind: ArtifactKind,
        /// How many artifacts of that kind were emitted.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::PathNormalizer;
    use std::path::PathBuf;

    fn path(raw: &str) -> NormalizedPath {
        PathNormalizer::new("/", true).unwrap().normalize(raw)
    }

    #[test]
    fn io_error_is_transparent() {
        let err: EmitError = SourceError::Io {
            path: PathBuf::from("/src/a.ts"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert!(err.to_string().starts_with("can't read file /src/a.ts"));
    }

    #[test]
    fn emit_skipped_display() {
        let err = EmitError::EmitSkipped {
            path: path("/src/a.ts"),
        };
        assert_eq!(err.to_string(), "emit failed for file /src/a.ts");
    }

    #[test]
    fn no_output_display() {
        let err = EmitError::NoOutputProduced {
            path: path("/src/a.ts"),
        };
        assert_eq!(err.to_string(), "/src/a.ts: no output emitted");
    }

    #[test]
    fn ambiguous_display() {
        let err = EmitError::AmbiguousOutput {
            path: path("/src/a.ts"),
            kind: ArtifactKind::MainCode,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "/src/a.ts: 2 code outputs emitted, expected at most one"
        );
    }
}
