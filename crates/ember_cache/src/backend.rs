//! Boundary traits for the external compiler backend and module resolver.

use std::path::{Path, PathBuf};

use ember_common::NormalizedPath;
use ember_diagnostics::Diagnostic;
use ember_source::SnapshotRegistry;

use crate::artifact::{ArtifactKind, ArtifactSuffixes};

/// One file produced by the backend for a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    /// Absolute output path.
    pub path: PathBuf,
    /// Full text of the output.
    pub text: String,
    /// What the output is.
    pub kind: ArtifactKind,
}

impl OutputFile {
    /// Creates an output file with an explicit kind.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            kind,
        }
    }

    /// Creates an output file, deriving its kind from the path suffix.
    pub fn classified(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        suffixes: &ArtifactSuffixes,
    ) -> Self {
        let path = path.into();
        let kind = suffixes.classify(&path.to_string_lossy());
        Self {
            path,
            text: text.into(),
            kind,
        }
    }
}

/// The result of asking the backend to emit one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitResult {
    /// `true` if the backend declined to produce output.
    pub skipped: bool,
    /// The files that were produced.
    pub files: Vec<OutputFile>,
}

/// The compiler that turns source text into artifacts.
///
/// The backend reads file contents through the registry handed to it, which
/// always holds the snapshot the cache is compiling against.
pub trait CompilerBackend {
    /// Extracts the raw import and reference specifiers from source text.
    fn extract_references(&self, text: &str) -> Vec<String>;

    /// Emits all artifacts for `path`.
    fn emit(&mut self, path: &NormalizedPath, files: &SnapshotRegistry) -> EmitResult;

    /// Returns the syntactic followed by the semantic diagnostics for `path`.
    fn diagnostics(&mut self, path: &NormalizedPath, files: &SnapshotRegistry) -> Vec<Diagnostic>;
}

/// A successfully resolved import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Absolute path of the file the specifier resolved to.
    pub resolved_path: PathBuf,
    /// `true` if the file belongs to a third-party package.
    pub is_external: bool,
}

impl ResolvedModule {
    /// A file inside the project's own source tree.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            resolved_path: path.into(),
            is_external: false,
        }
    }

    /// A file inside a third-party package.
    pub fn external(path: impl Into<PathBuf>) -> Self {
        Self {
            resolved_path: path.into(),
            is_external: true,
        }
    }
}

/// Resolves import specifiers relative to the file containing them.
///
/// Any `Fn(&str, &Path) -> Option<ResolvedModule>` closure is a resolver.
pub trait ModuleResolver {
    /// Resolves `specifier` as written in `containing_file`, or `None` if it
    /// cannot be resolved.
    fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<ResolvedModule>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str, &Path) -> Option<ResolvedModule>,
{
    fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<ResolvedModule> {
        self(specifier, containing_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_output_uses_suffix() {
        let suffixes = ArtifactSuffixes::default();
        let out = OutputFile::classified("/out/a.d.ts.map", "{}", &suffixes);
        assert_eq!(out.kind, ArtifactKind::DeclarationMap);
        assert_eq!(out.text, "{}");
    }

    #[test]
    fn closure_resolver() {
        let resolver = |spec: &str, _from: &Path| {
            (spec == "./b").then(|| ResolvedModule::local("/src/b.ts"))
        };
        assert_eq!(
            resolver.resolve("./b", Path::new("/src/a.ts")),
            Some(ResolvedModule::local("/src/b.ts"))
        );
        assert_eq!(resolver.resolve("./c", Path::new("/src/a.ts")), None);
    }

    #[test]
    fn resolved_module_constructors() {
        assert!(!ResolvedModule::local("/a.ts").is_external);
        assert!(ResolvedModule::external("/node_modules/x/index.d.ts").is_external);
    }
}
