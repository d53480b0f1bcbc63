//! Discovery of automatically-included type packages.
//!
//! Every subdirectory of a type root (typically `node_modules/@types`) is a
//! package whose declaration entry point is included in the project without
//! being imported explicitly. Those entry files seed the registry alongside the
//! configured entry files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Fallback entry file of a type package without a `types` field.
const DEFAULT_TYPES_ENTRY: &str = "index.d.ts";

/// Extension appended to a `types` field that names a file without one.
const DECLARATION_EXT: &str = ".d.ts";

/// The subset of `package.json` that points at a package's declarations.
#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    typings: Option<String>,
}

/// Returns the declaration entry file of every package under the given roots.
///
/// Roots that do not exist are skipped. Packages are visited in sorted order
/// so the result is deterministic. Packages without a resolvable entry file
/// are skipped.
pub fn discover_type_files(type_roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in type_roots {
        let entries = match fs::read_dir(root) {
            Ok(e) => e,
            Err(_) => {
                debug!(root = %root.display(), "type root not found");
                continue;
            }
        };

        let mut packages: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        packages.sort();

        for package in packages {
            match resolve_package_types(&package) {
                Some(file) => {
                    debug!(file = %file.display(), "auto type directive");
                    files.push(file);
                }
                None => debug!(package = %package.display(), "no type entry"),
            }
        }
    }
    files
}

fn resolve_package_types(package: &Path) -> Option<PathBuf> {
    let manifest = read_manifest(&package.join("package.json")).unwrap_or_default();

    if let Some(entry) = manifest.types.or(manifest.typings) {
        let candidate = package.join(&entry);
        if candidate.is_file() {
            return Some(candidate);
        }
        let with_ext = package.join(format!("{entry}{DECLARATION_EXT}"));
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }

    let fallback = package.join(DEFAULT_TYPES_ENTRY);
    fallback.is_file().then_some(fallback)
}

fn read_manifest(path: &Path) -> Option<PackageManifest> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
