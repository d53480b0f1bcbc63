//! The snapshot registry: one versioned snapshot per known file.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use ember_common::{NormalizedPath, PathNormalizer};
use tracing::debug;

use crate::error::SourceError;
use crate::snapshot::Snapshot;

/// The current snapshot of a file together with its version.
///
/// Versions start at 1 when a path is first registered and increase by exactly
/// one each time genuinely different content is accepted. They never reset.
#[derive(Debug)]
pub struct FileRecord {
    snapshot: Snapshot,
    version: u32,
}

impl FileRecord {
    /// Returns the current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns the current version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the full text of the current snapshot.
    pub fn text(&self) -> &str {
        self.snapshot.text()
    }
}

/// Owns one [`FileRecord`] per normalized path.
///
/// All lookups and inserts are keyed by [`NormalizedPath`], so differently
/// spelled raw paths that normalize to the same form share one record. The set
/// of registered paths is the "known file" boundary used by membership checks.
pub struct SnapshotRegistry {
    normalizer: PathNormalizer,
    files: HashMap<NormalizedPath, FileRecord>,
    /// Configured entry files; the host only submits these for emission.
    entries: BTreeSet<NormalizedPath>,
}

impl SnapshotRegistry {
    /// Creates an empty registry.
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self {
            normalizer,
            files: HashMap::new(),
            entries: BTreeSet::new(),
        }
    }

    /// Creates a registry seeded from disk with the automatically-included
    /// type files followed by the configured entry files.
    ///
    /// Fails if any of the files cannot be read.
    pub fn seed(
        normalizer: PathNormalizer,
        entries: &[PathBuf],
        type_files: &[PathBuf],
    ) -> Result<Self, SourceError> {
        let mut registry = Self::new(normalizer);
        for file in type_files {
            let path = registry.normalize(file);
            debug!(path = %path, "auto type file");
            registry.register(&path, None)?;
        }
        for file in entries {
            let path = registry.normalize(file);
            registry.register(&path, None)?;
            registry.entries.insert(path);
        }
        Ok(registry)
    }

    /// Returns the path normalizer used by this registry.
    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    /// Normalizes a raw path with this registry's normalizer.
    pub fn normalize(&self, raw: impl AsRef<Path>) -> NormalizedPath {
        self.normalizer.normalize(raw)
    }

    /// Registers a file or updates its content.
    ///
    /// When `content` is `None` the text is read from disk through
    /// [`NormalizedPath::as_path`], which keeps the caller's casing even when
    /// the key is case-folded. A new path is accepted at version 1. For a known
    /// path the candidate is diffed against the current snapshot: an empty
    /// change range leaves the record untouched, otherwise the candidate
    /// replaces the snapshot (dropping the old one) and the version goes up by
    /// one.
    pub fn register(
        &mut self,
        path: &NormalizedPath,
        content: Option<&str>,
    ) -> Result<&FileRecord, SourceError> {
        debug!(path = %path, from_disk = content.is_none(), "register");

        let text = match content {
            Some(text) => text.to_string(),
            None => std::fs::read_to_string(path.as_path()).map_err(|e| SourceError::Io {
                path: path.clone().into(),
                source: e,
            })?,
        };
        let candidate = Snapshot::new(text);

        match self.files.entry(path.clone()) {
            Entry::Vacant(slot) => Ok(&*slot.insert(FileRecord {
                snapshot: candidate,
                version: 1,
            })),
            Entry::Occupied(slot) => {
                let record = slot.into_mut();
                match candidate.change_range(&record.snapshot) {
                    None => {
                        debug!(path = %path, version = record.version, "unchanged");
                    }
                    Some(change) => {
                        debug!(path = %path, ?change, "change");
                        let previous = std::mem::replace(&mut record.snapshot, candidate);
                        record.version += 1;
                        drop(previous);
                    }
                }
                Ok(&*record)
            }
        }
    }

    /// Returns the record for `path`, loading it from disk if it is not known yet.
    pub fn lookup(&mut self, path: &NormalizedPath) -> Result<&FileRecord, SourceError> {
        if self.files.contains_key(path) {
            return Ok(&self.files[path]);
        }
        self.register(path, None)
    }

    /// Returns the record for `path` without touching the file system.
    pub fn get(&self, path: &NormalizedPath) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Returns the registered path equal to `path`, spelled the way it was
    /// first registered.
    pub fn canonical(&self, path: &NormalizedPath) -> Option<&NormalizedPath> {
        self.files.get_key_value(path).map(|(key, _)| key)
    }

    /// Returns the current version of `path`, if it is registered.
    pub fn version(&self, path: &NormalizedPath) -> Option<u32> {
        self.files.get(path).map(FileRecord::version)
    }

    /// Returns `true` if `path` is a known file.
    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.files.contains_key(path)
    }

    /// Returns `true` if `path` is one of the configured entry files.
    pub fn is_entry(&self, path: &NormalizedPath) -> bool {
        self.entries.contains(path)
    }

    /// Returns the set of all known paths.
    pub fn known_paths(&self) -> BTreeSet<NormalizedPath> {
        self.files.keys().cloned().collect()
    }

    /// Returns the number of known files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SnapshotRegistry {
        SnapshotRegistry::new(PathNormalizer::new("/project", true).unwrap())
    }

    #[test]
    fn first_registration_is_version_one() {
        let mut reg = registry();
        let path = reg.normalize("src/a.ts");
        let record = reg.register(&path, Some("export const a = 1;")).unwrap();
        assert_eq!(record.version(), 1);
        assert_eq!(record.text(), "export const a = 1;");
    }

    #[test]
    fn unchanged_content_keeps_version() {
        let mut reg = registry();
        let path = reg.normalize("src/a.ts");
        reg.register(&path, Some("same")).unwrap();
        for _ in 0..5 {
            assert_eq!(reg.register(&path, Some("same")).unwrap().version(), 1);
        }
    }

    #[test]
    fn changed_content_bumps_by_one() {
        let mut reg = registry();
        let path = reg.normalize("src/a.ts");
        reg.register(&path, Some("v1")).unwrap();
        assert_eq!(reg.register(&path, Some("v2")).unwrap().version(), 2);
        assert_eq!(reg.register(&path, Some("v2")).unwrap().version(), 2);
        assert_eq!(reg.register(&path, Some("v1")).unwrap().version(), 3);
        assert_eq!(reg.get(&path).unwrap().text(), "v1");
    }

    #[test]
    fn raw_spellings_share_a_record() {
        let mut reg = registry();
        let a = reg.normalize("src/a.ts");
        let b = reg.normalize("/project/./src/../src/a.ts");
        reg.register(&a, Some("one")).unwrap();
        assert_eq!(reg.register(&b, Some("two")).unwrap().version(), 2);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn register_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.ts");
        std::fs::write(&file, "export {}").unwrap();

        let mut reg = SnapshotRegistry::new(PathNormalizer::new(dir.path(), true).unwrap());
        let path = reg.normalize(&file);
        let record = reg.register(&path, None).unwrap();
        assert_eq!(record.text(), "export {}");

        std::fs::write(&file, "export const x = 1;").unwrap();
        assert_eq!(reg.register(&path, None).unwrap().version(), 2);
    }

    #[test]
    fn case_insensitive_reads_original_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Src/App.ts");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "export const App = 1;").unwrap();

        let reg = SnapshotRegistry::seed(
            PathNormalizer::new(dir.path(), false).unwrap(),
            &[file.clone()],
            &[],
        )
        .unwrap();

        // any casing finds the record; the key itself is folded
        let folded = reg.normalize(dir.path().join("src/app.ts"));
        assert!(reg.is_entry(&folded));
        assert_eq!(reg.get(&folded).unwrap().text(), "export const App = 1;");
        assert_eq!(reg.canonical(&folded).unwrap().as_path(), file);
        assert!(reg.known_paths().iter().all(|p| p.as_str() == p.as_str().to_lowercase()));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let mut reg = registry();
        let path = reg.normalize("/nonexistent/dir/a.ts");
        let err = reg.register(&path, None).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(!reg.contains(&path));
    }

    #[test]
    fn lookup_prefers_existing_record() {
        let mut reg = registry();
        let path = reg.normalize("/nonexistent/in-memory.ts");
        reg.register(&path, Some("in memory")).unwrap();
        // no disk read happens for a known path
        assert_eq!(reg.lookup(&path).unwrap().text(), "in memory");
    }

    #[test]
    fn lookup_loads_unknown_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("b.ts");
        std::fs::write(&file, "b").unwrap();

        let mut reg = SnapshotRegistry::new(PathNormalizer::new(dir.path(), true).unwrap());
        let path = reg.normalize("b.ts");
        assert!(!reg.contains(&path));
        assert_eq!(reg.lookup(&path).unwrap().version(), 1);
        assert!(reg.contains(&path));
    }

    #[test]
    fn seed_registers_entries_and_type_files() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("index.ts");
        let types = dir.path().join("globals.d.ts");
        std::fs::write(&entry, "import './x';").unwrap();
        std::fs::write(&types, "declare const G: number;").unwrap();

        let reg = SnapshotRegistry::seed(
            PathNormalizer::new(dir.path(), true).unwrap(),
            &[entry.clone()],
            &[types.clone()],
        )
        .unwrap();

        assert_eq!(reg.len(), 2);
        assert!(reg.is_entry(&reg.normalize(&entry)));
        assert!(!reg.is_entry(&reg.normalize(&types)));
        assert!(reg.contains(&reg.normalize(&types)));
        assert_eq!(reg.known_paths().len(), 2);
    }

    #[test]
    fn seed_fails_on_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let result = SnapshotRegistry::seed(
            PathNormalizer::new(dir.path(), true).unwrap(),
            &[dir.path().join("missing.ts")],
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn version_query() {
        let mut reg = registry();
        let path = reg.normalize("a.ts");
        assert_eq!(reg.version(&path), None);
        reg.register(&path, Some("x")).unwrap();
        assert_eq!(reg.version(&path), Some(1));
        assert!(!reg.is_empty());
    }
}
