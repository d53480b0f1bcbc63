//! Normalized absolute path identity.
//!
//! Every path that crosses into the registry or the emit cache goes through a
//! [`PathNormalizer`] first, so two raw spellings of the same file (relative vs.
//! absolute, `\` vs. `/`, redundant `.`/`..` segments, and on case-insensitive
//! file systems differing case) always land on the same [`NormalizedPath`].

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An absolute, lexically normalized path using `/` separators.
///
/// Identity (equality, ordering, hashing) is decided by the key returned from
/// [`as_str`](Self::as_str), which is case-folded when the normalizer is case
/// insensitive. The caller's original casing is kept alongside it and is what
/// [`as_path`](Self::as_path) returns, so file system access still works on
/// case-sensitive disks. Cheap to clone.
#[derive(Clone)]
pub struct NormalizedPath {
    key: Arc<str>,
    spelled: Arc<str>,
}

impl NormalizedPath {
    /// Returns the identity key.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the path with the casing it was first spelled with, for I/O.
    pub fn as_path(&self) -> &Path {
        Path::new(&*self.spelled)
    }

    /// Returns `true` if the key ends with the given suffix (e.g. `".d.ts"`).
    pub fn ends_with_str(&self, suffix: &str) -> bool {
        self.key.ends_with(suffix)
    }
}

impl PartialEq for NormalizedPath {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NormalizedPath {}

impl Hash for NormalizedPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for NormalizedPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl Borrow<str> for NormalizedPath {
    fn borrow(&self) -> &str {
        &self.key
    }
}

impl From<NormalizedPath> for PathBuf {
    fn from(path: NormalizedPath) -> Self {
        PathBuf::from(&*path.spelled)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl fmt::Debug for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.key)
    }
}

/// Turns raw paths into [`NormalizedPath`]s relative to a fixed base directory.
///
/// Normalization is purely lexical and never touches the file system, so it
/// works equally for files that exist only as in-memory content.
#[derive(Clone, Debug)]
pub struct PathNormalizer {
    base: String,
    case_sensitive: bool,
}

impl PathNormalizer {
    /// Creates a normalizer that resolves relative paths against `base`.
    ///
    /// A relative `base` is rooted at the process working directory, which is
    /// the only step that can fail.
    pub fn new(base: impl AsRef<Path>, case_sensitive: bool) -> io::Result<Self> {
        let raw = to_slashes(base.as_ref());
        let base = if is_absolute(&raw) {
            normalize_str(&raw, "/")
        } else {
            let cwd = to_slashes(&std::env::current_dir()?);
            normalize_str(&raw, &cwd)
        };
        Ok(Self {
            base,
            case_sensitive,
        })
    }

    /// Returns the normalized base directory, in its original casing.
    pub fn base(&self) -> &Path {
        Path::new(&self.base)
    }

    /// Returns whether paths are compared case-sensitively.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Normalizes a raw path.
    pub fn normalize(&self, raw: impl AsRef<Path>) -> NormalizedPath {
        let spelled: Arc<str> = Arc::from(normalize_str(&to_slashes(raw.as_ref()), &self.base));
        let key = if self.case_sensitive {
            Arc::clone(&spelled)
        } else {
            Arc::from(spelled.to_lowercase())
        };
        NormalizedPath { key, spelled }
    }
}

fn to_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Returns the drive prefix (`C:`) of a Windows-style absolute path.
fn drive_prefix(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(&path[..2])
    } else {
        None
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

fn normalize_str(raw: &str, base: &str) -> String {
    let full = if is_absolute(raw) {
        raw.to_string()
    } else {
        format!("{base}/{raw}")
    };

    let (root, rest) = match drive_prefix(&full) {
        Some(drive) => (drive.to_string(), &full[2..]),
        None => (String::new(), full.as_str()),
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    format!("{root}/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix() -> PathNormalizer {
        PathNormalizer::new("/work/project", true).unwrap()
    }

    #[test]
    fn absolute_path_unchanged() {
        let p = unix().normalize("/work/project/src/a.ts");
        assert_eq!(p.as_str(), "/work/project/src/a.ts");
    }

    #[test]
    fn relative_path_joined_onto_base() {
        let p = unix().normalize("src/a.ts");
        assert_eq!(p.as_str(), "/work/project/src/a.ts");
    }

    #[test]
    fn dot_segments_removed() {
        let n = unix();
        let a = n.normalize("./src/../src/./a.ts");
        let b = n.normalize("/work/project/src/a.ts");
        assert_eq!(a, b);
    }

    #[test]
    fn parent_above_root_clamps() {
        let p = unix().normalize("/../../a.ts");
        assert_eq!(p.as_str(), "/a.ts");
    }

    #[test]
    fn backslashes_become_slashes() {
        let p = unix().normalize("src\\lib\\a.ts");
        assert_eq!(p.as_str(), "/work/project/src/lib/a.ts");
    }

    #[test]
    fn duplicate_separators_collapse() {
        let p = unix().normalize("/work//project///a.ts");
        assert_eq!(p.as_str(), "/work/project/a.ts");
    }

    #[test]
    fn windows_drive_paths() {
        let n = PathNormalizer::new("C:\\work", true).unwrap();
        assert_eq!(n.normalize("src\\a.ts").as_str(), "C:/work/src/a.ts");
        assert_eq!(n.normalize("D:\\x\\..\\y.ts").as_str(), "D:/y.ts");
    }

    #[test]
    fn case_insensitive_folds() {
        let n = PathNormalizer::new("/Work", false).unwrap();
        let a = n.normalize("Src/A.ts");
        let b = n.normalize("/work/src/a.TS");
        assert_eq!(a, b);
        assert!(!n.is_case_sensitive());
    }

    #[test]
    fn case_sensitive_keeps_case() {
        let n = unix();
        assert_ne!(n.normalize("A.ts"), n.normalize("a.ts"));
    }

    #[test]
    fn suffix_check_and_conversion() {
        let p = unix().normalize("types/index.d.ts");
        assert!(p.ends_with_str(".d.ts"));
        let buf: PathBuf = p.clone().into();
        assert_eq!(buf, PathBuf::from("/work/project/types/index.d.ts"));
        assert_eq!(p.as_path(), Path::new("/work/project/types/index.d.ts"));
    }

    #[test]
    fn case_insensitive_keeps_spelling_for_io() {
        let n = PathNormalizer::new("/Work", false).unwrap();
        let p = n.normalize("Src/App.ts");
        assert_eq!(p.as_str(), "/work/src/app.ts");
        assert_eq!(p.as_path(), Path::new("/Work/Src/App.ts"));
        assert_eq!(PathBuf::from(p.clone()), PathBuf::from("/Work/Src/App.ts"));
        assert_eq!(p.to_string(), "/work/src/app.ts");

        // a different spelling is the same identity
        let other = n.normalize("/WORK/src/APP.ts");
        assert_eq!(p, other);
        let mut set = std::collections::HashSet::new();
        set.insert(p);
        assert!(set.contains("/work/src/app.ts"));
        assert!(set.contains(&other));
    }

    #[test]
    fn relative_base_rooted_at_working_dir() {
        let cwd = std::env::current_dir().unwrap();
        let n = PathNormalizer::new(".", true).unwrap();
        let expected = PathNormalizer::new(&cwd, true).unwrap();
        assert_eq!(n.base(), expected.base());
        assert_eq!(n.normalize("src/a.ts"), expected.normalize(cwd.join("src/a.ts")));

        let nested = PathNormalizer::new("sub/../pkg", true).unwrap();
        assert_eq!(nested.normalize("a.ts"), expected.normalize("pkg/a.ts"));
    }
}
