//! Classification of a file's imports into local and external dependencies.

use std::collections::HashMap;

use ember_common::{NormalizedPath, PathNormalizer};
use tracing::debug;

use crate::backend::ModuleResolver;

/// The resolved dependencies of one file, split by origin.
///
/// A resolved path lives in at most one bucket. Several imports of the same
/// target repeat it within its bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Files inside the project's own source tree.
    pub local: Vec<NormalizedPath>,
    /// Third-party files written in the source language (e.g. declaration files).
    pub external_typed: Vec<NormalizedPath>,
    /// Any other third-party files.
    pub external_other: Vec<NormalizedPath>,
}

impl DependencySet {
    /// Returns the watch list: local, then external-typed, then external-other,
    /// without deduplication.
    pub fn watch_list(&self) -> Vec<NormalizedPath> {
        self.local
            .iter()
            .chain(&self.external_typed)
            .chain(&self.external_other)
            .cloned()
            .collect()
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.local.len() + self.external_typed.len() + self.external_other.len()
    }

    /// Returns `true` if no dependency was resolved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Local,
    ExternalTyped,
    ExternalOther,
}

/// Resolves each raw reference of `containing_file` and buckets the results.
///
/// Unresolvable specifiers are dropped; the backend reports its own diagnostic
/// for them. External results are typed when their path ends with one of
/// `source_extensions`. Should the resolver place one path in two different
/// buckets, the first placement is kept for every later occurrence.
pub fn classify<R: ModuleResolver + ?Sized>(
    references: &[String],
    containing_file: &NormalizedPath,
    resolver: &R,
    normalizer: &PathNormalizer,
    source_extensions: &[String],
) -> DependencySet {
    let mut deps = DependencySet::default();
    let mut placed: HashMap<NormalizedPath, Bucket> = HashMap::new();

    for specifier in references {
        let Some(resolved) = resolver.resolve(specifier, containing_file.as_path()) else {
            debug!(from = %containing_file, specifier = specifier.as_str(), "unresolved import");
            continue;
        };
        let path = normalizer.normalize(&resolved.resolved_path);
        debug!(
            from = %containing_file,
            specifier = specifier.as_str(),
            to = %path,
            external = resolved.is_external,
            "ref"
        );

        let bucket = *placed.entry(path.clone()).or_insert_with(|| {
            if !resolved.is_external {
                Bucket::Local
            } else if source_extensions
                .iter()
                .any(|ext| path.ends_with_str(ext))
            {
                Bucket::ExternalTyped
            } else {
                Bucket::ExternalOther
            }
        });

        match bucket {
            Bucket::Local => deps.local.push(path),
            Bucket::ExternalTyped => deps.external_typed.push(path),
            Bucket::ExternalOther => deps.external_other.push(path),
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ResolvedModule;
    use std::path::Path;

    fn normalizer() -> PathNormalizer {
        PathNormalizer::new("/project", true).unwrap()
    }

    fn exts() -> Vec<String> {
        vec![".ts".to_string(), ".tsx".to_string()]
    }

    fn refs(specs: &[&str]) -> Vec<String> {
        specs.iter().map(|s| s.to_string()).collect()
    }

    fn resolver(spec: &str, _from: &Path) -> Option<ResolvedModule> {
        match spec {
            "./b" => Some(ResolvedModule::local("/project/src/b.ts")),
            "./c" => Some(ResolvedModule::local("/project/src/c.tsx")),
            "lib" => Some(ResolvedModule::external("/project/node_modules/lib/index.d.ts")),
            "lib/data.json" => Some(ResolvedModule::external("/project/node_modules/lib/data.json")),
            _ => None,
        }
    }

    #[test]
    fn buckets_by_origin_and_extension() {
        let n = normalizer();
        let from = n.normalize("src/a.ts");
        let deps = classify(
            &refs(&["./b", "lib", "lib/data.json", "./c"]),
            &from,
            &resolver,
            &n,
            &exts(),
        );
        assert_eq!(
            deps.local,
            vec![n.normalize("src/b.ts"), n.normalize("src/c.tsx")]
        );
        assert_eq!(
            deps.external_typed,
            vec![n.normalize("node_modules/lib/index.d.ts")]
        );
        assert_eq!(
            deps.external_other,
            vec![n.normalize("node_modules/lib/data.json")]
        );
        assert_eq!(deps.len(), 4);
    }

    #[test]
    fn unresolvable_dropped() {
        let n = normalizer();
        let deps = classify(
            &refs(&["./missing", "left-pad"]),
            &n.normalize("src/a.ts"),
            &resolver,
            &n,
            &exts(),
        );
        assert!(deps.is_empty());
    }

    #[test]
    fn duplicates_stay_in_one_bucket() {
        let n = normalizer();
        let deps = classify(
            &refs(&["./b", "./b"]),
            &n.normalize("src/a.ts"),
            &resolver,
            &n,
            &exts(),
        );
        assert_eq!(deps.local.len(), 2);
        assert!(deps.external_typed.is_empty());
    }

    #[test]
    fn inconsistent_resolver_keeps_first_bucket() {
        let n = normalizer();
        // "x" and "y" resolve to the same file with different origins
        let flaky = |spec: &str, _from: &Path| match spec {
            "x" => Some(ResolvedModule::local("/project/shared.ts")),
            "y" => Some(ResolvedModule::external("/project/shared.ts")),
            _ => None,
        };
        let deps = classify(&refs(&["x", "y"]), &n.normalize("a.ts"), &flaky, &n, &exts());
        assert_eq!(deps.local.len(), 2);
        assert!(deps.external_typed.is_empty());
        assert!(deps.external_other.is_empty());
    }

    #[test]
    fn watch_list_order() {
        let n = normalizer();
        let deps = classify(
            &refs(&["lib/data.json", "lib", "./b"]),
            &n.normalize("src/a.ts"),
            &resolver,
            &n,
            &exts(),
        );
        assert_eq!(
            deps.watch_list(),
            vec![
                n.normalize("src/b.ts"),
                n.normalize("node_modules/lib/index.d.ts"),
                n.normalize("node_modules/lib/data.json"),
            ]
        );
    }

    #[test]
    fn resolved_paths_are_normalized() {
        let n = normalizer();
        let dotted = |_: &str, _: &Path| Some(ResolvedModule::local("/project/src/../src/./b.ts"));
        let deps = classify(&refs(&["./b"]), &n.normalize("src/a.ts"), &dotted, &n, &exts());
        assert_eq!(deps.local, vec![n.normalize("src/b.ts")]);
    }
}
