//! Per-file emit cache with lazy recompilation and local-dependency warm-up.
//!
//! Each source file maps to an [`EmitCacheItem`] recording its dependency set,
//! its emitted artifacts, and the snapshot version they were computed at. An
//! item is recomputed only when the registry reports a newer version. After a
//! recomputation every local dependency that is not already fresh is pulled
//! into the cache as well; checking freshness *before* recursing is what stops
//! import cycles from looping.
//!
//! Invalidation is pull-based: changing a dependency never recompiles the files
//! importing it. Dependents notice only when they are themselves resubmitted.

use std::collections::{BTreeMap, HashMap};

use ember_common::NormalizedPath;
use ember_diagnostics::DiagnosticSink;
use ember_source::{FileRecord, SnapshotRegistry};
use tracing::debug;

use crate::artifact::EmittedArtifact;
use crate::backend::{CompilerBackend, ModuleResolver};
use crate::deps::{self, DependencySet};
use crate::error::EmitError;

/// The cached compilation result of one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitCacheItem {
    /// Dependencies resolved from the file's references.
    pub dependencies: DependencySet,
    /// Emitted artifacts keyed by normalized output path.
    pub outputs: BTreeMap<NormalizedPath, EmittedArtifact>,
    /// Snapshot version the item was computed at.
    pub version: u32,
}

/// Owns the snapshot registry, the backend, the resolver, and one
/// [`EmitCacheItem`] per compiled file.
pub struct EmitCache<B, R> {
    registry: SnapshotRegistry,
    backend: B,
    resolver: R,
    source_extensions: Vec<String>,
    items: HashMap<NormalizedPath, EmitCacheItem>,
}

impl<B: CompilerBackend, R: ModuleResolver> EmitCache<B, R> {
    /// Creates an empty cache over an already-seeded registry.
    ///
    /// `source_extensions` decides which external dependencies count as typed.
    pub fn new(
        registry: SnapshotRegistry,
        backend: B,
        resolver: R,
        source_extensions: Vec<String>,
    ) -> Self {
        Self {
            registry,
            backend,
            resolver,
            source_extensions,
            items: HashMap::new(),
        }
    }

    /// Returns the cache item for `path`, recompiling it if it is missing or stale.
    ///
    /// `content` replaces the file's text when given; otherwise the text is
    /// taken from the registry, which reads it from disk for unknown files. A
    /// failed recompilation leaves any existing item untouched.
    ///
    /// The new item is stored before local dependencies are warmed. If warming
    /// a dependency fails, the error is returned but this file stays fresh, so
    /// resubmitting it unchanged does not retry the dependency. The dependency
    /// is retried when it is requested itself or when this file changes.
    pub fn get_cache(
        &mut self,
        path: &NormalizedPath,
        content: Option<&str>,
        sink: &DiagnosticSink,
    ) -> Result<&EmitCacheItem, EmitError> {
        debug!(path = %path, "get cache");
        let version = self.registry.register(path, content)?.version();
        // resolve imports against the spelling the file was first seen under
        let path = match self.registry.canonical(path) {
            Some(known) => known.clone(),
            None => path.clone(),
        };

        let stale = self
            .items
            .get(&path)
            .map_or(true, |item| item.version < version);

        if stale {
            let item = self.compile(&path, version, sink)?;
            let local = item.dependencies.local.clone();
            self.items.insert(path.clone(), item);

            for dep in &local {
                if self.is_fresh(dep) {
                    continue;
                }
                self.get_cache(dep, None, sink)?;
            }
        }

        Ok(&self.items[&path])
    }

    /// Returns `true` if `path` has a cache item computed at the registry's
    /// current version. Never touches the file system.
    pub fn is_fresh(&self, path: &NormalizedPath) -> bool {
        match (self.items.get(path), self.registry.version(path)) {
            (Some(item), Some(version)) => item.version == version,
            _ => false,
        }
    }

    /// Builds a new item for `path` at `version` without storing it.
    fn compile(
        &mut self,
        path: &NormalizedPath,
        version: u32,
        sink: &DiagnosticSink,
    ) -> Result<EmitCacheItem, EmitError> {
        debug!(path = %path, version, "compile");

        let text = self.registry.get(path).map(FileRecord::text).unwrap_or_default();
        let references = self.backend.extract_references(text);
        let dependencies = deps::classify(
            &references,
            path,
            &self.resolver,
            self.registry.normalizer(),
            &self.source_extensions,
        );

        sink.emit_all(self.backend.diagnostics(path, &self.registry));

        let result = self.backend.emit(path, &self.registry);
        if result.skipped {
            return Err(EmitError::EmitSkipped { path: path.clone() });
        }

        let outputs = result
            .files
            .into_iter()
            .map(|file| {
                (
                    self.registry.normalize(&file.path),
                    EmittedArtifact {
                        kind: file.kind,
                        text: file.text,
                    },
                )
            })
            .collect();

        Ok(EmitCacheItem {
            dependencies,
            outputs,
            version,
        })
    }

    /// Returns the cache item for `path` without recompiling.
    pub fn item(&self, path: &NormalizedPath) -> Option<&EmitCacheItem> {
        self.items.get(path)
    }

    /// Iterates over every cached item.
    pub fn items(&self) -> impl Iterator<Item = (&NormalizedPath, &EmitCacheItem)> {
        self.items.iter()
    }

    /// Returns the snapshot registry.
    pub fn registry(&self) -> &SnapshotRegistry {
        &self.registry
    }

    /// Returns the module resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Returns the compiler backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
