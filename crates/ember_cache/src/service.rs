//! The host-facing emit facade.

use std::path::Path;

use ember_common::{NormalizedPath, PathNormalizer};
use ember_config::LoadedConfig;
use ember_diagnostics::DiagnosticSink;
use ember_source::{discover_type_files, SnapshotRegistry, SourceError};
use tracing::debug;

use crate::artifact::{ArtifactKind, ArtifactSuffixes};
use crate::backend::{CompilerBackend, ModuleResolver};
use crate::cache::{EmitCache, EmitCacheItem};
use crate::error::EmitError;

/// What the host receives for one emitted file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOutput {
    /// The compiled code.
    pub code: String,
    /// The source map, if one was emitted.
    pub map: Option<String>,
    /// Paths the host should watch: local, external-typed, then
    /// external-other dependencies, not deduplicated.
    pub watch: Vec<NormalizedPath>,
}

/// Entry point for the host build pipeline.
pub struct EmitService<B, R> {
    cache: EmitCache<B, R>,
    suffixes: ArtifactSuffixes,
    declaration: bool,
    declaration_map: bool,
}

impl<B: CompilerBackend, R: ModuleResolver> EmitService<B, R> {
    /// Creates a service for a loaded project configuration.
    ///
    /// A relative `base_dir` is taken from the working directory. Discovers the
    /// automatic type files under the configured type roots and seeds the
    /// registry with them and the entry files. Fails if any of those files
    /// cannot be read.
    pub fn new(loaded: &LoadedConfig, backend: B, resolver: R) -> Result<Self, EmitError> {
        let compiler = &loaded.config.compiler;
        let normalizer = PathNormalizer::new(&loaded.base_dir, compiler.case_sensitive_paths)
            .map_err(|source| SourceError::Io {
                path: loaded.base_dir.clone(),
                source,
            })?;
        let type_files = discover_type_files(&loaded.type_root_paths());
        let registry = SnapshotRegistry::seed(normalizer, &loaded.entry_paths(), &type_files)?;
        Ok(Self::from_parts(registry, backend, resolver, loaded))
    }

    /// Creates a service over an existing registry.
    pub fn from_parts(
        registry: SnapshotRegistry,
        backend: B,
        resolver: R,
        loaded: &LoadedConfig,
    ) -> Self {
        let compiler = &loaded.config.compiler;
        Self {
            cache: EmitCache::new(
                registry,
                backend,
                resolver,
                compiler.source_extensions.clone(),
            ),
            suffixes: ArtifactSuffixes::from_config(&loaded.config.artifacts),
            declaration: compiler.declaration,
            declaration_map: compiler.declaration_map,
        }
    }

    /// Compiles `path` with the given content (or reuses the cached result)
    /// and extracts its code, source map, and watch list.
    ///
    /// Backend diagnostics for every file compiled along the way are forwarded
    /// to `sink`.
    pub fn get_emit(
        &mut self,
        path: impl AsRef<Path>,
        content: &str,
        sink: &DiagnosticSink,
    ) -> Result<EmitOutput, EmitError> {
        let path = self.cache.registry().normalize(path);
        debug!(path = %path, "get emit");

        let item = self.cache.get_cache(&path, Some(content), sink)?;

        let code = single_output(item, &path, ArtifactKind::MainCode)?
            .ok_or_else(|| EmitError::NoOutputProduced { path: path.clone() })?;
        let map = single_output(item, &path, ArtifactKind::SourceMap)?;

        Ok(EmitOutput {
            code,
            map,
            watch: item.dependencies.watch_list(),
        })
    }

    /// Returns every declaration artifact emitted so far in this run, sorted by
    /// output path.
    pub fn get_all_declarations(&self) -> Vec<(NormalizedPath, String)> {
        debug!("get all declarations");
        self.collect_outputs(ArtifactKind::Declaration)
    }

    /// Returns every declaration-map artifact emitted so far in this run,
    /// sorted by output path.
    pub fn get_all_declaration_maps(&self) -> Vec<(NormalizedPath, String)> {
        debug!("get all declaration maps");
        self.collect_outputs(ArtifactKind::DeclarationMap)
    }

    /// Returns the side artifacts the host should write in its bulk-write
    /// phase, as enabled by the `declaration` and `declaration_map` settings.
    pub fn declaration_outputs(&self) -> Vec<(NormalizedPath, String)> {
        let mut outputs = Vec::new();
        if self.declaration {
            outputs.extend(self.get_all_declarations());
            if self.declaration_map {
                outputs.extend(self.get_all_declaration_maps());
            }
        }
        outputs
    }

    /// Returns `true` if `path` is a configured entry file the host should
    /// submit to [`get_emit`](Self::get_emit).
    pub fn should_emit(&self, path: impl AsRef<Path>) -> bool {
        let registry = self.cache.registry();
        registry.is_entry(&registry.normalize(path))
    }

    /// Resolves an import for the host's module graph.
    ///
    /// Returns `None` when the importer is not a known file, when the specifier
    /// cannot be resolved, or when it resolves to a declaration-only file.
    pub fn resolve_import(
        &self,
        importee: &str,
        importer: impl AsRef<Path>,
    ) -> Option<NormalizedPath> {
        let registry = self.cache.registry();
        let importer = registry.normalize(importer);
        debug!(importee, importer = %importer, "resolve import");

        if !registry.contains(&importer) {
            debug!(importer = %importer, "skipping resolve");
            return None;
        }

        let resolved = self.cache.resolver().resolve(importee, importer.as_path())?;
        let path = registry.normalize(&resolved.resolved_path);
        if self.suffixes.classify(path.as_str()) == ArtifactKind::Declaration {
            return None;
        }
        Some(path)
    }

    /// Returns the artifact suffix table, for backend adapters that classify
    /// outputs by path.
    pub fn suffixes(&self) -> &ArtifactSuffixes {
        &self.suffixes
    }

    /// Returns the underlying emit cache.
    pub fn cache(&self) -> &EmitCache<B, R> {
        &self.cache
    }

    fn collect_outputs(&self, kind: ArtifactKind) -> Vec<(NormalizedPath, String)> {
        let mut found: Vec<(NormalizedPath, String)> = self
            .cache
            .items()
            .flat_map(|(_, item)| item.outputs.iter())
            .filter(|(_, artifact)| artifact.kind == kind)
            .map(|(path, artifact)| (path.clone(), artifact.text.clone()))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }
}

/// Returns the text of the single artifact of `kind`, failing if there are several.
fn single_output(
    item: &EmitCacheItem,
    path: &NormalizedPath,
    kind: ArtifactKind,
) -> Result<Option<String>, EmitError> {
    let mut matches = item.outputs.values().filter(|artifact| artifact.kind == kind);
    let first = matches.next();
    let extra = matches.count();
    if extra > 0 {
        return Err(EmitError::AmbiguousOutput {
            path: path.clone(),
            kind,
            count: extra + 1,
        });
    }
    Ok(first.map(|artifact| artifact.text.clone()))
}
