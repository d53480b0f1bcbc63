//! Incremental emit cache.
//!
//! This crate sits between a build pipeline and an external compiler backend.
//! For each source file it remembers the dependency set, the emitted artifacts,
//! and the snapshot version they were computed at, so a file is recompiled only
//! when its content genuinely changed. Local dependencies are warmed eagerly and
//! declaration artifacts are aggregated across the whole run.

#![warn(missing_docs)]

pub mod artifact;
pub mod backend;
pub mod cache;
pub mod deps;
pub mod error;
pub mod service;

pub use artifact::{ArtifactKind, ArtifactSuffixes, EmittedArtifact};
pub use backend::{CompilerBackend, EmitResult, ModuleResolver, OutputFile, ResolvedModule};
pub use cache::{EmitCache, EmitCacheItem};
pub use deps::{classify, DependencySet};
pub use error::EmitError;
pub use service::{EmitOutput, EmitService};
