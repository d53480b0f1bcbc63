//! Versioned source snapshots for the emit cache.
//!
//! This crate provides the [`SnapshotRegistry`], which owns exactly one
//! [`FileRecord`] per normalized path and decides, by diffing the candidate
//! text against the current [`Snapshot`], whether a new version exists. It also
//! discovers the automatically-included type files that seed the registry.

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod snapshot;
pub mod type_roots;

pub use error::SourceError;
pub use registry::{FileRecord, SnapshotRegistry};
pub use snapshot::{Snapshot, TextChangeRange};
pub use type_roots::discover_type_files;
