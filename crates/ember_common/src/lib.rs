//! Shared foundational types used across the ember incremental emit cache.
//!
//! This crate provides content hashing for change detection and the
//! normalized path identity that every registry and cache lookup is keyed by.

#![warn(missing_docs)]

pub mod hash;
pub mod path;

pub use hash::ContentHash;
pub use path::{NormalizedPath, PathNormalizer};
