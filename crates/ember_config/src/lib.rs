//! Parsing, layering, and validation of `ember.toml` project configuration.
//!
//! This crate locates the project configuration file, deep-merges it between
//! caller-supplied defaults and overrides, and produces a strongly-typed
//! [`ProjectConfig`] describing entry files, type roots, source extensions,
//! and the artifact suffixes the emit cache classifies outputs by.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    find_config, load_config, load_config_from_str, load_layered, merge_tables, LoadOptions,
    LoadedConfig, CONFIG_FILE_NAME,
};
pub use types::*;
