//! Configuration file discovery, layering, and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

/// Default configuration file name searched for by [`find_config`].
pub const CONFIG_FILE_NAME: &str = "ember.toml";

/// Options for [`load_layered`].
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    /// An explicit config file name. When set, failing to find it is an error.
    pub file_name: Option<String>,
    /// Values the config file is merged on top of.
    pub defaults: Table,
    /// Values merged on top of the config file.
    pub overrides: Table,
}

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The validated configuration.
    pub config: ProjectConfig,
    /// The config file that was read, if one was found.
    pub config_path: Option<PathBuf>,
    /// Directory that relative paths in the configuration are resolved against.
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Returns the entry files resolved against the base directory.
    pub fn entry_paths(&self) -> Vec<PathBuf> {
        self.resolve_all(&self.config.project.entries)
    }

    /// Returns the type root directories resolved against the base directory.
    pub fn type_root_paths(&self) -> Vec<PathBuf> {
        self.resolve_all(&self.config.compiler.type_roots)
    }

    fn resolve_all(&self, paths: &[String]) -> Vec<PathBuf> {
        paths.iter().map(|p| self.base_dir.join(p)).collect()
    }
}

/// Loads and validates `<project_dir>/ember.toml`.
///
/// A relative `project_dir` is made absolute against the working directory.
pub fn load_config(project_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let project_dir = std::path::absolute(project_dir)?;
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    let config = load_config_from_str(&content)?;
    Ok(LoadedConfig {
        config,
        config_path: Some(config_path),
        base_dir: project_dir,
    })
}

/// Parses and validates an `ember.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Searches `start_dir` and its ancestors for a config file named `file_name`.
pub fn find_config(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

/// Locates, layers, and validates the project configuration.
///
/// The config file is searched upward from `cwd`. The final table is
/// `defaults`, then the file (if found), then `overrides`, deep-merged in that
/// order. Relative paths resolve against the directory of the config file, or
/// `cwd` when no file was found; either way `base_dir` is absolute.
pub fn load_layered(cwd: &Path, options: &LoadOptions) -> Result<LoadedConfig, ConfigError> {
    let cwd = std::path::absolute(cwd)?;
    let name = options.file_name.as_deref().unwrap_or(CONFIG_FILE_NAME);
    let config_path = find_config(&cwd, name);

    if options.file_name.is_some() && config_path.is_none() {
        return Err(ConfigError::NotFound(PathBuf::from(name)));
    }

    let mut merged = options.defaults.clone();
    let mut base_dir = cwd.clone();

    if let Some(path) = &config_path {
        debug!(path = %path.display(), "loading configuration");
        if let Some(parent) = path.parent() {
            base_dir = parent.to_path_buf();
        }
        let text = std::fs::read_to_string(path)?;
        let file: Table = toml::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        merge_tables(&mut merged, file);
    }

    merge_tables(&mut merged, options.overrides.clone());

    let config: ProjectConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;

    Ok(LoadedConfig {
        config,
        config_path,
        base_dir,
    })
}

/// Deep-merges `overlay` into `base`.
///
/// Nested tables merge key by key; any other value in `overlay` (including
/// arrays) replaces the value in `base`.
pub fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Validates that configuration values are present and consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.entries.is_empty() {
        return Err(ConfigError::ValidationError(
            "project.entries must list at least one file".to_string(),
        ));
    }

    let artifacts = &config.artifacts;
    for (name, suffix) in [
        ("artifacts.code", &artifacts.code),
        ("artifacts.source_map", &artifacts.source_map),
        ("artifacts.declaration", &artifacts.declaration),
        ("artifacts.declaration_map", &artifacts.declaration_map),
    ] {
        if suffix.is_empty() {
            return Err(ConfigError::ValidationError(format!("{name} is empty")));
        }
    }

    if let Some(ext) = config
        .compiler
        .source_extensions
        .iter()
        .find(|ext| !ext.starts_with('.'))
    {
        return Err(ConfigError::ValidationError(format!(
            "source extension '{ext}' must start with '.'"
        )));
    }

    Ok(())
}
