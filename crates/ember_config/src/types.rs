//! Configuration types deserialized from `ember.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `ember.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// The project's entry files.
    pub project: ProjectMeta,
    /// Compiler-facing settings (declarations, type roots, path handling).
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Output path suffixes used to classify emitted artifacts.
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

/// Project metadata required in every `ember.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// Entry files, relative to the directory containing the config file.
    pub entries: Vec<String>,
}

/// Compiler settings that shape what the emit cache tracks and aggregates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Whether declaration artifacts should be collected for the bulk-write phase.
    pub declaration: bool,
    /// Whether declaration-map artifacts should be collected as well.
    /// Only honored when `declaration` is enabled.
    pub declaration_map: bool,
    /// Directories whose packages are included automatically.
    pub type_roots: Vec<String>,
    /// Extensions of source-language files; external dependencies resolving to
    /// one of these are tracked as external-typed.
    pub source_extensions: Vec<String>,
    /// Whether paths differing only in case name different files.
    pub case_sensitive_paths: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            declaration: false,
            declaration_map: false,
            type_roots: vec!["node_modules/@types".to_string()],
            source_extensions: vec![".ts".to_string(), ".tsx".to_string(), ".d.ts".to_string()],
            case_sensitive_paths: true,
        }
    }
}

/// Path suffixes identifying each kind of emitted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Suffix of compiled code outputs.
    pub code: String,
    /// Suffix of source map outputs.
    pub source_map: String,
    /// Suffix of declaration outputs.
    pub declaration: String,
    /// Suffix of declaration-map outputs.
    pub declaration_map: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            code: ".js".to_string(),
            source_map: ".js.map".to_string(),
            declaration: ".d.ts".to_string(),
            declaration_map: ".d.ts.map".to_string(),
        }
    }
}
