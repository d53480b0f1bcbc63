//! Classification of emitted artifacts.
//!
//! Backend adapters tag every output file with an [`ArtifactKind`] so the cache
//! never has to guess from a path. Adapters that only know paths use
//! [`ArtifactSuffixes::classify`], which resolves overlapping suffixes (e.g.
//! `.d.ts.map` vs. `.js.map`) by picking the longest match.

use std::fmt;

use ember_config::ArtifactConfig;

/// The role of an emitted output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Compiled code.
    MainCode,
    /// Source map for the compiled code.
    SourceMap,
    /// Type declaration file.
    Declaration,
    /// Source map for the declaration file.
    DeclarationMap,
    /// Anything else the backend wrote (build info, assets).
    Other,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::MainCode => write!(f, "code"),
            ArtifactKind::SourceMap => write!(f, "source map"),
            ArtifactKind::Declaration => write!(f, "declaration"),
            ArtifactKind::DeclarationMap => write!(f, "declaration map"),
            ArtifactKind::Other => write!(f, "other"),
        }
    }
}

/// One emitted artifact as stored in a cache item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmittedArtifact {
    /// What the artifact is.
    pub kind: ArtifactKind,
    /// The artifact's full text.
    pub text: String,
}

/// Path suffixes identifying each artifact kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSuffixes {
    code: String,
    source_map: String,
    declaration: String,
    declaration_map: String,
}

impl ArtifactSuffixes {
    /// Builds the suffix table from the project configuration.
    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self {
            code: config.code.clone(),
            source_map: config.source_map.clone(),
            declaration: config.declaration.clone(),
            declaration_map: config.declaration_map.clone(),
        }
    }

    /// Classifies an output path by its most specific matching suffix.
    ///
    /// When several suffixes match, the longest one wins; equal-length matches
    /// keep the first in the order code, source map, declaration, declaration
    /// map. Paths matching nothing are [`ArtifactKind::Other`].
    pub fn classify(&self, path: &str) -> ArtifactKind {
        let candidates = [
            (ArtifactKind::MainCode, &self.code),
            (ArtifactKind::SourceMap, &self.source_map),
            (ArtifactKind::Declaration, &self.declaration),
            (ArtifactKind::DeclarationMap, &self.declaration_map),
        ];

        let mut best: Option<(ArtifactKind, usize)> = None;
        for (kind, suffix) in candidates {
            if !path.ends_with(suffix.as_str()) {
                continue;
            }
            if best.map_or(true, |(_, len)| suffix.len() > len) {
                best = Some((kind, suffix.len()));
            }
        }
        best.map_or(ArtifactKind::Other, |(kind, _)| kind)
    }
}

impl Default for ArtifactSuffixes {
    fn default() -> Self {
        Self::from_config(&ArtifactConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_suffixes() {
        let s = ArtifactSuffixes::default();
        assert_eq!(s.classify("/out/a.js"), ArtifactKind::MainCode);
        assert_eq!(s.classify("/out/a.js.map"), ArtifactKind::SourceMap);
        assert_eq!(s.classify("/out/a.d.ts"), ArtifactKind::Declaration);
        assert_eq!(s.classify("/out/a.d.ts.map"), ArtifactKind::DeclarationMap);
        assert_eq!(s.classify("/out/tsconfig.tsbuildinfo"), ArtifactKind::Other);
    }

    #[test]
    fn longest_suffix_wins() {
        let s = ArtifactSuffixes::from_config(&ArtifactConfig {
            code: ".js".to_string(),
            source_map: ".map".to_string(),
            declaration: ".d.ts".to_string(),
            declaration_map: ".d.ts.map".to_string(),
        });
        // ".map" and ".d.ts.map" both match; the declaration map is more specific
        assert_eq!(s.classify("/out/a.d.ts.map"), ArtifactKind::DeclarationMap);
        assert_eq!(s.classify("/out/a.js.map"), ArtifactKind::SourceMap);
    }

    #[test]
    fn equal_length_keeps_first() {
        let s = ArtifactSuffixes::from_config(&ArtifactConfig {
            code: ".out".to_string(),
            source_map: ".out".to_string(),
            declaration: ".d".to_string(),
            declaration_map: ".dm".to_string(),
        });
        assert_eq!(s.classify("x.out"), ArtifactKind::MainCode);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ArtifactKind::MainCode.to_string(), "code");
        assert_eq!(ArtifactKind::DeclarationMap.to_string(), "declaration map");
    }
}
