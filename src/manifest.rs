use crate::content::ResolvedContent;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata for the generated manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Version of the manifest format
    pub version: String,

    /// Timestamp when the manifest was generated
    pub generated_at: DateTime<Utc>,

    /// Number of content patterns
    pub patterns: usize,

    /// Number of unique files matched
    pub files_matched: usize,

    /// Files rejected by the symlink or size checks
    pub files_skipped: usize,

    /// Total size of the matched files
    pub total_bytes: u64,

    /// Tool version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
}

/// Files matched by a single content pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPatternInfo {
    /// Matched files, relative to the scan base where possible
    pub files: Vec<String>,

    /// Combined size in bytes
    pub bytes: u64,
}

/// Complete manifest structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanManifest {
    /// Metadata about the scan
    pub metadata: ManifestMetadata,

    /// Map of content patterns to what they matched
    pub patterns: IndexMap<String, ManifestPatternInfo>,
}

impl ScanManifest {
    /// Build a manifest from resolved content. Paths are made relative to
    /// `base_dir` when they live under it.
    pub fn from_resolved(resolved: &ResolvedContent, base_dir: &Path) -> Self {
        let patterns = resolved
            .patterns
            .iter()
            .map(|matches| {
                let files = matches
                    .files
                    .iter()
                    .map(|path| path.strip_prefix(base_dir).unwrap_or(path).display().to_string())
                    .collect();
                (
                    matches.pattern.clone(),
                    ManifestPatternInfo {
                        files,
                        bytes: matches.bytes,
                    },
                )
            })
            .collect();

        Self {
            metadata: ManifestMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                patterns: resolved.patterns.len(),
                files_matched: resolved.files.len(),
                files_skipped: resolved.skipped,
                total_bytes: resolved.total_bytes(),
                tool_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            patterns,
        }
    }

    /// Patterns that matched no file
    pub fn empty_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns
            .iter()
            .filter(|(_, info)| info.files.is_empty())
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
