//! Content patterns: classification by file extension and resolution of the
//! globs into the set of files a build would scan.

use crate::errors::{ConfigError, Result};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const MARKUP_EXTENSIONS: [&str; 13] = [
    "html", "htm", "jinja", "jinja2", "j2", "hbs", "vue", "svelte", "astro", "md", "mdx", "php", "erb",
];
const SCRIPT_EXTENSIONS: [&str; 6] = ["js", "cjs", "mjs", "jsx", "ts", "tsx"];
const STYLE_EXTENSIONS: [&str; 3] = ["css", "scss", "sass"];

/// What kind of file a content pattern targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentKind {
    Markup,
    Script,
    Style,
    Other,
}

impl ContentKind {
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_ascii_lowercase();
        if MARKUP_EXTENSIONS.contains(&extension.as_str()) {
            Self::Markup
        } else if SCRIPT_EXTENSIONS.contains(&extension.as_str()) {
            Self::Script
        } else if STYLE_EXTENSIONS.contains(&extension.as_str()) {
            Self::Style
        } else {
            Self::Other
        }
    }
}

/// Expand `{a,b}` alternations, which `glob` does not understand.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(open + i),
            _ => {}
        }
    }

    // Unbalanced braces are left to glob to reject
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alternative = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", prefix, alternative, suffix))
        })
        .collect()
}

/// Kinds of files a single pattern can match
pub fn classify_pattern(pattern: &str) -> BTreeSet<ContentKind> {
    expand_braces(pattern)
        .iter()
        .map(|expanded| {
            let file_part = expanded.rsplit('/').next().unwrap_or(expanded);
            match file_part.rsplit_once('.') {
                Some((_, extension)) if !extension.contains('*') => ContentKind::from_extension(extension),
                _ => ContentKind::Other,
            }
        })
        .collect()
}

/// Union of the kinds targeted by all patterns
pub fn coverage(patterns: &[String]) -> BTreeSet<ContentKind> {
    patterns.iter().flat_map(|p| classify_pattern(p)).collect()
}

/// Options for resolving content patterns
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory relative patterns are resolved against
    pub base_dir: PathBuf,
    /// Glob patterns of paths to leave out
    pub exclude: Vec<String>,
    /// Follow symbolic links
    pub allow_symlinks: bool,
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: u64,
    /// Number of threads used for metadata checks
    pub jobs: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            exclude: Vec::new(),
            allow_symlinks: false,
            max_file_size: 10 * 1024 * 1024, // 10MB
            jobs: None,
        }
    }
}

/// A scanned file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Files matched by one content pattern
#[derive(Debug, Clone)]
pub struct PatternMatches {
    pub pattern: String,
    pub files: Vec<PathBuf>,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedContent {
    /// One entry per pattern, in configuration order
    pub patterns: Vec<PatternMatches>,
    /// Deduplicated union of all matches
    pub files: Vec<ResolvedFile>,
    /// Files rejected by the symlink or size checks
    pub skipped: usize,
}

impl ResolvedContent {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Check if a file is safe to read. `root` is the canonical form of the
/// pattern's `walk_root`.
fn validate_input_file(path: &Path, root: Option<&Path>, options: &ScanOptions) -> Result<u64> {
    if !options.allow_symlinks {
        if path.is_symlink() {
            return Err(ConfigError::SecurityError(format!(
                "Symbolic link not allowed: {}",
                path.display()
            )));
        }
        check_linked_ancestors(path, root)?;
    }

    let metadata = fs::metadata(path).map_err(|e| {
        ConfigError::SecurityError(format!("Cannot read file metadata for '{}': {}", path.display(), e))
    })?;

    if metadata.len() > options.max_file_size {
        return Err(ConfigError::SecurityError(format!(
            "File '{}' exceeds maximum size limit ({} bytes > {} bytes)",
            path.display(),
            metadata.len(),
            options.max_file_size
        )));
    }

    Ok(metadata.len())
}

/// Directories between the walk root and the file must not be symlinks
fn check_linked_ancestors(path: &Path, root: Option<&Path>) -> Result<()> {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        if root.is_some() && fs::canonicalize(ancestor).ok().as_deref() == root {
            break;
        }
        let linked = fs::symlink_metadata(ancestor)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if linked {
            return Err(ConfigError::SecurityError(format!(
                "Symbolic link not allowed: {} (reached through {})",
                path.display(),
                ancestor.display()
            )));
        }
    }
    Ok(())
}

/// Directory below which symlinked directories are refused: the base
/// directory for relative patterns, the leading literal directories of an
/// absolute one.
fn walk_root(pattern: &str, base_dir: &Path) -> PathBuf {
    let pattern = Path::new(pattern);
    if !pattern.is_absolute() {
        return base_dir.to_path_buf();
    }

    let mut root = PathBuf::new();
    let mut components = pattern.components().peekable();
    while let Some(component) = components.next() {
        let is_glob = component
            .as_os_str()
            .to_string_lossy()
            .contains(|c: char| matches!(c, '*' | '?' | '['));
        if is_glob || components.peek().is_none() {
            break;
        }
        root.push(component);
    }
    root
}

fn absolute_pattern(pattern: &str, base_dir: &Path) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let base = glob::Pattern::escape(&base_dir.to_string_lossy());
    let relative = pattern.strip_prefix("./").unwrap_or(pattern);
    format!("{}/{}", base.trim_end_matches('/'), relative)
}

fn should_exclude(path: &Path, base_dir: &Path, exclude: &[glob::Pattern]) -> bool {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    exclude
        .iter()
        .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
}

/// Resolve content patterns into files. `on_pattern` is called after each
/// pattern with the pattern and the number of files it matched.
pub fn resolve_content(
    patterns: &[String],
    options: &ScanOptions,
    mut on_pattern: impl FnMut(&str, usize),
) -> Result<ResolvedContent> {
    let exclude = options
        .exclude
        .iter()
        .flat_map(|p| expand_braces(p))
        .map(|p| glob::Pattern::new(&p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Candidate files per pattern, before the metadata checks
    let mut candidates: IndexMap<String, IndexSet<PathBuf>> = IndexMap::new();
    // Canonical walk root of the first pattern that matched each file
    let mut roots: IndexMap<PathBuf, Option<PathBuf>> = IndexMap::new();
    for pattern in patterns {
        let mut matched = IndexSet::new();
        for expanded in expand_braces(pattern) {
            let full = absolute_pattern(&expanded, &options.base_dir);
            let root = fs::canonicalize(walk_root(&expanded, &options.base_dir)).ok();
            tracing::debug!(pattern = %full, "expanding content pattern");
            for entry in glob::glob(&full)? {
                let path = entry?;
                if path.is_dir() || should_exclude(&path, &options.base_dir, &exclude) {
                    continue;
                }
                roots.entry(path.clone()).or_insert_with(|| root.clone());
                matched.insert(path);
            }
        }
        on_pattern(pattern.as_str(), matched.len());
        candidates.entry(pattern.clone()).or_default().extend(matched);
    }

    let unique: Vec<(&PathBuf, Option<&Path>)> = roots
        .iter()
        .map(|(path, root)| (path, root.as_deref()))
        .collect();

    let check = || -> Vec<(PathBuf, Option<u64>)> {
        unique
            .par_iter()
            .map(|(path, root)| match validate_input_file(path, *root, options) {
                Ok(size) => ((*path).clone(), Some(size)),
                Err(e) => {
                    tracing::warn!("Skipping file - {}", e);
                    ((*path).clone(), None)
                }
            })
            .collect()
    };

    let checked = match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(check),
            Err(e) => {
                tracing::warn!("Falling back to the global thread pool: {}", e);
                check()
            }
        },
        None => check(),
    };

    let mut resolved = ResolvedContent::default();
    let mut sizes: IndexMap<PathBuf, u64> = IndexMap::new();
    for (path, size) in checked {
        match size {
            Some(size) => {
                resolved.files.push(ResolvedFile { path: path.clone(), size });
                sizes.insert(path, size);
            }
            None => resolved.skipped += 1,
        }
    }

    for (pattern, paths) in candidates {
        let files: Vec<PathBuf> = paths.into_iter().filter(|p| sizes.contains_key(p)).collect();
        let bytes = files.iter().filter_map(|p| sizes.get(p)).sum();
        resolved.patterns.push(PatternMatches { pattern, files, bytes });
    }

    if resolved.skipped > 0 {
        tracing::warn!("Skipped {} files due to security constraints", resolved.skipped);
    }
    tracing::debug!(files = resolved.files.len(), "resolved content patterns");

    Ok(resolved)
}
