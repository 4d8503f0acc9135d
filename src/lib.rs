pub mod animation;
pub mod args;
pub mod config;
pub mod content;
pub mod errors;
#[cfg(feature = "js")]
pub mod js_module;
pub mod keyframes;
pub mod manifest;
pub mod preset;
pub mod validate;

pub use animation::{AnimationShorthand, CssTime, IterationCount, TimingFunction};
pub use args::{Cli, Commands, ConfigSource, ExportArgs, ScanArgs, ShowArgs, ValidateArgs};
pub use config::{ConfigFormat, Declarations, KeyframeSteps, TailwindConfig, Theme, ThemeExtend};
pub use content::{resolve_content, ContentKind, ResolvedContent, ScanOptions};
pub use errors::{ConfigError, Result};
pub use keyframes::{KeyframeSelector, Timeline};
pub use manifest::ScanManifest;
pub use preset::dashboard_preset;
pub use validate::{validate, Issue, Severity, ValidationReport};

#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Load the configuration named by `source`, or the built-in dashboard theme.
pub fn load_config(source: &ConfigSource) -> Result<TailwindConfig> {
    match &source.config {
        Some(path) => TailwindConfig::from_file(path),
        None => {
            tracing::debug!("using built-in dashboard theme");
            Ok(dashboard_preset())
        }
    }
}

/// Write the configuration in the requested format. Returns the bytes written.
pub fn export(args: &ExportArgs) -> Result<usize> {
    let format = args
        .resolved_format()
        .map_err(ConfigError::InvalidInput)?;
    let config = load_config(&args.source)?;

    if args.output.exists() && !args.force {
        return Err(ConfigError::OutputExists {
            path: args.output.display().to_string(),
        });
    }

    let rendered = config.render(format)?;
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.output, &rendered)?;
    tracing::info!(path = %args.output.display(), ?format, "exported configuration");

    Ok(rendered.len())
}

/// Result of scanning the content patterns
#[derive(Debug)]
pub struct ScanResult {
    pub resolved: ResolvedContent,
    pub manifest: ScanManifest,
    pub duration: Duration,
}

/// Resolve the configured content patterns into files
pub fn scan(args: &ScanArgs, show_progress: bool) -> Result<ScanResult> {
    let start_time = Instant::now();
    args.validate().map_err(ConfigError::InvalidInput)?;

    let config = load_config(&args.source)?;
    let options = ScanOptions {
        base_dir: args.base.clone(),
        exclude: args.exclude.clone(),
        allow_symlinks: args.allow_symlinks,
        jobs: args.jobs,
        ..ScanOptions::default()
    };

    tracing::info!(
        patterns = config.content.len(),
        base = %options.base_dir.display(),
        "scanning content patterns"
    );

    #[cfg(feature = "cli")]
    let resolved = {
        let progress = if show_progress {
            let pb = ProgressBar::new(config.content.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
            {
                pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
            }
            Some(pb)
        } else {
            None
        };

        let resolved = resolve_content(&config.content, &options, |pattern, _| {
            if let Some(pb) = &progress {
                pb.set_message(pattern.to_string());
                pb.inc(1);
            }
        })?;

        if let Some(pb) = progress {
            pb.finish_with_message(format!("✓ {} files", resolved.files.len()));
        }
        resolved
    };

    #[cfg(not(feature = "cli"))]
    let resolved = {
        let _ = show_progress;
        resolve_content(&config.content, &options, |_, _| {})?
    };

    let manifest = ScanManifest::from_resolved(&resolved, &options.base_dir);
    for pattern in manifest.empty_patterns() {
        tracing::warn!("Content pattern matched no files: {}", pattern);
    }

    if let Some(path) = &args.manifest {
        write_manifest(path, &manifest)?;
    }

    Ok(ScanResult {
        resolved,
        manifest,
        duration: start_time.elapsed(),
    })
}

fn write_manifest(path: &Path, manifest: &ScanManifest) -> Result<()> {
    let json = manifest.to_json()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote scan manifest");
    Ok(())
}
