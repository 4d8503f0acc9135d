use crate::config::ConfigFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tailwind theme configuration CLI - inspect, validate, export and scan a Tailwind config
#[derive(Parser, Debug)]
#[command(name = "tailwind-theme")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the configuration
    Show(ShowArgs),
    /// Check the configuration for consistency problems
    Validate(ValidateArgs),
    /// Write the configuration to a file
    Export(ExportArgs),
    /// Resolve content patterns into the files a build would scan
    Scan(ScanArgs),
}

/// Where the configuration comes from
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// Configuration file path (JSON, YAML or JS); the built-in dashboard theme when omitted
    #[arg(short = 'c', long = "config", value_name = "PATH", env = "TAILWIND_THEME_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the show command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = ConfigFormat::Json)]
    pub format: ConfigFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Treat warnings as errors
    #[arg(long = "strict", default_value_t = false)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

/// Arguments for the export command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Output file path
    #[arg(short = 'o', long = "output", value_name = "PATH", required = true)]
    pub output: PathBuf,

    /// Output format (detected from the output extension when omitted)
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<ConfigFormat>,

    /// Overwrite an existing file
    #[arg(long = "force", default_value_t = false)]
    pub force: bool,
}

/// Arguments for the scan command
#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Directory content patterns are resolved against
    #[arg(short = 'b', long = "base", value_name = "DIR", default_value = ".")]
    pub base: PathBuf,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN", num_args = 0..)]
    pub exclude: Vec<String>,

    /// Number of parallel threads to use
    #[arg(short = 'j', long = "jobs", value_name = "NUM")]
    pub jobs: Option<usize>,

    /// Follow symbolic links
    #[arg(long = "allow-symlinks", default_value_t = false)]
    pub allow_symlinks: bool,

    /// Write a JSON manifest of matched files
    #[arg(short = 'm', long = "manifest", value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

impl ExportArgs {
    /// Format to write, from the flag or the output extension
    pub fn resolved_format(&self) -> Result<ConfigFormat, String> {
        self.format
            .or_else(|| ConfigFormat::from_path(&self.output))
            .ok_or_else(|| {
                format!(
                    "Cannot infer a format from {}; pass --format",
                    self.output.display()
                )
            })
    }
}

impl ScanArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }
        Ok(())
    }
}
