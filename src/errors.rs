use thiserror::Error;

/// Main error type for the tailwind-theme crate
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read config file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Unsupported config file format: {path}. Use .json, .yaml, .yml, .js, .cjs or .mjs")]
    UnsupportedFormat { path: String },

    #[error("Failed to parse {source_name}: {message}")]
    ParseError { source_name: String, message: String },

    #[error("Unsupported expression at `{path}`: {kind}")]
    UnsupportedExpression { path: String, kind: String },

    #[error("No exported configuration object found in {source_name}")]
    MissingExport { source_name: String },

    #[error("Invalid keyframe selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid animation shorthand {value:?}: {message}")]
    InvalidAnimation { value: String, message: String },

    #[error("Refusing to overwrite existing file {path}")]
    OutputExists { path: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Security violation: {0}")]
    SecurityError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
