//! Error types for design-file validation

use thiserror::Error;

/// Result type for design-file operations
pub type Result<T> = std::result::Result<T, DesignError>;

/// Design-file validation errors
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("unknown design file extension: {0}")]
    UnknownExtension(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unresolved schema reference: {0}")]
    UnresolvedRef(String),

    #[error("schema failed to compile: {0}")]
    SchemaCompile(String),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("path check failed: {0}")]
    PathCheck(String),

    #[error("cannot decode design file: {0}")]
    Decode(String),

    #[error("cannot encode as TOML: {0}")]
    TomlEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
