//! Error types for requirement and translation loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading requirement specifications or translation tables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// Input file not found.
    #[error("{kind} file not found: {path}")]
    FileNotFound { kind: &'static str, path: PathBuf },

    /// Requirement file with an extension other than `.yaml`/`.yml`.
    #[error("requirement file {path} must be provided in YAML format (.yaml/.yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse requirement YAML: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
    },

    /// Structurally invalid requirement entry.
    #[error("invalid requirement entry: {message}")]
    InvalidEntry { message: String },

    /// A `process_bindings` entry naming a template that does not exist.
    #[error("process binding for '{dataset_id}' references unknown template '{template}'")]
    UnresolvedBinding { dataset_id: String, template: String },

    #[error("no translation entries parsed from {source_name}")]
    EmptyTranslations { source_name: String },
}

impl StandardsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            message: message.into(),
        }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, StandardsError>;
