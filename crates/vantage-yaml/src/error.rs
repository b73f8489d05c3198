//! Error types for manifest loading.

use thiserror::Error;

/// Error type for manifest loading and validation.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML decode or encode error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// JSON decode or encode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A widget without an id
    #[error("Widget at position {index} has an empty id")]
    EmptyWidgetId {
        /// Position in the manifest
        index: usize,
    },
    /// Two widgets sharing an id
    #[error("Duplicate widget id: {0}")]
    DuplicateWidgetId(String),
}
