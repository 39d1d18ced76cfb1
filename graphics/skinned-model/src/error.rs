use thiserror::Error;

/// Error types for loading skinned models
///
/// Only load-time problems are reported here. Pose evaluation and bounds
/// queries never fail; they fall back to identity or static data instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The imported scene has no root node
    #[error("Scene '{0}' has no root node")]
    MissingRoot(String),

    /// A node refers to data that does not exist in the scene
    #[error("Reference error: {0}")]
    ReferenceError(String),

    /// Options or imported data failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
