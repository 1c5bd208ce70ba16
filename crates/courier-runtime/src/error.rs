//! Runtime error types.

use thiserror::Error;

pub use crate::config::{ConfigError, ConfigResult};

/// Errors that can occur while building a prediction model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The settings name a model type with no implementation.
    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    /// A field the model needs is absent or unusable.
    #[error("Missing or invalid model field: {0}")]
    MissingField(String),

    /// Loading or validating the settings failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ModelError {
    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
