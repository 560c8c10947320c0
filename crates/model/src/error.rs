//! Model error model.

use clearbooks_core::MappingError;
use thiserror::Error;

/// Result type used across the model layer.
pub type ModelResult<T> = Result<T, ModelError>;

/// Model-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Caller supplied an attribute name the model does not recognize.
    /// Fails fast at construction; nothing is silently dropped.
    #[error("unknown attribute `{attribute}` for {model}")]
    UnknownAttribute {
        model: &'static str,
        attribute: String,
    },

    /// The wire payload could not be mapped onto the model.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl ModelError {
    pub fn unknown_attribute(model: &'static str, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            model,
            attribute: attribute.into(),
        }
    }
}
