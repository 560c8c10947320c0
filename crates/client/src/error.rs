//! Client error model.

use clearbooks_config::ConfigurationError;
use clearbooks_core::MappingError;
use clearbooks_model::ModelError;
use thiserror::Error;

use crate::transport::TransportError;
use crate::verb::Verb;

/// Result type used across the client layer.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-level error.
///
/// Transport faults of any shape are normalized into [`ClientError::Remote`]
/// at the dispatch boundary, so callers branch on one error kind regardless
/// of transport internals.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The verb name is outside the enumerated operation set.
    #[error("unsupported operation `{0}`")]
    UnsupportedOperation(String),

    /// The transport failed or the service reported a fault.
    #[error("remote operation `{verb}` failed: {source}")]
    Remote {
        verb: Verb,
        #[source]
        source: TransportError,
    },

    /// A payload or response could not be mapped.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A model could not be built from the response.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration could not be resolved for the call.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ClientError {
    pub fn remote(verb: Verb, source: TransportError) -> Self {
        Self::Remote { verb, source }
    }

    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedOperation(name.into())
    }
}
