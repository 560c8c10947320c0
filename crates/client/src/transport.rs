//! Transport seam.
//!
//! The client hands the transport an operation name, a payload map, and the
//! per-call context (endpoint + credentials) and gets back a structured
//! response. Envelope details — SOAP serialization, HTTP, retries, timeouts —
//! live entirely behind this trait.

use clearbooks_core::{WireMap, WireValue};
use thiserror::Error;

/// Per-call parameters resolved from configuration at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Transport failure shapes.
///
/// Whatever the shape, the client re-raises it as a single remote-operation
/// error carrying the originating verb.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service could not be reached or the response was unreadable.
    #[error("network failure: {0}")]
    Network(String),

    /// The service reported a fault.
    #[error("remote fault {code}: {message}")]
    Fault { code: String, message: String },

    /// The transport gave up waiting.
    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn fault(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fault {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A transport accepts an operation name and a structured payload and
/// returns a structured response, synchronously.
pub trait Transport: Send + Sync {
    fn call(
        &self,
        context: &CallContext,
        operation: &str,
        payload: WireMap,
    ) -> Result<WireValue, TransportError>;
}
