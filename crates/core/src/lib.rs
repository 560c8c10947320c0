//! `clearbooks-core` — wire value model and attribute codec.
//!
//! This crate contains the **pure mapping layer** (no I/O, no transport
//! concerns): the ordered key/value container exchanged with the Clearbooks
//! SOAP API and the codec that translates between domain attribute keys and
//! the service's `@`-prefixed wire keys.

pub mod codec;
pub mod error;
pub mod wire;

pub use codec::AttributeCodec;
pub use error::{MappingError, MappingResult};
pub use wire::{WireMap, WireValue};
