//! `clearbooks-client` — typed RPC dispatch for the Clearbooks API.
//!
//! The public entry point is [`Clearbooks`], an explicit context object
//! owning the shared [`Configuration`] and the [`RpcClient`]. Every remote
//! operation belongs to the sealed [`Verb`] set; dispatch is a typed
//! [`Call`] → [`Reply`] invocation, and the capability query
//! ([`Clearbooks::supports`]) is a static membership test against the same
//! enumeration, so introspection always agrees with dispatch.

pub mod client;
pub mod error;
pub mod facade;
pub mod transport;
pub mod verb;

pub use client::{Call, ListIter, Reply, RpcClient};
pub use error::{ClientError, ClientResult};
pub use facade::Clearbooks;
pub use transport::{CallContext, Transport, TransportError};
pub use verb::{Action, Verb};

pub use clearbooks_config::{
    Configuration, ConfigurationError, CredentialStore, CredentialStoreError,
    DirCredentialStore, EnvCredentialStore, MemoryCredentialStore,
};
pub use clearbooks_core::{AttributeCodec, MappingError, WireMap, WireValue};
pub use clearbooks_model::{Entity, EntityRelation, Invoice, Item, Model, ModelError, Resource};
