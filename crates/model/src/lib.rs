//! `clearbooks-model` — typed domain models for the Clearbooks API.
//!
//! Each model carries a fixed field set plus an explicit `extra` map that
//! preserves wire fields this client does not know yet (the service may add
//! fields before the client is updated). Construction from an attribute map
//! rejects unknown names outright.

pub mod base;
pub mod entity;
pub mod error;
pub mod invoice;
pub mod item;
pub mod resource;

pub use base::{collection_records, Model};
pub use entity::{Entity, EntityRelation};
pub use error::{ModelError, ModelResult};
pub use invoice::Invoice;
pub use item::Item;
pub use resource::Resource;
