//! Process-wide entry point.
//!
//! `Clearbooks` is an explicit context object: construct it once at process
//! start and pass it by reference. It owns the shared configuration (behind
//! a mutex, so concurrent reconfiguration cannot race client calls into
//! divergent state) and the RPC client, and forwards every verb to it.

use std::sync::{Arc, Mutex, MutexGuard};

use clearbooks_config::Configuration;
use clearbooks_model::{Entity, Invoice, Item};

use crate::client::{Call, ListIter, Reply, RpcClient};
use crate::error::ClientResult;
use crate::transport::Transport;
use crate::verb::Verb;

/// Shared client + configuration context.
pub struct Clearbooks {
    config: Arc<Mutex<Configuration>>,
    client: RpcClient,
}

impl Clearbooks {
    /// Build the context. If the `log` key resolves true, tracing is
    /// initialized (idempotently) from the `log_filter` key.
    pub fn new(config: Configuration, transport: Arc<dyn Transport>) -> Self {
        let log = config.log().unwrap_or(false);
        let filter = config.log_filter().unwrap_or(None);
        if log {
            match filter.as_deref() {
                Some(filter) => clearbooks_observability::init_with_filter(filter),
                None => clearbooks_observability::init(),
            }
        }

        let config = Arc::new(Mutex::new(config));
        let client = RpcClient::new(Arc::clone(&config), transport);
        Self { config, client }
    }

    /// Context with default configuration.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::new(Configuration::new(), transport)
    }

    /// Apply a configuration mutation; takes effect on the next call.
    pub fn configure(&self, f: impl FnOnce(&mut Configuration)) -> &Self {
        self.lock_config().configure(f);
        self
    }

    /// Drop lazily loaded configuration state (test isolation).
    pub fn reload(&self) {
        self.lock_config().reload();
    }

    /// Capability query: agrees exactly with what [`RpcClient::invoke`]
    /// accepts, because both are the same membership test.
    pub fn supports(name: &str) -> bool {
        Verb::parse(name).is_some()
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Dispatch a typed call.
    pub fn invoke(&self, call: Call) -> ClientResult<Reply> {
        self.client.invoke(call)
    }

    pub fn create_entity(&self, entity: &Entity) -> ClientResult<Entity> {
        self.client.create_entity(entity)
    }

    pub fn update_entity(&self, entity: &Entity) -> ClientResult<Entity> {
        self.client.update_entity(entity)
    }

    pub fn list_entities(&self) -> ClientResult<ListIter<Entity>> {
        self.client.list_entities()
    }

    pub fn get_entity(&self, id: i64) -> ClientResult<Entity> {
        self.client.get_entity(id)
    }

    pub fn delete_entity(&self, id: i64) -> ClientResult<bool> {
        self.client.delete_entity(id)
    }

    pub fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        self.client.create_invoice(invoice)
    }

    pub fn update_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        self.client.update_invoice(invoice)
    }

    pub fn list_invoices(&self) -> ClientResult<ListIter<Invoice>> {
        self.client.list_invoices()
    }

    pub fn get_invoice(&self, id: i64) -> ClientResult<Invoice> {
        self.client.get_invoice(id)
    }

    pub fn delete_invoice(&self, id: i64) -> ClientResult<bool> {
        self.client.delete_invoice(id)
    }

    pub fn create_item(&self, item: &Item) -> ClientResult<Item> {
        self.client.create_item(item)
    }

    pub fn update_item(&self, item: &Item) -> ClientResult<Item> {
        self.client.update_item(item)
    }

    pub fn list_items(&self) -> ClientResult<ListIter<Item>> {
        self.client.list_items()
    }

    pub fn get_item(&self, id: i64) -> ClientResult<Item> {
        self.client.get_item(id)
    }

    pub fn delete_item(&self, id: i64) -> ClientResult<bool> {
        self.client.delete_item(id)
    }

    fn lock_config(&self) -> MutexGuard<'_, Configuration> {
        self.config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
