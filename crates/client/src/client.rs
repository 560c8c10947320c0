//! RPC client: the single dispatch point for all remote operations.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use clearbooks_config::Configuration;
use clearbooks_core::{MappingError, WireMap, WireValue};
use clearbooks_model::{collection_records, Entity, Invoice, Item, Model, Resource};

use crate::error::{ClientError, ClientResult};
use crate::transport::{CallContext, Transport};
use crate::verb::{Action, Verb};

/// A typed invocation of one verb with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateEntity(Entity),
    UpdateEntity(Entity),
    ListEntities,
    GetEntity(i64),
    DeleteEntity(i64),
    CreateInvoice(Invoice),
    UpdateInvoice(Invoice),
    ListInvoices,
    GetInvoice(i64),
    DeleteInvoice(i64),
    CreateItem(Item),
    UpdateItem(Item),
    ListItems,
    GetItem(i64),
    DeleteItem(i64),
}

impl Call {
    pub fn verb(&self) -> Verb {
        use Call::*;
        match self {
            CreateEntity(_) => Verb::new(Action::Create, Resource::Entity),
            UpdateEntity(_) => Verb::new(Action::Update, Resource::Entity),
            ListEntities => Verb::new(Action::List, Resource::Entity),
            GetEntity(_) => Verb::new(Action::Get, Resource::Entity),
            DeleteEntity(_) => Verb::new(Action::Delete, Resource::Entity),
            CreateInvoice(_) => Verb::new(Action::Create, Resource::Invoice),
            UpdateInvoice(_) => Verb::new(Action::Update, Resource::Invoice),
            ListInvoices => Verb::new(Action::List, Resource::Invoice),
            GetInvoice(_) => Verb::new(Action::Get, Resource::Invoice),
            DeleteInvoice(_) => Verb::new(Action::Delete, Resource::Invoice),
            CreateItem(_) => Verb::new(Action::Create, Resource::Item),
            UpdateItem(_) => Verb::new(Action::Update, Resource::Item),
            ListItems => Verb::new(Action::List, Resource::Item),
            GetItem(_) => Verb::new(Action::Get, Resource::Item),
            DeleteItem(_) => Verb::new(Action::Delete, Resource::Item),
        }
    }
}

/// Typed result of a [`Call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Entity(Entity),
    Entities(Vec<Entity>),
    Invoice(Invoice),
    Invoices(Vec<Invoice>),
    Item(Item),
    Items(Vec<Item>),
    Deleted(bool),
}

/// Lazily decoded list response. Each record is mapped onto its model only
/// when consumed; decoding failures surface per element.
pub struct ListIter<M: Model> {
    records: std::vec::IntoIter<WireMap>,
    _model: PhantomData<M>,
}

impl<M: Model> ListIter<M> {
    fn new(records: Vec<WireMap>) -> Self {
        Self {
            records: records.into_iter(),
            _model: PhantomData,
        }
    }

    /// Number of records still to decode.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    /// Decode everything that is left.
    pub fn collect_models(self) -> ClientResult<Vec<M>> {
        self.collect()
    }
}

impl<M: Model> Iterator for ListIter<M> {
    type Item = ClientResult<M>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(M::from_wire(&record).map_err(ClientError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

/// The single entry point for remote operations.
///
/// Shares its [`Configuration`] with the owning context and resolves
/// endpoint + credentials afresh on every call. All transport faults are
/// re-raised as [`ClientError::Remote`] carrying the originating verb.
pub struct RpcClient {
    config: Arc<Mutex<Configuration>>,
    transport: Arc<dyn Transport>,
}

impl RpcClient {
    pub fn new(config: Arc<Mutex<Configuration>>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Whether `invoke` accepts a verb of this name.
    pub fn supports(name: &str) -> bool {
        Verb::parse(name).is_some()
    }

    /// Dispatch a typed call.
    pub fn invoke(&self, call: Call) -> ClientResult<Reply> {
        use Call::*;
        match call {
            CreateEntity(model) => Ok(Reply::Entity(self.save(Action::Create, &model)?)),
            UpdateEntity(model) => Ok(Reply::Entity(self.save(Action::Update, &model)?)),
            ListEntities => Ok(Reply::Entities(self.list::<Entity>()?.collect_models()?)),
            GetEntity(id) => Ok(Reply::Entity(self.fetch(id)?)),
            DeleteEntity(id) => Ok(Reply::Deleted(self.delete(Resource::Entity, id)?)),
            CreateInvoice(model) => Ok(Reply::Invoice(self.save(Action::Create, &model)?)),
            UpdateInvoice(model) => Ok(Reply::Invoice(self.save(Action::Update, &model)?)),
            ListInvoices => Ok(Reply::Invoices(self.list::<Invoice>()?.collect_models()?)),
            GetInvoice(id) => Ok(Reply::Invoice(self.fetch(id)?)),
            DeleteInvoice(id) => Ok(Reply::Deleted(self.delete(Resource::Invoice, id)?)),
            CreateItem(model) => Ok(Reply::Item(self.save(Action::Create, &model)?)),
            UpdateItem(model) => Ok(Reply::Item(self.save(Action::Update, &model)?)),
            ListItems => Ok(Reply::Items(self.list::<Item>()?.collect_models()?)),
            GetItem(id) => Ok(Reply::Item(self.fetch(id)?)),
            DeleteItem(id) => Ok(Reply::Deleted(self.delete(Resource::Item, id)?)),
        }
    }

    pub fn create_entity(&self, entity: &Entity) -> ClientResult<Entity> {
        self.save(Action::Create, entity)
    }

    pub fn update_entity(&self, entity: &Entity) -> ClientResult<Entity> {
        self.save(Action::Update, entity)
    }

    pub fn list_entities(&self) -> ClientResult<ListIter<Entity>> {
        self.list()
    }

    pub fn get_entity(&self, id: i64) -> ClientResult<Entity> {
        self.fetch(id)
    }

    pub fn delete_entity(&self, id: i64) -> ClientResult<bool> {
        self.delete(Resource::Entity, id)
    }

    pub fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        self.save(Action::Create, invoice)
    }

    pub fn update_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        self.save(Action::Update, invoice)
    }

    pub fn list_invoices(&self) -> ClientResult<ListIter<Invoice>> {
        self.list()
    }

    pub fn get_invoice(&self, id: i64) -> ClientResult<Invoice> {
        self.fetch(id)
    }

    pub fn delete_invoice(&self, id: i64) -> ClientResult<bool> {
        self.delete(Resource::Invoice, id)
    }

    pub fn create_item(&self, item: &Item) -> ClientResult<Item> {
        self.save(Action::Create, item)
    }

    pub fn update_item(&self, item: &Item) -> ClientResult<Item> {
        self.save(Action::Update, item)
    }

    pub fn list_items(&self) -> ClientResult<ListIter<Item>> {
        self.list()
    }

    pub fn get_item(&self, id: i64) -> ClientResult<Item> {
        self.fetch(id)
    }

    pub fn delete_item(&self, id: i64) -> ClientResult<bool> {
        self.delete(Resource::Item, id)
    }

    fn save<M: Model>(&self, action: Action, model: &M) -> ClientResult<M> {
        let verb = Verb::new(action, M::RESOURCE);
        let mut payload = WireMap::new();
        payload.insert(M::RESOURCE.element_name(), model.to_wire()?);
        let response = self.dispatch(verb, payload)?;

        let id = response
            .as_map()
            .and_then(|map| map.get_attr(M::RESOURCE.id_key()))
            .and_then(WireValue::as_i64)
            .ok_or_else(|| {
                MappingError::malformed(format!(
                    "`{verb}` response carries no {}",
                    M::RESOURCE.id_key()
                ))
            })?;

        let mut saved = model.clone();
        saved.assign_id(id);
        Ok(saved)
    }

    fn fetch<M: Model>(&self, id: i64) -> ClientResult<M> {
        let verb = Verb::new(Action::Get, M::RESOURCE);
        let mut payload = WireMap::new();
        payload.insert(M::RESOURCE.id_key(), id);
        let response = self.dispatch(verb, payload)?;

        let record = response
            .as_map()
            .and_then(|map| map.get_attr(M::RESOURCE.element_name()))
            .and_then(WireValue::as_map)
            .ok_or_else(|| {
                MappingError::malformed(format!(
                    "`{verb}` response carries no {} record",
                    M::RESOURCE.element_name()
                ))
            })?;
        Ok(M::from_wire(record)?)
    }

    fn list<M: Model>(&self) -> ClientResult<ListIter<M>> {
        let verb = Verb::new(Action::List, M::RESOURCE);
        let response = self.dispatch(verb, WireMap::new())?;
        let records = extract_records(&response, M::RESOURCE)?;
        tracing::debug!(verb = %verb, records = records.len(), "decoded list response");
        Ok(ListIter::new(records))
    }

    fn delete(&self, resource: Resource, id: i64) -> ClientResult<bool> {
        let verb = Verb::new(Action::Delete, resource);
        let mut payload = WireMap::new();
        payload.insert(resource.id_key(), id);
        let response = self.dispatch(verb, payload)?;

        // A missing record comes back as an unsuccessful acknowledgment, not
        // a fault; batch deleters get a boolean instead of an exception.
        response
            .as_map()
            .and_then(|map| map.get_attr("success"))
            .and_then(WireValue::as_bool)
            .ok_or_else(|| {
                MappingError::malformed(format!("`{verb}` response carries no success flag"))
                    .into()
            })
    }

    fn dispatch(&self, verb: Verb, payload: WireMap) -> ClientResult<WireValue> {
        let context = self.call_context()?;
        tracing::debug!(verb = %verb, endpoint = %context.endpoint, "invoking remote operation");
        self.transport
            .call(&context, verb.as_str(), payload)
            .map_err(|source| ClientError::remote(verb, source))
    }

    /// Resolve endpoint and credentials for this call. Configuration is read
    /// every time so reconfiguration takes effect immediately.
    fn call_context(&self) -> ClientResult<CallContext> {
        let config = self.lock_config();
        Ok(CallContext {
            endpoint: config.endpoint()?,
            api_key: config.resolved_api_key()?,
        })
    }

    fn lock_config(&self) -> MutexGuard<'_, Configuration> {
        self.config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn extract_records(response: &WireValue, resource: Resource) -> ClientResult<Vec<WireMap>> {
    let map = match response {
        WireValue::Map(map) => map,
        WireValue::Null => return Ok(Vec::new()),
        other => {
            return Err(MappingError::malformed(format!(
                "list response is not a map: {other:?}"
            ))
            .into())
        }
    };
    let Some(collection) = map.get_attr(resource.collection_name()) else {
        return Ok(Vec::new());
    };
    let records_value = match collection {
        // Usual shape: a wrapper keyed by the element name.
        WireValue::Map(inner) => match inner.get(resource.element_name()) {
            Some(value) => value,
            // No wrapper key: the map is a single collapsed record.
            None => collection,
        },
        WireValue::Null => return Ok(Vec::new()),
        other => other,
    };
    let records = collection_records(records_value)?;
    Ok(records.into_iter().cloned().collect())
}
