//! Shared model interface and attribute-map plumbing.

use chrono::NaiveDate;
use clearbooks_core::{AttributeCodec, MappingError, MappingResult, WireMap, WireValue};

use crate::error::{ModelError, ModelResult};
use crate::resource::Resource;

/// Interface every Clearbooks model implements.
///
/// A model knows its resource kind, which of its wire keys the service
/// renders as XML attributes, and how to move between its typed fields and
/// the attribute-map representation the codec works on.
pub trait Model: Clone + PartialEq + core::fmt::Debug + Sized {
    /// Resource kind this model maps to.
    const RESOURCE: Resource;

    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Keys the service contract designates as XML attributes.
    fn wire_attribute_keys() -> &'static [&'static str];

    /// Codec configured for this model's attribute keys.
    fn codec() -> AttributeCodec {
        AttributeCodec::with_attribute_keys(Self::wire_attribute_keys().iter().copied())
    }

    /// Remote identifier, present only once the record has been persisted.
    fn id(&self) -> Option<i64>;

    /// Assign the identifier reported by a successful create response.
    fn assign_id(&mut self, id: i64);

    /// Domain-facing attribute map (set fields only, plus extension entries).
    fn attribute_map(&self) -> WireMap;

    /// Construct from an attribute map, rejecting unknown names.
    fn from_attributes(map: WireMap) -> ModelResult<Self>;

    /// Construct from a decoded wire map, keeping unknown keys as extension
    /// attributes instead of discarding them.
    fn from_decoded(map: WireMap) -> ModelResult<Self>;

    /// Render toward the transport.
    fn to_wire(&self) -> MappingResult<WireMap> {
        Self::codec().encode(&self.attribute_map())
    }

    /// Build from a raw wire map.
    fn from_wire(map: &WireMap) -> ModelResult<Self> {
        let decoded = Self::codec().decode(map)?;
        Self::from_decoded(decoded)
    }

    /// Logical identity: the same persisted record iff both ids are present
    /// and equal; unpersisted instances compare by value.
    fn same_record(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

/// View a response collection value as individual records.
///
/// SOAP decoding collapses a single-element collection into a bare map, so a
/// record list may arrive as either a list of maps or one map.
pub fn collection_records(value: &WireValue) -> MappingResult<Vec<&WireMap>> {
    match value {
        // An empty collection decodes to nil.
        WireValue::Null => Ok(Vec::new()),
        WireValue::Map(single) => Ok(vec![single]),
        WireValue::List(items) => items
            .iter()
            .map(|item| {
                item.as_map().ok_or_else(|| {
                    MappingError::malformed("collection entry is not a record map")
                })
            })
            .collect(),
        other => Err(MappingError::malformed(format!(
            "expected a record collection, got {other:?}"
        ))),
    }
}

/// Consuming reader over an attribute map.
///
/// Models pull their known fields out one by one; what remains is either an
/// unknown-attribute construction error or the wire extension map, depending
/// on the construction path.
pub(crate) struct AttrReader {
    map: WireMap,
}

impl AttrReader {
    pub(crate) fn new(map: WireMap) -> Self {
        Self { map }
    }

    pub(crate) fn take_text(&mut self, key: &str) -> MappingResult<Option<String>> {
        match self.map.remove(key) {
            None | Some(WireValue::Null) => Ok(None),
            Some(WireValue::Text(s)) => Ok(Some(s)),
            Some(WireValue::Int(n)) => Ok(Some(n.to_string())),
            Some(WireValue::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(MappingError::type_mismatch(key, "text")),
        }
    }

    pub(crate) fn take_i64(&mut self, key: &str) -> MappingResult<Option<i64>> {
        match self.map.remove(key) {
            None | Some(WireValue::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| MappingError::type_mismatch(key, "integer")),
        }
    }

    pub(crate) fn take_date(&mut self, key: &str) -> MappingResult<Option<NaiveDate>> {
        match self.take_text(key)? {
            None => Ok(None),
            // The service appends a midnight time part on some date fields.
            Some(s) => {
                let date_part = s.get(..10).unwrap_or(&s);
                NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| MappingError::type_mismatch(key, "date (YYYY-MM-DD)"))
            }
        }
    }

    pub(crate) fn take_map(&mut self, key: &str) -> MappingResult<Option<WireMap>> {
        match self.map.remove(key) {
            None | Some(WireValue::Null) => Ok(None),
            Some(WireValue::Map(m)) => Ok(Some(m)),
            Some(_) => Err(MappingError::type_mismatch(key, "map")),
        }
    }

    pub(crate) fn take_raw(&mut self, key: &str) -> Option<WireValue> {
        self.map.remove(key)
    }

    /// Strict finish: any leftover key is an unknown attribute.
    pub(crate) fn expect_empty(self, model: &'static str) -> ModelResult<()> {
        match self.map.keys().next() {
            None => Ok(()),
            Some(key) => Err(ModelError::unknown_attribute(model, key)),
        }
    }

    /// Lenient finish: leftovers become the extension map.
    pub(crate) fn into_extra(self) -> WireMap {
        self.map
    }
}
