//! Attribute codec.
//!
//! The service flattens XML elements and XML attributes into one map and
//! marks attributes with a leading `@`. Which keys are attributes is part of
//! the service contract, so the codec is constructed with that key set
//! explicitly — it is never inferred from the data.

use std::collections::BTreeSet;

use crate::error::{MappingError, MappingResult};
use crate::wire::{WireMap, WireValue};

/// Marker the service uses for XML-attribute keys.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Bidirectional translation between domain attribute maps and wire maps.
///
/// Pure functions over [`WireMap`]; no I/O.
#[derive(Debug, Clone, Default)]
pub struct AttributeCodec {
    attribute_keys: BTreeSet<String>,
}

impl AttributeCodec {
    /// Codec with no attribute-designated keys (elements only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that renders the given keys `@`-prefixed on encode.
    pub fn with_attribute_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_attribute_key(&self, key: &str) -> bool {
        self.attribute_keys.contains(key)
    }

    /// Render a domain attribute map into wire form.
    ///
    /// Null-valued entries are dropped entirely (recursively), designated
    /// keys gain the `@` prefix, nested maps and lists are encoded in place.
    /// Insertion order is preserved. A domain key that already carries the
    /// reserved prefix is malformed input.
    pub fn encode(&self, map: &WireMap) -> MappingResult<WireMap> {
        let mut out = WireMap::with_capacity(map.len());
        for (key, value) in map.iter() {
            if value.is_null() {
                continue;
            }
            if key.starts_with(ATTRIBUTE_PREFIX) {
                return Err(MappingError::malformed(format!(
                    "domain key `{key}` carries the reserved `@` prefix"
                )));
            }
            let wire_key = if self.is_attribute_key(key) {
                format!("{ATTRIBUTE_PREFIX}{key}")
            } else {
                key.to_string()
            };
            out.insert(wire_key, self.encode_value(value)?);
        }
        Ok(out)
    }

    /// Translate a wire map back into domain attribute keys.
    ///
    /// The `@` prefix is stripped unconditionally and nested values are
    /// decoded recursively. A map carrying both `@key` and `key` is rejected:
    /// picking a winner would depend on insertion order.
    pub fn decode(&self, map: &WireMap) -> MappingResult<WireMap> {
        let mut out = WireMap::with_capacity(map.len());
        for (key, value) in map.iter() {
            let logical = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(key);
            if out.contains_key(logical) {
                return Err(MappingError::conflicting_keys(logical));
            }
            out.insert(logical, self.decode_value(value)?);
        }
        Ok(out)
    }

    fn encode_value(&self, value: &WireValue) -> MappingResult<WireValue> {
        match value {
            WireValue::Map(inner) => Ok(WireValue::Map(self.encode(inner)?)),
            WireValue::List(items) => Ok(WireValue::List(
                items
                    .iter()
                    .map(|item| self.encode_value(item))
                    .collect::<MappingResult<_>>()?,
            )),
            scalar => Ok(scalar.clone()),
        }
    }

    fn decode_value(&self, value: &WireValue) -> MappingResult<WireValue> {
        match value {
            WireValue::Map(inner) => Ok(WireValue::Map(self.decode(inner)?)),
            WireValue::List(items) => Ok(WireValue::List(
                items
                    .iter()
                    .map(|item| self.decode_value(item))
                    .collect::<MappingResult<_>>()?,
            )),
            scalar => Ok(scalar.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire_map;
    use proptest::prelude::*;

    fn codec() -> AttributeCodec {
        AttributeCodec::with_attribute_keys(["entity_id", "vat_rate"])
    }

    #[test]
    fn encode_prefixes_designated_keys() {
        let map = wire_map! {
            "entity_id" => 6i64,
            "company_name" => "Example Inc.",
        };
        let wire = codec().encode(&map).unwrap();
        let keys: Vec<&str> = wire.keys().collect();
        assert_eq!(keys, vec!["@entity_id", "company_name"]);
    }

    #[test]
    fn encode_drops_null_values() {
        let map = wire_map! {
            "company_name" => "Example Inc.",
            "fax" => WireValue::Null,
            "supplier" => wire_map! {
                "default_credit_terms" => 30i64,
                "default_vat_rate" => WireValue::Null,
            },
        };
        let wire = codec().encode(&map).unwrap();
        assert!(!wire.contains_key("fax"));
        let supplier = wire.get("supplier").and_then(WireValue::as_map).unwrap();
        assert_eq!(supplier.len(), 1);
        assert!(!supplier.contains_key("default_vat_rate"));
    }

    #[test]
    fn encode_rejects_already_prefixed_domain_keys() {
        let map = wire_map! { "@entity_id" => 6i64 };
        let err = codec().encode(&map).unwrap_err();
        assert!(matches!(err, MappingError::MalformedStructure(_)));
    }

    #[test]
    fn decode_strips_prefix_from_either_form() {
        let prefixed = wire_map! { "@company_name" => "Example Inc." };
        let bare = wire_map! { "company_name" => "Example Inc." };
        let codec = codec();
        assert_eq!(codec.decode(&prefixed).unwrap(), codec.decode(&bare).unwrap());
    }

    #[test]
    fn decode_recurses_into_nested_maps_and_lists() {
        let wire = wire_map! {
            "invoices" => vec![
                WireValue::Map(wire_map! { "@invoice_id" => "1" }),
                WireValue::Map(wire_map! { "@invoice_id" => "2" }),
            ],
        };
        let decoded = codec().decode(&wire).unwrap();
        let invoices = decoded.get("invoices").and_then(WireValue::as_list).unwrap();
        let second = invoices[1].as_map().unwrap();
        assert_eq!(second.get("invoice_id").and_then(WireValue::as_i64), Some(2));
    }

    #[test]
    fn decode_rejects_conflicting_key_forms() {
        let wire = wire_map! {
            "@entity_id" => "6",
            "entity_id" => "7",
        };
        let err = codec().decode(&wire).unwrap_err();
        assert_eq!(err, MappingError::conflicting_keys("entity_id"));
    }

    #[test]
    fn encode_then_decode_restores_logical_keys() {
        let map = wire_map! {
            "entity_id" => 6i64,
            "company_name" => "Example Inc.",
        };
        let codec = codec();
        let round = codec.decode(&codec.encode(&map).unwrap()).unwrap();
        assert_eq!(round, map);
    }

    fn scalar_strategy() -> impl Strategy<Value = WireValue> {
        prop_oneof![
            any::<bool>().prop_map(WireValue::Bool),
            any::<i64>().prop_map(WireValue::Int),
            "[a-z0-9 ]{0,12}".prop_map(WireValue::Text),
        ]
    }

    fn map_strategy() -> impl Strategy<Value = WireMap> {
        let leaf = scalar_strategy();
        let value = leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                inner.clone(),
                prop::collection::vec(inner.clone(), 0..3).prop_map(WireValue::List),
                prop::collection::vec(("[a-z_]{1,8}", inner), 0..4)
                    .prop_map(|pairs| WireValue::Map(pairs.into_iter().collect())),
            ]
        });
        prop::collection::vec(("[a-z_]{1,8}", value), 0..6)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any non-null domain map, decode(encode(m)) == m.
        #[test]
        fn round_trip_is_identity(map in map_strategy()) {
            let codec = AttributeCodec::with_attribute_keys(["entity_id", "vat_rate", "success"]);
            let encoded = codec.encode(&map).unwrap();
            let decoded = codec.decode(&encoded).unwrap();
            prop_assert_eq!(decoded, map);
        }
    }
}
