//! Ordered wire value model.
//!
//! Requests and responses travel as nested key/value maps flattened out of the
//! service's XML. Key order is significant to the service, so [`WireMap`]
//! preserves insertion order instead of hashing. The helpers here replace the
//! hash utilities the mapping layer needs (`compact`, prefix-tolerant lookup)
//! as free-standing functions on the container itself.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single wire value: scalar, nested map, or list of values.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Absent/nil. Never serialized toward the transport.
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<WireValue>),
    Map(WireMap),
}

impl WireValue {
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view. SOAP responses carry numbers as text, so text that
    /// parses as an integer counts.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            WireValue::Int(n) => Some(*n),
            WireValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Boolean view, accepting the textual forms the service emits.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Bool(b) => Some(*b),
            WireValue::Text(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            WireValue::Int(1) => Some(true),
            WireValue::Int(0) => Some(false),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            WireValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        WireValue::Bool(value)
    }
}

impl From<i64> for WireValue {
    fn from(value: i64) -> Self {
        WireValue::Int(value)
    }
}

impl From<i32> for WireValue {
    fn from(value: i32) -> Self {
        WireValue::Int(value.into())
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Text(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::Text(value)
    }
}

impl From<WireMap> for WireValue {
    fn from(value: WireMap) -> Self {
        WireValue::Map(value)
    }
}

impl From<Vec<WireValue>> for WireValue {
    fn from(value: Vec<WireValue>) -> Self {
        WireValue::List(value)
    }
}

impl<T: Into<WireValue>> From<Option<T>> for WireValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => WireValue::Null,
        }
    }
}

/// Insertion-ordered map of wire keys to values. Keys are unique; inserting
/// an existing key replaces the value in place without moving the key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireMap {
    entries: Vec<(String, WireValue)>,
}

impl WireMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<WireValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Lookup tolerant of the `@` attribute prefix: `get_attr("name")` finds
    /// either `name` or `@name`.
    pub fn get_attr(&self, key: &str) -> Option<&WireValue> {
        self.get(key).or_else(|| {
            let prefixed = format!("@{key}");
            self.get(&prefixed)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<WireValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Copy without null-valued entries (shallow; the codec handles nesting).
    pub fn compact(&self) -> WireMap {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_null())
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, WireValue)> for WireMap {
    fn from_iter<I: IntoIterator<Item = (String, WireValue)>>(iter: I) -> Self {
        let mut map = WireMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for WireMap {
    type Item = (String, WireValue);
    type IntoIter = std::vec::IntoIter<(String, WireValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`WireMap`] from literal key/value pairs.
#[macro_export]
macro_rules! wire_map {
    () => { $crate::wire::WireMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::wire::WireMap::new();
        $( map.insert($key, $value); )+
        map
    }};
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WireValue::Null => serializer.serialize_unit(),
            WireValue::Bool(b) => serializer.serialize_bool(*b),
            WireValue::Int(n) => serializer.serialize_i64(*n),
            WireValue::Text(s) => serializer.serialize_str(s),
            WireValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            WireValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for WireMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct WireValueVisitor;

impl<'de> Visitor<'de> for WireValueVisitor {
    type Value = WireValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a wire value (scalar, sequence, or map)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<WireValue, E> {
        Ok(WireValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireValue, E> {
        Ok(WireValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireValue, E> {
        i64::try_from(v)
            .map(WireValue::Int)
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WireValue, E> {
        Ok(WireValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<WireValue, E> {
        Ok(WireValue::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<WireValue, E> {
        Ok(WireValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<WireValue, E> {
        Ok(WireValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<WireValue, D::Error> {
        deserializer.deserialize_any(WireValueVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WireValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(WireValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<WireValue, A::Error> {
        let mut map = WireMap::new();
        while let Some((key, value)) = access.next_entry::<String, WireValue>()? {
            map.insert(key, value);
        }
        Ok(WireValue::Map(map))
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireValueVisitor)
    }
}

impl<'de> Deserialize<'de> for WireMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireValue::deserialize(deserializer)? {
            WireValue::Map(map) => Ok(map),
            other => Err(de::Error::custom(format!(
                "expected a map, got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_uniqueness() {
        let mut map = WireMap::new();
        map.insert("b", 1i64);
        map.insert("a", 2i64);
        map.insert("b", 3i64);

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&WireValue::Int(3)));
    }

    #[test]
    fn compact_drops_null_entries() {
        let map = wire_map! {
            "name" => "Example Inc.",
            "email" => WireValue::Null,
        };
        let compacted = map.compact();
        assert_eq!(compacted.len(), 1);
        assert!(!compacted.contains_key("email"));
    }

    #[test]
    fn get_attr_finds_prefixed_keys() {
        let map = wire_map! { "@entity_id" => "6" };
        assert_eq!(map.get_attr("entity_id").and_then(WireValue::as_i64), Some(6));
    }

    #[test]
    fn textual_scalars_coerce() {
        assert_eq!(WireValue::Text("42".into()).as_i64(), Some(42));
        assert_eq!(WireValue::Text("true".into()).as_bool(), Some(true));
        assert_eq!(WireValue::Text("0".into()).as_bool(), Some(false));
        assert_eq!(WireValue::Text("maybe".into()).as_bool(), None);
    }

    #[test]
    fn json_round_trip_preserves_shape() {
        let map = wire_map! {
            "company_name" => "Example Inc.",
            "supplier" => wire_map! { "default_credit_terms" => 30i64 },
        };
        let json = serde_json::to_string(&map).unwrap();
        let back: WireMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
