//! Item model: an invoice line / catalogue item.

use clearbooks_core::WireMap;
use serde::{Deserialize, Serialize};

use crate::base::{AttrReader, Model};
use crate::error::ModelResult;
use crate::resource::Resource;

/// A billable item.
///
/// Monetary amounts travel as wire text; this client does no arithmetic on
/// them. The wire field `type` maps to [`Item::kind`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub unit_price: Option<String>,
    pub quantity: Option<i64>,
    pub kind: Option<String>,
    pub vat: Option<String>,
    pub vat_rate: Option<String>,
    /// Wire fields this client does not know yet.
    #[serde(default, skip_serializing_if = "WireMap::is_empty")]
    pub extra: WireMap,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Item {
    const RESOURCE: Resource = Resource::Item;
    const NAME: &'static str = "Item";

    fn wire_attribute_keys() -> &'static [&'static str] {
        &["id", "unit_price", "quantity", "type", "vat", "vat_rate"]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn attribute_map(&self) -> WireMap {
        let mut map = WireMap::new();
        if let Some(id) = self.id {
            map.insert("id", id);
        }
        if let Some(description) = &self.description {
            map.insert("description", description.as_str());
        }
        if let Some(unit_price) = &self.unit_price {
            map.insert("unit_price", unit_price.as_str());
        }
        if let Some(quantity) = self.quantity {
            map.insert("quantity", quantity);
        }
        if let Some(kind) = &self.kind {
            map.insert("type", kind.as_str());
        }
        if let Some(vat) = &self.vat {
            map.insert("vat", vat.as_str());
        }
        if let Some(vat_rate) = &self.vat_rate {
            map.insert("vat_rate", vat_rate.as_str());
        }
        for (key, value) in self.extra.iter() {
            map.insert(key, value.clone());
        }
        map
    }

    fn from_attributes(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let item = Self::read(&mut reader)?;
        reader.expect_empty(Self::NAME)?;
        Ok(item)
    }

    fn from_decoded(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let mut item = Self::read(&mut reader)?;
        item.extra = reader.into_extra();
        Ok(item)
    }
}

impl Item {
    fn read(reader: &mut AttrReader) -> ModelResult<Self> {
        Ok(Self {
            id: reader.take_i64("id")?,
            description: reader.take_text("description")?,
            unit_price: reader.take_text("unit_price")?,
            quantity: reader.take_i64("quantity")?,
            kind: reader.take_text("type")?,
            vat: reader.take_text("vat")?,
            vat_rate: reader.take_text("vat_rate")?,
            extra: WireMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use clearbooks_core::wire_map;

    fn sample_item() -> Item {
        Item {
            description: Some("Consulting".into()),
            unit_price: Some("120.00".into()),
            quantity: Some(2),
            kind: Some("1001001".into()),
            vat: Some("0.00".into()),
            vat_rate: Some("0.2".into()),
            ..Item::default()
        }
    }

    #[test]
    fn kind_maps_to_wire_type_key() {
        let wire = sample_item().to_wire().unwrap();
        assert!(wire.contains_key("@type"));
        let back = Item::from_wire(&wire).unwrap();
        assert_eq!(back.kind.as_deref(), Some("1001001"));
    }

    #[test]
    fn wire_round_trip_reconstructs_the_item() {
        let item = sample_item();
        let back = Item::from_wire(&item.to_wire().unwrap()).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn from_attributes_rejects_unknown_names() {
        let err = Item::from_attributes(wire_map! { "colour" => "red" }).unwrap_err();
        assert_eq!(err, ModelError::unknown_attribute("Item", "colour"));
    }
}
