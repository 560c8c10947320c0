//! Invoice model.

use chrono::NaiveDate;
use clearbooks_core::{WireMap, WireValue};
use serde::{Deserialize, Serialize};

use crate::base::{collection_records, AttrReader, Model};
use crate::error::ModelResult;
use crate::item::Item;
use crate::resource::Resource;

/// A sales or purchase invoice with its line items.
///
/// The wire field `type` maps to [`Invoice::kind`]. Line items are nested on
/// the wire as `items { item: [...] }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Option<i64>,
    pub date_created: Option<NaiveDate>,
    pub date_due: Option<NaiveDate>,
    pub date_accrual: Option<NaiveDate>,
    pub credit_terms: Option<i64>,
    pub entity_id: Option<i64>,
    pub reference: Option<String>,
    pub project: Option<i64>,
    pub status: Option<String>,
    pub invoice_prefix: Option<String>,
    pub invoice_number: Option<String>,
    pub external_id: Option<String>,
    pub kind: Option<String>,
    pub items: Vec<Item>,
    /// Wire fields this client does not know yet.
    #[serde(default, skip_serializing_if = "WireMap::is_empty")]
    pub extra: WireMap,
}

impl Invoice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Invoice {
    const RESOURCE: Resource = Resource::Invoice;
    const NAME: &'static str = "Invoice";

    fn wire_attribute_keys() -> &'static [&'static str] {
        &[
            "id",
            "entity_id",
            "date_created",
            "date_due",
            "date_accrual",
            "credit_terms",
            "invoice_prefix",
            "invoice_number",
            "status",
            "external_id",
            "unit_price",
            "quantity",
            "type",
            "vat",
            "vat_rate",
        ]
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
        let date_fields: [(&str, Option<NaiveDate>); 3] = [
            ("date_created", self.date_created),
            ("date_due", self.date_due),
            ("date_accrual", self.date_accrual),
        ];
        for (key, value) in date_fields {
            if let Some(date) = value {
                map.insert(key, date.format("%Y-%m-%d").to_string());
            }
        }
        if let Some(credit_terms) = self.credit_terms {
            map.insert("credit_terms", credit_terms);
        }
        if let Some(entity_id) = self.entity_id {
            map.insert("entity_id", entity_id);
        }
        if let Some(reference) = &self.reference {
            map.insert("reference", reference.as_str());
        }
        if let Some(project) = self.project {
            map.insert("project", project);
        }
        if let Some(status) = &self.status {
            map.insert("status", status.as_str());
        }
        if let Some(prefix) = &self.invoice_prefix {
            map.insert("invoice_prefix", prefix.as_str());
        }
        if let Some(number) = &self.invoice_number {
            map.insert("invoice_number", number.as_str());
        }
        if let Some(external_id) = &self.external_id {
            map.insert("external_id", external_id.as_str());
        }
        if let Some(kind) = &self.kind {
            map.insert("type", kind.as_str());
        }
        if !self.items.is_empty() {
            let records: Vec<WireValue> = self
                .items
                .iter()
                .map(|item| WireValue::Map(item.attribute_map()))
                .collect();
            let mut wrapper = WireMap::new();
            wrapper.insert("item", records);
            map.insert("items", wrapper);
        }
        for (key, value) in self.extra.iter() {
            map.insert(key, value.clone());
        }
        map
    }

    fn from_attributes(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let invoice = Self::read(&mut reader, Item::from_attributes)?;
        reader.expect_empty(Self::NAME)?;
        Ok(invoice)
    }

    fn from_decoded(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let mut invoice = Self::read(&mut reader, Item::from_decoded)?;
        invoice.extra = reader.into_extra();
        Ok(invoice)
    }
}

impl Invoice {
    fn read(
        reader: &mut AttrReader,
        item_ctor: fn(WireMap) -> ModelResult<Item>,
    ) -> ModelResult<Self> {
        let items = match reader.take_map("items")? {
            None => Vec::new(),
            Some(mut wrapper) => match wrapper.remove("item") {
                None => Vec::new(),
                Some(value) => collection_records(&value)?
                    .into_iter()
                    .map(|record| item_ctor(record.clone()))
                    .collect::<ModelResult<_>>()?,
            },
        };
        Ok(Self {
            id: reader.take_i64("id")?,
            date_created: reader.take_date("date_created")?,
            date_due: reader.take_date("date_due")?,
            date_accrual: reader.take_date("date_accrual")?,
            credit_terms: reader.take_i64("credit_terms")?,
            entity_id: reader.take_i64("entity_id")?,
            reference: reader.take_text("reference")?,
            project: reader.take_i64("project")?,
            status: reader.take_text("status")?,
            invoice_prefix: reader.take_text("invoice_prefix")?,
            invoice_number: reader.take_text("invoice_number")?,
            external_id: reader.take_text("external_id")?,
            kind: reader.take_text("type")?,
            items,
            extra: WireMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearbooks_core::wire_map;

    fn sample_invoice() -> Invoice {
        Invoice {
            date_created: NaiveDate::from_ymd_opt(2015, 5, 6),
            date_due: NaiveDate::from_ymd_opt(2015, 6, 5),
            credit_terms: Some(30),
            entity_id: Some(6),
            reference: Some("REF-001".into()),
            kind: Some("purchases".into()),
            items: vec![Item {
                description: Some("Consulting".into()),
                unit_price: Some("120.00".into()),
                quantity: Some(2),
                kind: Some("1001001".into()),
                vat: Some("0.00".into()),
                vat_rate: Some("0.2".into()),
                ..Item::default()
            }],
            ..Invoice::default()
        }
    }

    #[test]
    fn items_nest_under_the_item_wrapper() {
        let wire = sample_invoice().to_wire().unwrap();
        let items = wire.get("items").and_then(WireValue::as_map).unwrap();
        let records = items.get("item").and_then(WireValue::as_list).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn wire_round_trip_reconstructs_the_invoice() {
        let invoice = sample_invoice();
        let back = Invoice::from_wire(&invoice.to_wire().unwrap()).unwrap();
        assert_eq!(back, invoice);
    }

    #[test]
    fn single_item_collection_collapse_is_tolerated() {
        // SOAP decoding hands back a bare map when a collection has one element.
        let wire = wire_map! {
            "@entity_id" => "6",
            "items" => wire_map! {
                "item" => wire_map! { "description" => "Consulting" },
            },
        };
        let invoice = Invoice::from_wire(&wire).unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].description.as_deref(), Some("Consulting"));
    }

    #[test]
    fn date_fields_accept_a_trailing_time_part() {
        let wire = wire_map! {
            "@date_created" => "2015-05-06 00:00:00",
        };
        let invoice = Invoice::from_wire(&wire).unwrap();
        assert_eq!(invoice.date_created, NaiveDate::from_ymd_opt(2015, 5, 6));
    }

    #[test]
    fn empty_items_stay_off_the_wire() {
        let wire = Invoice::new().to_wire().unwrap();
        assert!(!wire.contains_key("items"));
    }
}
