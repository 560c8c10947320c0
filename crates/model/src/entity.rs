//! Entity model: a customer, a supplier, or both.

use clearbooks_core::{WireMap, WireValue};
use serde::{Deserialize, Serialize};

use crate::base::{AttrReader, Model};
use crate::error::ModelResult;
use crate::resource::Resource;

/// Relation block attached to an entity acting as supplier or customer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityRelation {
    pub default_account_code: Option<String>,
    pub default_vat_rate: Option<String>,
    pub default_credit_terms: Option<i64>,
    /// Wire fields this client does not know yet.
    #[serde(default, skip_serializing_if = "WireMap::is_empty")]
    pub extra: WireMap,
}

impl EntityRelation {
    pub(crate) fn attribute_map(&self) -> WireMap {
        let mut map = WireMap::new();
        if let Some(code) = &self.default_account_code {
            map.insert("default_account_code", code.as_str());
        }
        if let Some(rate) = &self.default_vat_rate {
            map.insert("default_vat_rate", rate.as_str());
        }
        if let Some(terms) = self.default_credit_terms {
            map.insert("default_credit_terms", terms);
        }
        for (key, value) in self.extra.iter() {
            map.insert(key, value.clone());
        }
        map
    }

    pub(crate) fn from_attributes(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let relation = Self::read(&mut reader)?;
        reader.expect_empty("EntityRelation")?;
        Ok(relation)
    }

    pub(crate) fn from_decoded(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let mut relation = Self::read(&mut reader)?;
        relation.extra = reader.into_extra();
        Ok(relation)
    }

    fn read(reader: &mut AttrReader) -> ModelResult<Self> {
        Ok(Self {
            default_account_code: reader.take_text("default_account_code")?,
            default_vat_rate: reader.take_text("default_vat_rate")?,
            default_credit_terms: reader.take_i64("default_credit_terms")?,
            extra: WireMap::new(),
        })
    }
}

/// A party the books transact with.
///
/// All fields are optional at construction; the service decides which are
/// required for which operation. `id` is assigned by a successful create.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub id: Option<i64>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub building: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    pub email: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub external_id: Option<String>,
    pub statement_url: Option<String>,
    pub supplier: Option<EntityRelation>,
    pub customer: Option<EntityRelation>,
    /// Wire fields this client does not know yet.
    #[serde(default, skip_serializing_if = "WireMap::is_empty")]
    pub extra: WireMap,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Entity {
    const RESOURCE: Resource = Resource::Entity;
    const NAME: &'static str = "Entity";

    fn wire_attribute_keys() -> &'static [&'static str] {
        &[
            "id",
            "default_account_code",
            "default_vat_rate",
            "default_credit_terms",
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
        let text_fields: [(&str, &Option<String>); 16] = [
            ("company_name", &self.company_name),
            ("contact_name", &self.contact_name),
            ("building", &self.building),
            ("address1", &self.address1),
            ("address2", &self.address2),
            ("town", &self.town),
            ("county", &self.county),
            ("country", &self.country),
            ("postcode", &self.postcode),
            ("email", &self.email),
            ("phone1", &self.phone1),
            ("phone2", &self.phone2),
            ("fax", &self.fax),
            ("website", &self.website),
            ("external_id", &self.external_id),
            ("statement_url", &self.statement_url),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                map.insert(key, value.as_str());
            }
        }
        if let Some(supplier) = &self.supplier {
            map.insert("supplier", WireValue::Map(supplier.attribute_map()));
        }
        if let Some(customer) = &self.customer {
            map.insert("customer", WireValue::Map(customer.attribute_map()));
        }
        for (key, value) in self.extra.iter() {
            map.insert(key, value.clone());
        }
        map
    }

    fn from_attributes(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let entity = Self::read(&mut reader, EntityRelation::from_attributes)?;
        reader.expect_empty(Self::NAME)?;
        Ok(entity)
    }

    fn from_decoded(map: WireMap) -> ModelResult<Self> {
        let mut reader = AttrReader::new(map);
        let mut entity = Self::read(&mut reader, EntityRelation::from_decoded)?;
        entity.extra = reader.into_extra();
        Ok(entity)
    }
}

impl Entity {
    fn read(
        reader: &mut AttrReader,
        relation: fn(WireMap) -> ModelResult<EntityRelation>,
    ) -> ModelResult<Self> {
        Ok(Self {
            id: reader.take_i64("id")?,
            company_name: reader.take_text("company_name")?,
            contact_name: reader.take_text("contact_name")?,
            building: reader.take_text("building")?,
            address1: reader.take_text("address1")?,
            address2: reader.take_text("address2")?,
            town: reader.take_text("town")?,
            county: reader.take_text("county")?,
            country: reader.take_text("country")?,
            postcode: reader.take_text("postcode")?,
            email: reader.take_text("email")?,
            phone1: reader.take_text("phone1")?,
            phone2: reader.take_text("phone2")?,
            fax: reader.take_text("fax")?,
            website: reader.take_text("website")?,
            external_id: reader.take_text("external_id")?,
            statement_url: reader.take_text("statement_url")?,
            supplier: reader.take_map("supplier")?.map(relation).transpose()?,
            customer: reader.take_map("customer")?.map(relation).transpose()?,
            extra: WireMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use clearbooks_core::wire_map;

    fn sample_entity() -> Entity {
        Entity {
            company_name: Some("Example Inc.".into()),
            contact_name: Some("John Doe".into()),
            address1: Some("London".into()),
            country: Some("UK".into()),
            postcode: Some("01100".into()),
            email: Some("info@example.com".into()),
            website: Some("http://example.com".into()),
            phone1: Some("01234 567890".into()),
            supplier: Some(EntityRelation {
                default_account_code: Some("1001001".into()),
                default_credit_terms: Some(30),
                default_vat_rate: Some("0".into()),
                ..EntityRelation::default()
            }),
            ..Entity::default()
        }
    }

    #[test]
    fn from_attributes_accepts_legal_names() {
        let entity = Entity::from_attributes(wire_map! {
            "company_name" => "Example Inc.",
            "supplier" => wire_map! { "default_credit_terms" => 30i64 },
        })
        .unwrap();
        assert_eq!(entity.company_name.as_deref(), Some("Example Inc."));
        assert_eq!(
            entity.supplier.unwrap().default_credit_terms,
            Some(30)
        );
    }

    #[test]
    fn from_attributes_rejects_unknown_names() {
        let err = Entity::from_attributes(wire_map! {
            "company_name" => "Example Inc.",
            "shoe_size" => 43i64,
        })
        .unwrap_err();
        assert_eq!(err, ModelError::unknown_attribute("Entity", "shoe_size"));
    }

    #[test]
    fn unset_fields_stay_absent_on_the_wire() {
        let wire = sample_entity().to_wire().unwrap();
        assert!(!wire.contains_key("fax"));
        assert!(!wire.contains_key("customer"));
    }

    #[test]
    fn wire_round_trip_reconstructs_the_entity() {
        let entity = sample_entity();
        let back = Entity::from_wire(&entity.to_wire().unwrap()).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn from_wire_preserves_unknown_fields_as_extra() {
        let wire = wire_map! {
            "@id" => "6",
            "company_name" => "Example Inc.",
            "vat_registration_number" => "GB123456789",
        };
        let entity = Entity::from_wire(&wire).unwrap();
        assert_eq!(entity.id, Some(6));
        assert_eq!(
            entity.extra.get("vat_registration_number").and_then(|v| v.as_str()),
            Some("GB123456789")
        );
        // And the extension field survives re-encoding.
        let out = entity.to_wire().unwrap();
        assert!(out.contains_key("vat_registration_number"));
    }

    #[test]
    fn same_record_compares_ids_when_present() {
        let mut a = sample_entity();
        let mut b = Entity::new();
        a.assign_id(6);
        b.assign_id(6);
        assert!(a.same_record(&b));

        let c = sample_entity();
        let d = sample_entity();
        assert!(c.same_record(&d));
        assert!(!c.same_record(&Entity::new()));
    }
}
