//! Accessory model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{to_i32, AccessoryType, Choice, ColumnSet, Columns, ItemStatus, Resource};
use crate::validation::{
    Fallback, FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError,
};

/// Accessory stock line (cases, chargers, cables, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Accessory {
    pub id: i32,
    pub name: String,
    pub brand: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub accessory_type: AccessoryType,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub purchase_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub selling_price: Decimal,
    pub description: Option<String>,
    pub stock_count: i32,
    pub sold_count: i32,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create accessory request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAccessory {
    pub name: String,
    #[serde(rename = "type")]
    pub accessory_type: AccessoryType,
    #[schema(value_type = f64)]
    pub selling_price: Decimal,
    pub stock_count: i32,
    /// Defaults to IN_STOCK
    pub status: ItemStatus,
    pub brand: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub purchase_price: Option<Decimal>,
    pub description: Option<String>,
    /// Defaults to 0
    pub sold_count: i32,
}

/// Update accessory request; absent optional fields are left unchanged
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AccessoryPatch {
    pub name: String,
    #[serde(rename = "type")]
    pub accessory_type: AccessoryType,
    #[schema(value_type = f64)]
    pub selling_price: Decimal,
    pub stock_count: i32,
    pub status: Option<ItemStatus>,
    pub brand: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub purchase_price: Option<Decimal>,
    pub description: Option<String>,
    pub sold_count: Option<i32>,
}

impl Resource for Accessory {
    type Record = Accessory;
    type Create = NewAccessory;
    type Patch = AccessoryPatch;

    const LABEL: &'static str = "Accessory";
    const PLURAL: &'static str = "Accessories";
    const TABLE: &'static str = "accessories";
    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("name", Kind::Text),
        FieldRule::required("type", Kind::Choice(AccessoryType::NAMES)),
        FieldRule::required("selling_price", Kind::Numeric { min: 0 }),
        FieldRule::required("stock_count", Kind::Integer { min: 0 }),
        FieldRule::optional("status", Kind::Choice(ItemStatus::NAMES)).or(Fallback::Text("IN_STOCK")),
        FieldRule::optional("brand", Kind::Text),
        FieldRule::optional("purchase_price", Kind::Numeric { min: 0 }),
        FieldRule::optional("description", Kind::Text),
        FieldRule::optional("sold_count", Kind::Integer { min: 0 }).or(Fallback::Integer(0)),
    ]);
    const SEARCHABLE: &'static [&'static str] = &["name", "brand", "type", "description"];
    const UNIQUE: Option<&'static str> = Some("name");

    fn id(record: &Accessory) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewAccessory {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.require_text("name")?,
            accessory_type: r.require_choice("type")?,
            selling_price: r.require_decimal("selling_price")?,
            stock_count: to_i32("stock_count", r.require_integer("stock_count")?)?,
            status: r.take_choice("status").unwrap_or(ItemStatus::InStock),
            brand: r.take_text("brand"),
            purchase_price: r.take_decimal("purchase_price"),
            description: r.take_text("description"),
            sold_count: r
                .take_integer("sold_count")
                .map(|v| to_i32("sold_count", v))
                .transpose()?
                .unwrap_or(0),
        })
    }
}

impl TryFrom<NormalizedRecord> for AccessoryPatch {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.require_text("name")?,
            accessory_type: r.require_choice("type")?,
            selling_price: r.require_decimal("selling_price")?,
            stock_count: to_i32("stock_count", r.require_integer("stock_count")?)?,
            status: r.take_choice("status"),
            brand: r.take_text("brand"),
            purchase_price: r.take_decimal("purchase_price"),
            description: r.take_text("description"),
            sold_count: r
                .take_integer("sold_count")
                .map(|v| to_i32("sold_count", v))
                .transpose()?,
        })
    }
}

impl Columns for NewAccessory {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .choice("type", Some(&self.accessory_type))
            .decimal("selling_price", Some(&self.selling_price))
            .integer("stock_count", Some(self.stock_count.into()))
            .choice("status", Some(&self.status))
            .text("brand", self.brand.as_ref())
            .decimal("purchase_price", self.purchase_price.as_ref())
            .text("description", self.description.as_ref())
            .integer("sold_count", Some(self.sold_count.into()))
            .build()
    }
}

impl Columns for AccessoryPatch {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .choice("type", Some(&self.accessory_type))
            .decimal("selling_price", Some(&self.selling_price))
            .integer("stock_count", Some(self.stock_count.into()))
            .choice("status", self.status.as_ref())
            .text("brand", self.brand.as_ref())
            .decimal("purchase_price", self.purchase_price.as_ref())
            .text("description", self.description.as_ref())
            .integer("sold_count", self.sold_count.map(i64::from))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Mode, RawRecord};
    use serde_json::json;

    #[test]
    fn test_create_applies_defaults() {
        let raw = RawRecord::from_json(json!({
            "name": "Case A",
            "type": "CASE",
            "selling_price": 10,
            "stock_count": 5
        }));
        let record = Accessory::SCHEMA.validate(&raw, Mode::Create).unwrap();
        let accessory = NewAccessory::try_from(record).unwrap();

        assert_eq!(accessory.accessory_type, AccessoryType::Case);
        assert_eq!(accessory.status, ItemStatus::InStock);
        assert_eq!(accessory.sold_count, 0);
        assert_eq!(accessory.stock_count, 5);
    }

    #[test]
    fn test_zero_stock_count_is_present() {
        let raw = RawRecord::from_json(json!({
            "name": "Cable",
            "type": "CABLE",
            "selling_price": "2.5",
            "stock_count": 0
        }));
        assert!(Accessory::SCHEMA.validate(&raw, Mode::Create).is_ok());
    }

    #[test]
    fn test_patch_leaves_defaults_out() {
        let raw = RawRecord::from_json(json!({
            "name": "Case A",
            "type": "CASE",
            "selling_price": 12,
            "stock_count": 4
        }));
        let record = Accessory::SCHEMA.validate(&raw, Mode::Update).unwrap();
        let patch = AccessoryPatch::try_from(record).unwrap();

        assert_eq!(patch.status, None);
        assert_eq!(patch.sold_count, None);
        assert_eq!(patch.columns().len(), 4);
    }
}
