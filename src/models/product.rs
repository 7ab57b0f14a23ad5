//! Product model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{to_i32, ColumnSet, Columns, Resource};
use crate::validation::{FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError};

/// Catalog product, always filed under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create product request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewProduct {
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: i32,
}

/// Update product request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: i32,
}

impl Resource for Product {
    type Record = Product;
    type Create = NewProduct;
    type Patch = ProductPatch;

    const LABEL: &'static str = "Product";
    const PLURAL: &'static str = "Products";
    const TABLE: &'static str = "products";
    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("name", Kind::Text),
        FieldRule::required("price", Kind::Numeric { min: 0 }),
        FieldRule::required("category_id", Kind::Integer { min: 1 }),
    ]);
    const SEARCHABLE: &'static [&'static str] = &["name"];

    fn id(record: &Product) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewProduct {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.require_text("name")?,
            price: r.require_decimal("price")?,
            category_id: to_i32("category_id", r.require_integer("category_id")?)?,
        })
    }
}

impl TryFrom<NormalizedRecord> for ProductPatch {
    type Error = ValidationError;

    fn try_from(r: NormalizedRecord) -> Result<Self, Self::Error> {
        let NewProduct { name, price, category_id } = NewProduct::try_from(r)?;
        Ok(Self { name, price, category_id })
    }
}

impl Columns for NewProduct {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .decimal("price", Some(&self.price))
            .integer("category_id", Some(self.category_id.into()))
            .build()
    }
}

impl Columns for ProductPatch {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .decimal("price", Some(&self.price))
            .integer("category_id", Some(self.category_id.into()))
            .build()
    }
}
