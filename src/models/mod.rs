//! Data models for the mobile shop
//!
//! Each resource module declares its stored record, its create and patch
//! payloads, and a [`Resource`] descriptor binding them to a table and a
//! validation [`Schema`].

pub mod accessory;
pub mod category;
pub mod enums;
pub mod mobile;
pub mod product;
pub mod service;
pub mod user;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

use crate::validation::{FieldValue, NormalizedRecord, Schema, ValidationError};

// Re-export commonly used types
pub use accessory::{Accessory, AccessoryPatch, NewAccessory};
pub use category::{Category, CategoryPatch, NewCategory};
pub use enums::{AccessoryType, Brand, Choice, ItemStatus, ServiceType};
pub use mobile::{Mobile, MobilePatch, NewMobile};
pub use product::{NewProduct, Product, ProductPatch};
pub use service::{NewService, Service, ServicePatch};
pub use user::{NewUser, User, UserPatch};

/// File field accepted by a resource's multipart form
#[derive(Debug, Clone, Copy)]
pub struct AssetSlot {
    /// Form field name, also the record field receiving the URL(s)
    pub field: &'static str,
    pub max_files: usize,
    /// Store a list of URLs rather than a single one
    pub multiple: bool,
}

/// Static description of one managed resource
pub trait Resource: Send + Sync + 'static {
    type Record: Serialize
        + DeserializeOwned
        + for<'r> FromRow<'r, PgRow>
        + Clone
        + Send
        + Sync
        + Unpin
        + 'static;
    type Create: TryFrom<NormalizedRecord, Error = ValidationError> + Columns + Send + Sync;
    type Patch: TryFrom<NormalizedRecord, Error = ValidationError> + Columns + Send + Sync;

    /// Singular name used in messages ("Mobile")
    const LABEL: &'static str;
    /// Plural name used in list messages ("Mobiles")
    const PLURAL: &'static str;
    const TABLE: &'static str;
    const SCHEMA: Schema;
    /// Columns matched by the free-text search
    const SEARCHABLE: &'static [&'static str];
    /// Column whose value must be unique across records
    const UNIQUE: Option<&'static str> = None;
    const ASSETS: Option<AssetSlot> = None;

    fn id(record: &Self::Record) -> i32;
}

/// Column/value pairs a payload writes
pub trait Columns {
    fn columns(&self) -> Vec<(&'static str, FieldValue)>;
}

/// Accumulates the set columns of a payload, skipping absent values
#[derive(Debug, Default)]
pub struct ColumnSet(Vec<(&'static str, FieldValue)>);

impl ColumnSet {
    pub fn text(mut self, name: &'static str, value: Option<&String>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Text(v.clone())));
        }
        self
    }

    pub fn choice<T: Choice>(mut self, name: &'static str, value: Option<&T>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Text(v.as_str().to_string())));
        }
        self
    }

    pub fn decimal(mut self, name: &'static str, value: Option<&Decimal>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Decimal(*v)));
        }
        self
    }

    pub fn integer(mut self, name: &'static str, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Integer(v)));
        }
        self
    }

    pub fn date(mut self, name: &'static str, value: Option<&DateTime<Utc>>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Date(*v)));
        }
        self
    }

    pub fn flag(mut self, name: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::Flag(v)));
        }
        self
    }

    pub fn list(mut self, name: &'static str, value: Option<&Vec<String>>) -> Self {
        if let Some(v) = value {
            self.0.push((name, FieldValue::List(v.clone())));
        }
        self
    }

    pub fn build(self) -> Vec<(&'static str, FieldValue)> {
        self.0
    }
}

/// Narrow a validated integer to an `i32` column
pub(crate) fn to_i32(field: &str, value: i64) -> Result<i32, ValidationError> {
    i32::try_from(value)
        .map_err(|_| ValidationError::invalid_value(field, format!("{} is out of range", field)))
}
