//! Mobile (handset inventory) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{to_i32, AssetSlot, Brand, Choice, ColumnSet, Columns, ItemStatus, Resource};
use crate::validation::{FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError};

/// Handset in stock or sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Mobile {
    pub id: i32,
    pub model_name: String,
    pub brand: Option<Brand>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub purchase_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub selling_price: Option<Decimal>,
    pub imei: Option<String>,
    pub country: Option<String>,
    pub color: Option<String>,
    pub variant: Option<String>,
    pub battery: Option<String>,
    pub notes: Option<String>,
    pub warranty: Option<String>,
    /// Uploaded photo URLs, in upload order
    pub photos: Option<Vec<String>>,
    pub status: Option<ItemStatus>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub selling_date: Option<DateTime<Utc>>,
    /// Owning customer, if any (not enforced)
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create mobile request (multipart form)
#[derive(Debug, Clone, ToSchema)]
pub struct NewMobile {
    pub model_name: String,
    #[schema(value_type = f64)]
    pub purchase_price: Decimal,
    pub brand: Option<Brand>,
    pub status: Option<ItemStatus>,
    #[schema(value_type = Option<f64>)]
    pub selling_price: Option<Decimal>,
    pub imei: Option<String>,
    pub country: Option<String>,
    pub color: Option<String>,
    pub variant: Option<String>,
    pub battery: Option<String>,
    pub notes: Option<String>,
    pub warranty: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub selling_date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    #[schema(value_type = Option<Vec<String>>, format = Binary)]
    pub photos: Option<Vec<String>>,
}

/// Update mobile request; absent optional fields are left unchanged
#[derive(Debug, Clone, ToSchema)]
pub struct MobilePatch {
    pub model_name: String,
    #[schema(value_type = f64)]
    pub purchase_price: Decimal,
    pub brand: Option<Brand>,
    pub status: Option<ItemStatus>,
    #[schema(value_type = Option<f64>)]
    pub selling_price: Option<Decimal>,
    pub imei: Option<String>,
    pub country: Option<String>,
    pub color: Option<String>,
    pub variant: Option<String>,
    pub battery: Option<String>,
    pub notes: Option<String>,
    pub warranty: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub selling_date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    #[schema(value_type = Option<Vec<String>>, format = Binary)]
    pub photos: Option<Vec<String>>,
}

impl Resource for Mobile {
    type Record = Mobile;
    type Create = NewMobile;
    type Patch = MobilePatch;

    const LABEL: &'static str = "Mobile";
    const PLURAL: &'static str = "Mobiles";
    const TABLE: &'static str = "mobiles";
    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("model_name", Kind::Text),
        FieldRule::required("purchase_price", Kind::Numeric { min: 0 }),
        FieldRule::optional("brand", Kind::Choice(Brand::NAMES)),
        FieldRule::optional("status", Kind::Choice(ItemStatus::NAMES)),
        FieldRule::optional("selling_price", Kind::Numeric { min: 0 }),
        FieldRule::optional("imei", Kind::Text),
        FieldRule::optional("country", Kind::Text),
        FieldRule::optional("color", Kind::Text),
        FieldRule::optional("variant", Kind::Text),
        FieldRule::optional("battery", Kind::Text),
        FieldRule::optional("notes", Kind::Text),
        FieldRule::optional("warranty", Kind::Text),
        FieldRule::optional("purchase_date", Kind::Date),
        FieldRule::optional("selling_date", Kind::Date),
        FieldRule::optional("user_id", Kind::Integer { min: 1 }),
    ]);
    const SEARCHABLE: &'static [&'static str] =
        &["model_name", "imei", "country", "color", "variant", "brand"];
    const ASSETS: Option<AssetSlot> = Some(AssetSlot {
        field: "photos",
        max_files: 10,
        multiple: true,
    });

    fn id(record: &Mobile) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewMobile {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            model_name: r.require_text("model_name")?,
            purchase_price: r.require_decimal("purchase_price")?,
            brand: r.take_choice("brand"),
            status: r.take_choice("status"),
            selling_price: r.take_decimal("selling_price"),
            imei: r.take_text("imei"),
            country: r.take_text("country"),
            color: r.take_text("color"),
            variant: r.take_text("variant"),
            battery: r.take_text("battery"),
            notes: r.take_text("notes"),
            warranty: r.take_text("warranty"),
            purchase_date: r.take_date("purchase_date"),
            selling_date: r.take_date("selling_date"),
            user_id: r.take_integer("user_id").map(|v| to_i32("user_id", v)).transpose()?,
            photos: r.take_list("photos"),
        })
    }
}

impl TryFrom<NormalizedRecord> for MobilePatch {
    type Error = ValidationError;

    fn try_from(r: NormalizedRecord) -> Result<Self, Self::Error> {
        let full = NewMobile::try_from(r)?;
        Ok(Self {
            model_name: full.model_name,
            purchase_price: full.purchase_price,
            brand: full.brand,
            status: full.status,
            selling_price: full.selling_price,
            imei: full.imei,
            country: full.country,
            color: full.color,
            variant: full.variant,
            battery: full.battery,
            notes: full.notes,
            warranty: full.warranty,
            purchase_date: full.purchase_date,
            selling_date: full.selling_date,
            user_id: full.user_id,
            photos: full.photos,
        })
    }
}

macro_rules! mobile_columns {
    ($ty:ty) => {
        impl Columns for $ty {
            fn columns(&self) -> Vec<(&'static str, FieldValue)> {
                ColumnSet::default()
                    .text("model_name", Some(&self.model_name))
                    .decimal("purchase_price", Some(&self.purchase_price))
                    .choice("brand", self.brand.as_ref())
                    .choice("status", self.status.as_ref())
                    .decimal("selling_price", self.selling_price.as_ref())
                    .text("imei", self.imei.as_ref())
                    .text("country", self.country.as_ref())
                    .text("color", self.color.as_ref())
                    .text("variant", self.variant.as_ref())
                    .text("battery", self.battery.as_ref())
                    .text("notes", self.notes.as_ref())
                    .text("warranty", self.warranty.as_ref())
                    .date("purchase_date", self.purchase_date.as_ref())
                    .date("selling_date", self.selling_date.as_ref())
                    .integer("user_id", self.user_id.map(i64::from))
                    .list("photos", self.photos.as_ref())
                    .build()
            }
        }
    };
}

mobile_columns!(NewMobile);
mobile_columns!(MobilePatch);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Mode, RawRecord};
    use serde_json::json;

    #[test]
    fn test_form_fields_convert_to_new_mobile() {
        let mut raw = RawRecord::default();
        raw.insert_text("model_name", "Galaxy S21");
        raw.insert_text("purchase_price", "420.50");
        raw.insert_text("brand", "SAMSUNG");
        raw.insert_text("purchase_date", "2024-05-02");
        raw.insert_text("user_id", "7");

        let record = Mobile::SCHEMA.validate(&raw, Mode::Create).unwrap();
        let mobile = NewMobile::try_from(record).unwrap();

        assert_eq!(mobile.model_name, "Galaxy S21");
        assert_eq!(mobile.purchase_price, Decimal::new(42050, 2));
        assert_eq!(mobile.brand, Some(Brand::Samsung));
        assert_eq!(mobile.status, None);
        assert_eq!(mobile.user_id, Some(7));
        assert!(mobile.purchase_date.is_some());
    }

    #[test]
    fn test_patch_columns_only_carry_present_fields() {
        let raw = RawRecord::from_json(json!({"model_name": "Pixel 8", "purchase_price": 300}));
        let record = Mobile::SCHEMA.validate(&raw, Mode::Update).unwrap();
        let patch = MobilePatch::try_from(record).unwrap();

        let names: Vec<_> = patch.columns().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["model_name", "purchase_price"]);
    }

    #[test]
    fn test_prices_serialize_as_numbers() {
        let mobile: Mobile = serde_json::from_value(json!({
            "id": 1,
            "model_name": "iPhone 13",
            "brand": "APPLE",
            "purchase_price": 500.25,
            "selling_price": null,
            "imei": null, "country": null, "color": null, "variant": null,
            "battery": null, "notes": null, "warranty": null,
            "photos": ["https://img/1.jpg"],
            "status": "IN_STOCK",
            "purchase_date": null, "selling_date": null, "user_id": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let value = serde_json::to_value(&mobile).unwrap();
        assert_eq!(value["purchase_price"], json!(500.25));
        assert_eq!(value["selling_price"], json!(null));
        assert_eq!(value["brand"], json!("APPLE"));
    }
}
