//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{ColumnSet, Columns, Resource};
use crate::validation::{FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError};

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCategory {
    pub name: String,
}

/// Update category request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryPatch {
    pub name: String,
}

impl Resource for Category {
    type Record = Category;
    type Create = NewCategory;
    type Patch = CategoryPatch;

    const LABEL: &'static str = "Category";
    const PLURAL: &'static str = "Categories";
    const TABLE: &'static str = "categories";
    const SCHEMA: Schema = Schema::new(&[FieldRule::required("name", Kind::Text)]);
    const SEARCHABLE: &'static [&'static str] = &["name"];
    const UNIQUE: Option<&'static str> = Some("name");

    fn id(record: &Category) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewCategory {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self { name: r.require_text("name")? })
    }
}

impl TryFrom<NormalizedRecord> for CategoryPatch {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self { name: r.require_text("name")? })
    }
}

impl Columns for NewCategory {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default().text("name", Some(&self.name)).build()
    }
}

impl Columns for CategoryPatch {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default().text("name", Some(&self.name)).build()
    }
}
