//! User (customer) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{AssetSlot, ColumnSet, Columns, Resource};
use crate::validation::{FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError};

/// Customer record
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// 64-bit phone number, rendered as a string
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    #[schema(value_type = String)]
    pub contact_number: i64,
    pub email: Option<String>,
    pub place: Option<String>,
    /// Public URL of the uploaded profile photo
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user request (multipart form)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    pub name: String,
    pub contact_number: i64,
    pub email: Option<String>,
    pub place: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_photo: Option<String>,
}

/// Update user request; absent optional fields are left unchanged
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserPatch {
    pub name: String,
    pub contact_number: i64,
    pub email: Option<String>,
    pub place: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_photo: Option<String>,
}

impl Resource for User {
    type Record = User;
    type Create = NewUser;
    type Patch = UserPatch;

    const LABEL: &'static str = "User";
    const PLURAL: &'static str = "Users";
    const TABLE: &'static str = "users";
    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("name", Kind::Text),
        FieldRule::required("contact_number", Kind::Integer { min: 0 }),
        FieldRule::optional("email", Kind::Text),
        FieldRule::optional("place", Kind::Text),
    ]);
    const SEARCHABLE: &'static [&'static str] = &["name", "email", "place", "contact_number"];
    const UNIQUE: Option<&'static str> = Some("contact_number");
    const ASSETS: Option<AssetSlot> = Some(AssetSlot {
        field: "profile_photo",
        max_files: 1,
        multiple: false,
    });

    fn id(record: &User) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewUser {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.require_text("name")?,
            contact_number: r.require_integer("contact_number")?,
            email: r.take_text("email"),
            place: r.take_text("place"),
            profile_photo: r.take_text("profile_photo"),
        })
    }
}

impl TryFrom<NormalizedRecord> for UserPatch {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.require_text("name")?,
            contact_number: r.require_integer("contact_number")?,
            email: r.take_text("email"),
            place: r.take_text("place"),
            profile_photo: r.take_text("profile_photo"),
        })
    }
}

impl Columns for NewUser {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .integer("contact_number", Some(self.contact_number))
            .text("email", self.email.as_ref())
            .text("place", self.place.as_ref())
            .text("profile_photo", self.profile_photo.as_ref())
            .build()
    }
}

impl Columns for UserPatch {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("name", Some(&self.name))
            .integer("contact_number", Some(self.contact_number))
            .text("email", self.email.as_ref())
            .text("place", self.place.as_ref())
            .text("profile_photo", self.profile_photo.as_ref())
            .build()
    }
}
