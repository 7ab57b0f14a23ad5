//! Service (repair job) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{to_i32, Choice, ColumnSet, Columns, Resource, ServiceType};
use crate::validation::{
    Fallback, FieldRule, FieldValue, Kind, NormalizedRecord, Schema, ValidationError,
};

/// Repair job booked for a handset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: i32,
    pub model: String,
    pub imei: Option<String>,
    pub service_type: Option<ServiceType>,
    /// Free-form cost note
    pub service_cost: Option<String>,
    /// Free-form charge note
    pub service_charge: Option<String>,
    pub completed: bool,
    pub date: Option<DateTime<Utc>>,
    pub warranty: Option<String>,
    /// Customer the job belongs to, if any (not enforced)
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create service request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewService {
    pub model: String,
    pub service_type: Option<ServiceType>,
    pub date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub imei: Option<String>,
    pub service_cost: Option<String>,
    pub service_charge: Option<String>,
    pub warranty: Option<String>,
    /// Defaults to false
    pub completed: bool,
}

/// Update service request; absent optional fields are left unchanged
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ServicePatch {
    pub model: String,
    pub service_type: Option<ServiceType>,
    pub date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub imei: Option<String>,
    pub service_cost: Option<String>,
    pub service_charge: Option<String>,
    pub warranty: Option<String>,
    pub completed: Option<bool>,
}

impl Resource for Service {
    type Record = Service;
    type Create = NewService;
    type Patch = ServicePatch;

    const LABEL: &'static str = "Service";
    const PLURAL: &'static str = "Services";
    const TABLE: &'static str = "services";
    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("model", Kind::Text),
        FieldRule::optional("service_type", Kind::Choice(ServiceType::NAMES)),
        FieldRule::optional("date", Kind::Date),
        FieldRule::optional("user_id", Kind::Integer { min: 1 }),
        FieldRule::optional("imei", Kind::Text),
        FieldRule::optional("service_cost", Kind::Text),
        FieldRule::optional("service_charge", Kind::Text),
        FieldRule::optional("warranty", Kind::Text),
        FieldRule::optional("completed", Kind::Flag).or(Fallback::Flag(false)),
    ]);
    const SEARCHABLE: &'static [&'static str] = &[
        "model",
        "imei",
        "service_type",
        "service_cost",
        "service_charge",
        "warranty",
    ];

    fn id(record: &Service) -> i32 {
        record.id
    }
}

impl TryFrom<NormalizedRecord> for NewService {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            model: r.require_text("model")?,
            service_type: r.take_choice("service_type"),
            date: r.take_date("date"),
            user_id: r.take_integer("user_id").map(|v| to_i32("user_id", v)).transpose()?,
            imei: r.take_text("imei"),
            service_cost: r.take_text("service_cost"),
            service_charge: r.take_text("service_charge"),
            warranty: r.take_text("warranty"),
            completed: r.take_flag("completed").unwrap_or(false),
        })
    }
}

impl TryFrom<NormalizedRecord> for ServicePatch {
    type Error = ValidationError;

    fn try_from(mut r: NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            model: r.require_text("model")?,
            service_type: r.take_choice("service_type"),
            date: r.take_date("date"),
            user_id: r.take_integer("user_id").map(|v| to_i32("user_id", v)).transpose()?,
            imei: r.take_text("imei"),
            service_cost: r.take_text("service_cost"),
            service_charge: r.take_text("service_charge"),
            warranty: r.take_text("warranty"),
            completed: r.take_flag("completed"),
        })
    }
}

impl Columns for NewService {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("model", Some(&self.model))
            .choice("service_type", self.service_type.as_ref())
            .date("date", self.date.as_ref())
            .integer("user_id", self.user_id.map(i64::from))
            .text("imei", self.imei.as_ref())
            .text("service_cost", self.service_cost.as_ref())
            .text("service_charge", self.service_charge.as_ref())
            .text("warranty", self.warranty.as_ref())
            .flag("completed", Some(self.completed))
            .build()
    }
}

impl Columns for ServicePatch {
    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        ColumnSet::default()
            .text("model", Some(&self.model))
            .choice("service_type", self.service_type.as_ref())
            .date("date", self.date.as_ref())
            .integer("user_id", self.user_id.map(i64::from))
            .text("imei", self.imei.as_ref())
            .text("service_cost", self.service_cost.as_ref())
            .text("service_charge", self.service_charge.as_ref())
            .text("warranty", self.warranty.as_ref())
            .flag("completed", self.completed)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Mode, RawRecord};
    use serde_json::json;

    #[test]
    fn test_cost_fields_stay_free_text() {
        let raw = RawRecord::from_json(json!({
            "model": "Redmi Note 9",
            "service_cost": "approx 40",
            "service_charge": 55
        }));
        let record = Service::SCHEMA.validate(&raw, Mode::Create).unwrap();
        let service = NewService::try_from(record).unwrap();

        assert_eq!(service.service_cost.as_deref(), Some("approx 40"));
        assert_eq!(service.service_charge.as_deref(), Some("55"));
        assert!(!service.completed);
    }

    #[test]
    fn test_invalid_user_id_is_rejected() {
        let raw = RawRecord::from_json(json!({"model": "X", "user_id": "abc"}));
        let err = Service::SCHEMA.validate(&raw, Mode::Create).unwrap_err();
        assert_eq!(err.code(), "InvalidFormat");
        assert_eq!(err.field(), "user_id");
    }
}
