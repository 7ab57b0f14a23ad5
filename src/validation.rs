//! Schema-driven request validation
//!
//! Every resource declares its fields once as a [`Schema`]. The same pipeline
//! turns raw request input (a JSON body or multipart text parts) into a
//! [`NormalizedRecord`], or into the first [`ValidationError`] met while
//! walking the schema in declaration order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// A request payload that failed its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} has an invalid format: '{value}'")]
    InvalidFormat { field: String, value: String },

    #[error("{message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid {field} format '{value}'. Use YYYY-MM-DD")]
    InvalidDate { field: String, value: String },
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField { field: field.to_string() }
    }

    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::InvalidDate { field, .. } => field,
        }
    }

    /// Stable error code exposed to API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MissingField",
            Self::InvalidFormat { .. } => "InvalidFormat",
            Self::InvalidValue { .. } => "InvalidValue",
            Self::InvalidDate { .. } => "InvalidDate",
        }
    }
}

/// How a field's raw value is coerced and checked
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// Free text, kept as given (surrounding whitespace trimmed)
    Text,
    /// One of a closed set of names
    Choice(&'static [&'static str]),
    /// Decimal number, at least `min`
    Numeric { min: i64 },
    /// Whole number, at least `min`
    Integer { min: i64 },
    /// Calendar date or timestamp
    Date,
    /// Boolean
    Flag,
}

/// Value written for an absent optional field on create
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    Integer(i64),
    Text(&'static str),
    Flag(bool),
}

impl Fallback {
    fn to_value(self) -> FieldValue {
        match self {
            Fallback::Integer(v) => FieldValue::Integer(v),
            Fallback::Text(v) => FieldValue::Text(v.to_string()),
            Fallback::Flag(v) => FieldValue::Flag(v),
        }
    }
}

/// One entry of a [`Schema`]
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    pub fallback: Option<Fallback>,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: true, fallback: None }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: false, fallback: None }
    }

    /// Value to store when the field is absent on create
    pub const fn or(self, fallback: Fallback) -> Self {
        Self { fallback: Some(fallback), ..self }
    }
}

/// Whether the payload creates a record or patches an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Ordered field declarations for one resource
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub const fn new(fields: &'static [FieldRule]) -> Self {
        Self { fields }
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Validate `raw` field by field, stopping at the first violation.
    ///
    /// Required fields must be present in both modes. Absent optional fields
    /// take their fallback on create and are left out entirely on update, so
    /// the resulting record only carries what should be written.
    pub fn validate(&self, raw: &RawRecord, mode: Mode) -> Result<NormalizedRecord, ValidationError> {
        let mut record = NormalizedRecord::default();

        for rule in self.fields {
            let Some(value) = raw.present(rule.name) else {
                if rule.required {
                    return Err(ValidationError::missing(rule.name));
                }
                if mode == Mode::Create {
                    if let Some(fallback) = rule.fallback {
                        record.insert(rule.name, fallback.to_value());
                    }
                }
                continue;
            };

            record.insert(rule.name, coerce(rule, value)?);
        }

        Ok(record)
    }
}

fn coerce(rule: &FieldRule, value: &Value) -> Result<FieldValue, ValidationError> {
    let field = rule.name;
    match rule.kind {
        Kind::Text => text_of(field, value).map(FieldValue::Text),
        Kind::Choice(allowed) => {
            let text = text_of(field, value)?;
            if allowed.contains(&text.as_str()) {
                Ok(FieldValue::Text(text))
            } else {
                Err(ValidationError::invalid_value(
                    field,
                    format!("Invalid {} value '{}'. Must be one of {}", field, text, allowed.join(", ")),
                ))
            }
        }
        Kind::Numeric { min } => {
            let number = decimal_of(field, value)?;
            if number < Decimal::from(min) {
                return Err(ValidationError::invalid_value(field, bound_message(field, min)));
            }
            Ok(FieldValue::Decimal(number))
        }
        Kind::Integer { min } => {
            let number = integer_of(field, value)?;
            if number < min {
                return Err(ValidationError::invalid_value(field, bound_message(field, min)));
            }
            Ok(FieldValue::Integer(number))
        }
        Kind::Date => date_of(field, value).map(FieldValue::Date),
        Kind::Flag => flag_of(field, value).map(FieldValue::Flag),
    }
}

fn bound_message(field: &str, min: i64) -> String {
    if min == 0 {
        format!("{} must be a non-negative number", field)
    } else {
        format!("{} must be at least {}", field, min)
    }
}

fn invalid_format(field: &str, value: &Value) -> ValidationError {
    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ValidationError::InvalidFormat {
        field: field.to_string(),
        value: shown,
    }
}

fn text_of(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(invalid_format(field, other)),
    }
}

fn decimal_of(field: &str, value: &Value) -> Result<Decimal, ValidationError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(invalid_format(field, other)),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid_format(field, value))
}

fn integer_of(field: &str, value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid_format(field, value)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid_format(field, value)),
        other => Err(invalid_format(field, other)),
    }
}

fn flag_of(field: &str, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid_format(field, value)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(invalid_format(field, value)),
        },
        other => Err(invalid_format(field, other)),
    }
}

/// Parse a calendar date (`YYYY-MM-DD`) or a full timestamp into UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn date_of(field: &str, value: &Value) -> Result<DateTime<Utc>, ValidationError> {
    let text = match value {
        Value::String(s) => s.as_str(),
        _ => "",
    };
    parse_date(text).ok_or_else(|| ValidationError::InvalidDate {
        field: field.to_string(),
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Untyped request fields, in the order they arrived
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    fields: IndexMap<String, Value>,
}

impl RawRecord {
    /// Take the top-level members of a JSON object; anything else yields an
    /// empty record, which then fails on its first required field.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Object(map) => Self {
                fields: map.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.fields.insert(name.into(), Value::String(text.into()));
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// The field's value unless it is missing, null or blank text
    fn present(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            value => Some(value),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized output
// ---------------------------------------------------------------------------

/// A coerced field value ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(Decimal),
    Integer(i64),
    Date(DateTime<Utc>),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// Plain-text rendering used for comparisons and substring search
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Date(d) => d.to_rfc3339(),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::List(items) => items.join(","),
        }
    }

    /// JSON rendering, matching how records serialise the same column
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Decimal(d) => d
                .normalize()
                .to_string()
                .parse::<serde_json::Number>()
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Date(d) => Value::String(d.to_rfc3339()),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::List(items) => Value::from(items.clone()),
        }
    }
}

/// Validated fields keyed by schema name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    fields: IndexMap<&'static str, FieldValue>,
}

impl NormalizedRecord {
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.fields.shift_remove(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn take_decimal(&mut self, name: &str) -> Option<Decimal> {
        match self.fields.shift_remove(name)? {
            FieldValue::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn take_integer(&mut self, name: &str) -> Option<i64> {
        match self.fields.shift_remove(name)? {
            FieldValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn take_date(&mut self, name: &str) -> Option<DateTime<Utc>> {
        match self.fields.shift_remove(name)? {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn take_flag(&mut self, name: &str) -> Option<bool> {
        match self.fields.shift_remove(name)? {
            FieldValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    pub fn take_list(&mut self, name: &str) -> Option<Vec<String>> {
        match self.fields.shift_remove(name)? {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(s) => Some(vec![s]),
            _ => None,
        }
    }

    /// Parse a choice field into its enum. Names were checked against the
    /// same set during validation.
    pub fn take_choice<T: FromStr>(&mut self, name: &str) -> Option<T> {
        self.take_text(name).and_then(|s| s.parse().ok())
    }

    pub fn require_text(&mut self, name: &str) -> Result<String, ValidationError> {
        self.take_text(name).ok_or_else(|| ValidationError::missing(name))
    }

    pub fn require_decimal(&mut self, name: &str) -> Result<Decimal, ValidationError> {
        self.take_decimal(name).ok_or_else(|| ValidationError::missing(name))
    }

    pub fn require_integer(&mut self, name: &str) -> Result<i64, ValidationError> {
        self.take_integer(name).ok_or_else(|| ValidationError::missing(name))
    }

    pub fn require_choice<T: FromStr>(&mut self, name: &str) -> Result<T, ValidationError> {
        self.take_choice(name).ok_or_else(|| ValidationError::missing(name))
    }
}
