//! In-process store with the same observable behavior as [`PgStore`].
//!
//! Records are built and patched through their JSON form, which matches the
//! wire names used as column names.
//!
//! [`PgStore`]: super::PgStore

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::ResourceStore;
use crate::{
    error::{AppError, AppResult},
    models::{Columns, Resource},
    pagination::{PageWindow, SearchFilter},
    validation::FieldValue,
};

struct Table<R: Resource> {
    next_id: i32,
    rows: Vec<R::Record>,
}

pub struct MemoryStore<R: Resource> {
    table: Mutex<Table<R>>,
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Table<R>>> {
        self.table
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

fn to_object<T: serde::Serialize>(record: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Internal("record did not serialize to an object".to_string())),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

fn from_object<R: Resource>(map: Map<String, Value>) -> AppResult<R::Record> {
    serde_json::from_value(Value::Object(map)).map_err(|e| AppError::Internal(e.to_string()))
}

/// Text of one field as used for search and uniqueness comparisons
fn field_text(map: &Map<String, Value>, field: &str) -> Option<String> {
    match map.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn matches_filter<R: Resource>(record: &R::Record, filter: &SearchFilter) -> AppResult<bool> {
    if filter.is_match_all() {
        return Ok(true);
    }
    let map = to_object(record)?;
    Ok(filter.matches(|field| field_text(&map, field)))
}

/// Reject the write when another record already holds the unique value
fn check_unique<R: Resource>(
    rows: &[R::Record],
    candidate: &Map<String, Value>,
    own_id: Option<i32>,
) -> AppResult<()> {
    let Some(field) = R::UNIQUE else {
        return Ok(());
    };
    let Some(value) = field_text(candidate, field) else {
        return Ok(());
    };
    for row in rows {
        if Some(R::id(row)) == own_id {
            continue;
        }
        if field_text(&to_object(row)?, field).as_deref() == Some(value.as_str()) {
            return Err(AppError::Conflict(format!(
                "{} with this {} already exists",
                R::LABEL,
                field
            )));
        }
    }
    Ok(())
}

fn not_found<R: Resource>(id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", R::LABEL, id))
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore<R> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<R::Record>> {
        let table = self.lock()?;
        Ok(table.rows.iter().find(|r| R::id(r) == id).cloned())
    }

    async fn find_by_unique_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> AppResult<Option<R::Record>> {
        let wanted = value.to_text();
        let table = self.lock()?;
        for row in &table.rows {
            if field_text(&to_object(row)?, field).as_deref() == Some(wanted.as_str()) {
                return Ok(Some(row.clone()));
            }
        }
        Ok(None)
    }

    async fn find_many(&self, filter: &SearchFilter, window: PageWindow) -> AppResult<Vec<R::Record>> {
        let table = self.lock()?;
        let mut found = Vec::new();
        // Rows are kept in insertion order, so newest first is reverse order.
        for row in table.rows.iter().rev() {
            if matches_filter::<R>(row, filter)? {
                found.push(row.clone());
            }
        }
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &SearchFilter) -> AppResult<i64> {
        let table = self.lock()?;
        let mut total = 0i64;
        for row in &table.rows {
            if matches_filter::<R>(row, filter)? {
                total += 1;
            }
        }
        Ok(total)
    }

    async fn create(&self, data: &R::Create) -> AppResult<R::Record> {
        let mut table = self.lock()?;
        let now = Value::String(Utc::now().to_rfc3339());

        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(table.next_id));
        for (name, value) in data.columns() {
            map.insert(name.to_string(), value.to_json());
        }
        map.insert("created_at".to_string(), now.clone());
        map.insert("updated_at".to_string(), now);

        check_unique::<R>(&table.rows, &map, None)?;
        let record = from_object::<R>(map)?;
        table.next_id += 1;
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: i32, patch: &R::Patch) -> AppResult<R::Record> {
        let mut table = self.lock()?;
        let index = table
            .rows
            .iter()
            .position(|r| R::id(r) == id)
            .ok_or_else(|| not_found::<R>(id))?;

        let mut map = to_object(&table.rows[index])?;
        for (name, value) in patch.columns() {
            map.insert(name.to_string(), value.to_json());
        }
        map.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));

        check_unique::<R>(&table.rows, &map, Some(id))?;
        let record = from_object::<R>(map)?;
        table.rows[index] = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut table = self.lock()?;
        let before = table.rows.len();
        table.rows.retain(|r| R::id(r) != id);
        if table.rows.len() == before {
            return Err(not_found::<R>(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewCategory, CategoryPatch, NewUser, User};
    use crate::pagination::{build_filter, build_page};

    fn user(name: &str, contact_number: i64) -> NewUser {
        NewUser {
            name: name.to_string(),
            contact_number,
            email: None,
            place: None,
            profile_photo: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_timestamps() {
        let store = MemoryStore::<Category>::new();
        let first = store.create(&NewCategory { name: "Phones".into() }).await.unwrap();
        let second = store.create(&NewCategory { name: "Cases".into() }).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_unique_field_enforced_on_write() {
        let store = MemoryStore::<Category>::new();
        store.create(&NewCategory { name: "Phones".into() }).await.unwrap();

        let err = store.create(&NewCategory { name: "Phones".into() }).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_unique_value() {
        let store = MemoryStore::<Category>::new();
        let created = store.create(&NewCategory { name: "Phones".into() }).await.unwrap();

        let updated = store
            .update(created.id, &CategoryPatch { name: "Phones".into() })
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = MemoryStore::<Category>::new();
        assert!(store.find_by_id(7).await.unwrap().is_none());
        assert!(matches!(
            store.update(7, &CategoryPatch { name: "X".into() }).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.delete(7).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_many_newest_first_with_search() {
        let store = MemoryStore::<User>::new();
        store.create(&user("Asha", 9900)).await.unwrap();
        store.create(&user("Ravi", 1234)).await.unwrap();
        store.create(&user("Mina", 5599)).await.unwrap();

        let all = store
            .find_many(&SearchFilter::all(), build_page(None, None))
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Mina", "Ravi", "Asha"]);

        let filter = build_filter(Some("99"), User::SEARCHABLE);
        assert_eq!(store.count(&filter).await.unwrap(), 2);
        let page = store.find_many(&filter, build_page(Some("2"), Some("1"))).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Asha");
    }

    #[tokio::test]
    async fn test_find_by_unique_field_compares_text() {
        let store = MemoryStore::<User>::new();
        store.create(&user("Asha", 9900)).await.unwrap();

        let hit = store
            .find_by_unique_field("contact_number", &FieldValue::Integer(9900))
            .await
            .unwrap();
        assert_eq!(hit.map(|u| u.name), Some("Asha".to_string()));
        assert!(store
            .find_by_unique_field("contact_number", &FieldValue::Integer(99))
            .await
            .unwrap()
            .is_none());
    }
}
