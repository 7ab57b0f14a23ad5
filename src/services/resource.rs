//! Generic create/list/get/update/delete pipeline
//!
//! Every resource runs the same stages: validate, check existence, check
//! references, check uniqueness, upload files, persist. The first failing
//! stage ends the request.

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::Resource,
    pagination::{build_filter, build_page, ListQuery, Pagination},
    repository::{ResourceStore, Store},
    validation::{FieldValue, Mode, NormalizedRecord, RawRecord, ValidationError},
};

use super::assets::AssetUploader;

/// Check that a referenced record exists before writing
#[async_trait]
pub trait ReferenceCheck: Send + Sync {
    async fn check(&self, record: &NormalizedRecord) -> AppResult<()>;
}

/// Integer `field` must name an existing `T`
pub struct MustExist<T: Resource> {
    field: &'static str,
    store: Store<T>,
}

impl<T: Resource> MustExist<T> {
    pub fn new(field: &'static str, store: Store<T>) -> Self {
        Self { field, store }
    }
}

#[async_trait]
impl<T: Resource> ReferenceCheck for MustExist<T> {
    async fn check(&self, record: &NormalizedRecord) -> AppResult<()> {
        let id = match record.get(self.field) {
            Some(FieldValue::Integer(id)) => *id,
            _ => return Ok(()),
        };
        let found = match i32::try_from(id) {
            Ok(id) => self.store.find_by_id(id).await?.is_some(),
            Err(_) => false,
        };
        if !found {
            return Err(AppError::NotFound(format!("{} {} not found", T::LABEL, id)));
        }
        Ok(())
    }
}

/// One page of records plus its pagination metadata
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub struct ResourceService<R: Resource> {
    store: Store<R>,
    uploader: Option<AssetUploader>,
    references: Vec<Box<dyn ReferenceCheck>>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Store<R>) -> Self {
        Self {
            store,
            uploader: None,
            references: Vec::new(),
        }
    }

    pub fn with_uploader(mut self, uploader: AssetUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_reference(mut self, check: impl ReferenceCheck + 'static) -> Self {
        self.references.push(Box::new(check));
        self
    }

    pub async fn create(&self, raw: &RawRecord, files: Vec<Vec<u8>>) -> AppResult<R::Record> {
        let mut record = R::SCHEMA.validate(raw, Mode::Create)?;
        self.check_references(&record).await?;
        self.check_unique(&record, None).await?;
        self.attach_assets(&mut record, files).await?;

        let data = <R::Create>::try_from(record)?;
        let created = self.store.create(&data).await?;

        tracing::info!(resource = R::LABEL, id = R::id(&created), "Record created");
        Ok(created)
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Listing<R::Record>> {
        let filter = build_filter(query.search.as_deref(), R::SEARCHABLE);
        let window = build_page(query.page.as_deref(), query.limit.as_deref());

        let total = self.store.count(&filter).await?;
        let items = self.store.find_many(&filter, window).await?;

        Ok(Listing {
            items,
            pagination: Pagination::new(total, window),
        })
    }

    pub async fn get(&self, id: i32) -> AppResult<R::Record> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))
    }

    pub async fn update(&self, id: i32, raw: &RawRecord, files: Vec<Vec<u8>>) -> AppResult<R::Record> {
        let mut record = R::SCHEMA.validate(raw, Mode::Update)?;
        self.get(id).await?;
        self.check_references(&record).await?;
        self.check_unique(&record, Some(id)).await?;
        self.attach_assets(&mut record, files).await?;

        let patch = <R::Patch>::try_from(record)?;
        let updated = self.store.update(id, &patch).await?;

        tracing::info!(resource = R::LABEL, id, "Record updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get(id).await?;
        self.store.delete(id).await?;

        tracing::info!(resource = R::LABEL, id, "Record deleted");
        Ok(())
    }

    /// Readiness probe against the backing store
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    async fn check_references(&self, record: &NormalizedRecord) -> AppResult<()> {
        for check in &self.references {
            check.check(record).await?;
        }
        Ok(())
    }

    async fn check_unique(&self, record: &NormalizedRecord, own_id: Option<i32>) -> AppResult<()> {
        let Some(field) = R::UNIQUE else {
            return Ok(());
        };
        let Some(value) = record.get(field) else {
            return Ok(());
        };
        if let Some(existing) = self.store.find_by_unique_field(field, value).await? {
            if Some(R::id(&existing)) != own_id {
                return Err(AppError::Conflict(format!(
                    "{} with {} '{}' already exists",
                    R::LABEL,
                    field,
                    value.to_text()
                )));
            }
        }
        Ok(())
    }

    /// Upload files and store the resulting URL(s) in the record
    async fn attach_assets(&self, record: &mut NormalizedRecord, files: Vec<Vec<u8>>) -> AppResult<()> {
        if files.is_empty() {
            return Ok(());
        }
        let Some(slot) = R::ASSETS else {
            return Err(ValidationError::invalid_value(
                "files",
                format!("{} does not accept file uploads", R::LABEL),
            )
            .into());
        };
        if files.len() > slot.max_files {
            return Err(ValidationError::invalid_value(
                slot.field,
                format!("At most {} file(s) allowed for {}", slot.max_files, slot.field),
            )
            .into());
        }
        let uploader = self
            .uploader
            .as_ref()
            .ok_or_else(|| AppError::Internal(format!("No asset store configured for {}", R::PLURAL)))?;

        let value = if slot.multiple {
            FieldValue::List(uploader.upload_many(files).await?)
        } else {
            let data = files.into_iter().next().unwrap_or_default();
            FieldValue::Text(uploader.upload(data).await?)
        };
        record.insert(slot.field, value);
        Ok(())
    }
}

fn not_found<R: Resource>(id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", R::LABEL, id))
}
