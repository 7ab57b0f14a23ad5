//! Request body extraction into raw records

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use axum_extra::extract::Multipart;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{AssetSlot, Resource},
    validation::{RawRecord, ValidationError},
};

/// JSON body taken as raw fields, validated later against a schema
pub struct JsonBody(pub RawRecord);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| body_format(rejection.body_text()))?;
        Ok(JsonBody(RawRecord::from_json(body)))
    }
}

/// Body of a resource that accepts file uploads.
///
/// Multipart forms carry text fields plus files for `R`'s asset slot; a JSON
/// body carries fields only. Any other content type is `InvalidFormat`.
pub struct FormBody<R> {
    pub raw: RawRecord,
    pub files: Vec<Vec<u8>>,
    _resource: PhantomData<fn() -> R>,
}

#[async_trait]
impl<R, S> FromRequest<S> for FormBody<R>
where
    R: Resource,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (raw, files) = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| body_format(rejection.to_string()))?;
            read_form(multipart, R::ASSETS).await?
        } else if content_type.starts_with("application/json") {
            let JsonBody(raw) = JsonBody::from_request(req, state).await?;
            (raw, Vec::new())
        } else {
            return Err(body_format(format!("Unsupported content type '{}'", content_type)).into());
        };

        Ok(Self {
            raw,
            files,
            _resource: PhantomData,
        })
    }
}

fn body_format(value: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "body".to_string(),
        value,
    }
}

fn malformed(err: axum_extra::extract::multipart::MultipartError) -> AppError {
    body_format(err.to_string()).into()
}

/// Split a multipart form into text fields and file buffers.
///
/// Files are only accepted under the slot's field name, up to its maximum.
async fn read_form(
    mut multipart: Multipart,
    slot: Option<AssetSlot>,
) -> AppResult<(RawRecord, Vec<Vec<u8>>)> {
    let mut raw = RawRecord::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await.map_err(malformed)?;
            raw.insert_text(name, text);
            continue;
        };

        let slot = match slot {
            Some(slot) if slot.field == name => slot,
            _ => {
                return Err(ValidationError::invalid_value(
                    &name,
                    format!("Unexpected file field '{}'", name),
                )
                .into())
            }
        };
        if files.len() >= slot.max_files {
            return Err(ValidationError::invalid_value(
                &name,
                format!("At most {} file(s) allowed for {}", slot.max_files, name),
            )
            .into());
        }
        let data = field.bytes().await.map_err(malformed)?;
        // Browsers send an empty, unnamed part for an untouched file input.
        if data.is_empty() && file_name.is_empty() {
            continue;
        }
        files.push(data.to_vec());
    }

    Ok((raw, files))
}
