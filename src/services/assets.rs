//! Image upload adapter
//!
//! [`AssetStore`] is the port to the remote object store; [`CloudinaryStore`]
//! implements it over HTTP. [`AssetUploader`] adds buffer checks and the
//! concurrent multi-file upload used by the resource pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::{
    config::CloudinaryConfig,
    error::{AppError, AppResult},
};

/// Uploads one image buffer and returns its public URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, data: Vec<u8>) -> AppResult<String>;
}

/// Signed uploads to the Cloudinary REST API
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.upload_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// `hex(sha1("timestamp={ts}{secret}"))`
pub fn sign(timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("timestamp={}{}", timestamp, api_secret).as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn upload(&self, data: Vec<u8>) -> AppResult<String> {
        let timestamp = Utc::now().timestamp();
        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(data).file_name("upload"))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", sign(timestamp, &self.config.api_secret));

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("upload rejected with status {}", status));
            return Err(AppError::UploadFailed(message));
        }

        body.secure_url
            .ok_or_else(|| AppError::UploadFailed("upload response has no secure_url".to_string()))
    }
}

/// Upload adapter handed to the resource services
#[derive(Clone)]
pub struct AssetUploader {
    store: Arc<dyn AssetStore>,
}

impl AssetUploader {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    pub async fn upload(&self, data: Vec<u8>) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::MissingAssetData("File buffer is empty".to_string()));
        }
        self.store.upload(data).await
    }

    /// Upload every buffer concurrently; URLs come back in input order.
    ///
    /// The batch fails as a whole on the first failed upload. Uploads that
    /// already completed are not removed from the remote store.
    pub async fn upload_many(&self, files: Vec<Vec<u8>>) -> AppResult<Vec<String>> {
        if files.iter().any(Vec::is_empty) {
            return Err(AppError::MissingAssetData("File buffer is empty".to_string()));
        }

        tracing::debug!(count = files.len(), "Uploading files");
        let handles: Vec<_> = files
            .into_iter()
            .map(|data| {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move { store.upload(data).await })
            })
            .collect();

        let mut urls = Vec::with_capacity(handles.len());
        for handle in handles {
            let url = handle
                .await
                .map_err(|e| AppError::UploadFailed(e.to_string()))??;
            urls.push(url);
        }
        tracing::debug!(?urls, "Files uploaded");
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signature_is_sha1_hex() {
        assert_eq!(
            sign(1315060510, "abcd"),
            "a21ad0f63beb4de2e5575204b79ab90bffb02c10"
        );
        assert_ne!(sign(1, "s"), sign(2, "s"));
    }

    #[tokio::test]
    async fn test_upload_returns_store_url() {
        let mut store = MockAssetStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_| Ok("https://cdn.test/a.jpg".to_string()));

        let uploader = AssetUploader::new(Arc::new(store));
        let url = uploader.upload(vec![1, 2, 3]).await.unwrap();
        assert_eq!(url, "https://cdn.test/a.jpg");
    }

    #[tokio::test]
    async fn test_empty_buffer_is_missing_data() {
        let mut store = MockAssetStore::new();
        store.expect_upload().never();

        let uploader = AssetUploader::new(Arc::new(store));
        let err = uploader.upload(Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::MissingAssetData(_)));

        let err = uploader.upload_many(vec![vec![1], Vec::new()]).await.unwrap_err();
        assert!(matches!(err, AppError::MissingAssetData(_)));
    }

    #[tokio::test]
    async fn test_upload_many_preserves_order() {
        let mut store = MockAssetStore::new();
        store
            .expect_upload()
            .times(3)
            .returning(|data| Ok(format!("https://cdn.test/{}.jpg", data[0])));

        let uploader = AssetUploader::new(Arc::new(store));
        let urls = uploader
            .upload_many(vec![vec![3], vec![1], vec![2]])
            .await
            .unwrap();
        assert_eq!(
            urls,
            [
                "https://cdn.test/3.jpg",
                "https://cdn.test/1.jpg",
                "https://cdn.test/2.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_many_fails_as_a_batch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut store = MockAssetStore::new();
        store.expect_upload().returning(move |data| {
            seen.fetch_add(1, Ordering::SeqCst);
            if data[0] == 2 {
                Err(AppError::UploadFailed("quota exceeded".to_string()))
            } else {
                Ok("https://cdn.test/ok.jpg".to_string())
            }
        });

        let uploader = AssetUploader::new(Arc::new(store));
        let err = uploader
            .upload_many(vec![vec![1], vec![2], vec![3]])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadFailed(ref m) if m == "quota exceeded"));
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }
}
