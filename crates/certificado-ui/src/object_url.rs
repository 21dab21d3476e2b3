//! Local object URLs for fetched PDF content.
//!
//! An [`ObjectUrl`] is the single owner of one registered blob: creating it
//! registers the bytes with an [`ObjectUrlStore`], dropping it revokes the
//! registration. Because the handle is neither `Clone` nor `Copy`, a
//! registration is revoked exactly once no matter which path releases it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// Registry that hands out URLs for in-memory blobs.
pub trait ObjectUrlStore: Send + Sync {
    /// Register `data` and return the URL that refers to it.
    fn create(&self, data: Bytes, content_type: &str) -> String;

    /// Forget a URL. Unknown URLs are ignored.
    fn revoke(&self, url: &str);
}

/// Owned object URL, revoked on drop.
pub struct ObjectUrl {
    url: String,
    store: Arc<dyn ObjectUrlStore>,
}

impl ObjectUrl {
    pub fn create(store: &Arc<dyn ObjectUrlStore>, data: Bytes, content_type: &str) -> Self {
        let size = data.len();
        let url = store.create(data, content_type);
        tracing::debug!(url = %url, size, content_type, "Created object URL");
        Self {
            url,
            store: Arc::clone(store),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Mark this URL as safe to embed in the document viewer.
    pub fn trusted(&self) -> TrustedResourceUrl {
        TrustedResourceUrl(self.url.clone())
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
        tracing::debug!(url = %self.url, "Revoked object URL");
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

/// URL vetted for embedding. Only obtainable from a live [`ObjectUrl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedResourceUrl(String);

impl TrustedResourceUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct Blob {
    data: Bytes,
    content_type: String,
}

/// In-memory [`ObjectUrlStore`] handing out `blob:certificado/{uuid}` URLs.
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: Mutex<HashMap<String, Blob>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .map(|blob| blob.data.clone())
    }

    pub fn content_type(&self, url: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .map(|blob| blob.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectUrlStore for BlobStore {
    fn create(&self, data: Bytes, content_type: &str) -> String {
        let url = format!("blob:certificado/{}", Uuid::new_v4());
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner).insert(
            url.clone(),
            Blob {
                data,
                content_type: content_type.to_string(),
            },
        );
        url
    }

    fn revoke(&self, url: &str) {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
    }
}

/// Destination of a triggered download.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Save the content behind `url` under `file_name`.
    async fn save(&self, url: &ObjectUrl, file_name: &str) -> Result<()>;
}

/// Writes downloads into a directory, reading the content from a [`BlobStore`].
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
    blobs: Arc<BlobStore>,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>, blobs: Arc<BlobStore>) -> Self {
        Self {
            dir: dir.into(),
            blobs,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn save(&self, url: &ObjectUrl, file_name: &str) -> Result<()> {
        let name = Path::new(file_name)
            .file_name()
            .filter(|name| name.len() == file_name.len())
            .ok_or_else(|| anyhow::anyhow!("Invalid download file name: {}", file_name))?;

        let data = self
            .blobs
            .get(url.as_str())
            .with_context(|| format!("Object URL is not registered: {}", url.as_str()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let target = self.dir.join(name);
        tokio::fs::write(&target, &data)
            .await
            .with_context(|| format!("Failed to write file: {}", target.display()))?;

        tracing::info!(path = %target.display(), size = data.len(), "Saved download");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_revokes_registration() {
        let blobs = Arc::new(BlobStore::new());
        let store: Arc<dyn ObjectUrlStore> = blobs.clone();

        let url = ObjectUrl::create(&store, Bytes::from_static(b"%PDF"), "application/pdf");
        let key = url.as_str().to_string();
        assert!(key.starts_with("blob:certificado/"));
        assert_eq!(blobs.get(&key).as_deref(), Some(&b"%PDF"[..]));
        assert_eq!(blobs.content_type(&key).as_deref(), Some("application/pdf"));

        drop(url);
        assert!(blobs.get(&key).is_none());
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_trusted_url_matches_object_url() {
        let store: Arc<dyn ObjectUrlStore> = Arc::new(BlobStore::new());
        let url = ObjectUrl::create(&store, Bytes::new(), "application/pdf");
        assert_eq!(url.trusted().as_str(), url.as_str());
    }

    #[test]
    fn test_revoking_unknown_url_is_ignored() {
        let blobs = BlobStore::new();
        blobs.revoke("blob:certificado/unknown");
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn test_directory_downloads_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::new());
        let store: Arc<dyn ObjectUrlStore> = blobs.clone();
        let sink = DirectoryDownloads::new(dir.path().join("descargas"), blobs.clone());

        let url = ObjectUrl::create(&store, Bytes::from_static(b"%PDF-1.7"), "application/pdf");
        sink.save(&url, "certificado_C001.pdf").await.unwrap();
        drop(url);

        let written = std::fs::read(dir.path().join("descargas/certificado_C001.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7");
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn test_directory_downloads_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::new());
        let store: Arc<dyn ObjectUrlStore> = blobs.clone();
        let sink = DirectoryDownloads::new(dir.path(), blobs);

        let url = ObjectUrl::create(&store, Bytes::from_static(b"x"), "application/pdf");
        let err = sink.save(&url, "../escape.pdf").await.unwrap_err();
        assert!(err.to_string().contains("Invalid download file name"));
    }
}
