//! In-memory doubles shared by the view model tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use certificado_api_client::{ApiError, ApiResult, CertificadoApi};
use certificado_core::{CertificadoResponse, LocalFile};

use crate::object_url::{BlobStore, DownloadSink, ObjectUrl, ObjectUrlStore};

pub fn record(id: i64, code: &str, name: &str, certification: &str, status: &str) -> CertificadoResponse {
    CertificadoResponse {
        id,
        code: code.to_string(),
        name: name.to_string(),
        certification: certification.to_string(),
        document_path: format!("docs/{}.pdf", code),
        download_status_name: status.to_string(),
        ..Default::default()
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::from_status(
        "http://test/api",
        500,
        format!(r#"{{"message":"{}"}}"#, message),
    )
}

/// Scripted backend that counts calls.
pub struct FakeApi {
    records: Mutex<Vec<CertificadoResponse>>,
    get_all_error: Mutex<Option<ApiError>>,
    upload_error: Mutex<Option<ApiError>>,
    preview: Mutex<ApiResult<Bytes>>,
    hold_preview: Mutex<bool>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    pub fn new(records: Vec<CertificadoResponse>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            get_all_error: Mutex::new(None),
            upload_error: Mutex::new(None),
            preview: Mutex::new(Ok(Bytes::from_static(b"%PDF-1.7 preview"))),
            hold_preview: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_get_all(&self, err: ApiError) {
        *self.get_all_error.lock().unwrap() = Some(err);
    }

    pub fn fail_upload(&self, err: ApiError) {
        *self.upload_error.lock().unwrap() = Some(err);
    }

    pub fn fail_preview(&self, err: ApiError) {
        *self.preview.lock().unwrap() = Err(err);
    }

    /// While set, preview fetches never resolve.
    pub fn hold_preview(&self, hold: bool) {
        *self.hold_preview.lock().unwrap() = hold;
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record_call(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::from_status(format!("http://test/api/certificados/{}", id), 404, String::new())
    }
}

#[async_trait]
impl CertificadoApi for FakeApi {
    async fn upload(&self, file: &LocalFile) -> ApiResult<CertificadoResponse> {
        self.record_call("upload");
        if let Some(err) = self.upload_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let created = record(
            records.len() as i64 + 100,
            file.stem(),
            file.stem(),
            "Carga",
            "PENDIENTE",
        );
        records.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> ApiResult<CertificadoResponse> {
        self.record_call("get_by_id");
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn get_all(&self) -> ApiResult<Vec<CertificadoResponse>> {
        self.record_call("get_all");
        if let Some(err) = self.get_all_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_pdf_blob(&self, _id: i64) -> ApiResult<Bytes> {
        self.record_call("get_pdf_blob");
        self.preview.lock().unwrap().clone()
    }

    async fn update_status(&self, id: i64, status: &str) -> ApiResult<CertificadoResponse> {
        self.record_call("update_status");
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.status = status.to_string();
        Ok(record.clone())
    }

    async fn get_preview_blob(&self, _document_path: &str) -> ApiResult<Bytes> {
        self.record_call("get_preview_blob");
        let hold = *self.hold_preview.lock().unwrap();
        if hold {
            std::future::pending::<()>().await;
        }
        self.preview.lock().unwrap().clone()
    }

    async fn get_preview_url(&self, document_path: &str) -> ApiResult<String> {
        self.record_call("get_preview_url");
        Ok(format!("http://test/tmp/{}", document_path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlEvent {
    Created(String),
    Revoked(String),
}

/// Object URL store that logs every create/revoke in order.
#[derive(Default)]
pub struct RecordingUrlStore {
    blobs: BlobStore,
    events: Mutex<Vec<UrlEvent>>,
}

impl RecordingUrlStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<UrlEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn created(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, UrlEvent::Created(_)))
            .count()
    }

    pub fn revoked(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, UrlEvent::Revoked(_)))
            .count()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.blobs.get(url).is_some()
    }

    pub fn live(&self) -> usize {
        self.blobs.len()
    }
}

impl ObjectUrlStore for RecordingUrlStore {
    fn create(&self, data: Bytes, content_type: &str) -> String {
        let url = self.blobs.create(data, content_type);
        self.events
            .lock()
            .unwrap()
            .push(UrlEvent::Created(url.clone()));
        url
    }

    fn revoke(&self, url: &str) {
        self.blobs.revoke(url);
        self.events
            .lock()
            .unwrap()
            .push(UrlEvent::Revoked(url.to_string()));
    }
}

/// Download sink remembering what was saved and whether the URL was live.
pub struct RecordingSink {
    store: Arc<RecordingUrlStore>,
    saved: Mutex<Vec<(String, String, bool)>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new(store: Arc<RecordingUrlStore>) -> Self {
        Self {
            store,
            saved: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing(store: Arc<RecordingUrlStore>) -> Self {
        Self {
            fail: true,
            ..Self::new(store)
        }
    }

    /// (url, file name, url registered at save time)
    pub fn saved(&self) -> Vec<(String, String, bool)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadSink for RecordingSink {
    async fn save(&self, url: &ObjectUrl, file_name: &str) -> Result<()> {
        let live = self.store.is_live(url.as_str());
        self.saved
            .lock()
            .unwrap()
            .push((url.as_str().to_string(), file_name.to_string(), live));
        if self.fail {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}
