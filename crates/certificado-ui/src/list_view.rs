//! Certificate list screen.
//!
//! Holds the fetched collection, the search/status filters, the upload modal
//! and the PDF preview panel. Filtering is computed on demand and never
//! touches the stored collection.

use std::sync::Arc;

use certificado_api_client::CertificadoApi;
use certificado_core::{CertificadoResponse, LocalFile, Toast, UploadPolicy};

use crate::object_url::{DownloadSink, ObjectUrlStore};
use crate::pdf_panel::{PanelEvent, PdfPanel};
use crate::toast::ToastQueue;
use crate::SubmitOutcome;

const UPLOAD_FALLBACK_MESSAGE: &str = "No se pudo cargar el certificado";
const LOAD_FALLBACK_MESSAGE: &str = "No se pudieron obtener los certificados";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Records matching the search term and status filter, in collection order.
///
/// The search term matches case-insensitively anywhere in the name,
/// certification or code; the status filter must equal the download status
/// name exactly. A blank search term or an empty status filter disables the
/// respective filter.
pub fn filter_certificados<'a>(
    records: &'a [CertificadoResponse],
    search_term: &str,
    status_filter: &str,
) -> Vec<&'a CertificadoResponse> {
    let search = search_term.trim().to_lowercase();

    records
        .iter()
        .filter(|record| {
            search.is_empty()
                || [&record.name, &record.certification, &record.code]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&search))
        })
        .filter(|record| {
            status_filter.is_empty() || record.download_status_name == status_filter
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Closed,
    Empty,
    Ready,
    Uploading,
}

/// Upload modal state: the draft plus transient UI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadModal {
    pub open: bool,
    pub file: Option<LocalFile>,
    pub name: String,
    pub description: String,
    pub drag_over: bool,
    pub uploading: bool,
}

impl UploadModal {
    pub fn phase(&self) -> UploadPhase {
        if !self.open {
            UploadPhase::Closed
        } else if self.uploading {
            UploadPhase::Uploading
        } else if self.file.is_some() {
            UploadPhase::Ready
        } else {
            UploadPhase::Empty
        }
    }

    fn reset(&mut self) {
        let open = self.open;
        *self = Self {
            open,
            ..Self::default()
        };
    }
}

pub struct ListView {
    api: Arc<dyn CertificadoApi>,
    policy: UploadPolicy,
    toasts: ToastQueue,
    load_state: LoadState,
    certificados: Vec<CertificadoResponse>,
    search_term: String,
    status_filter: String,
    upload: UploadModal,
    preview: PdfPanel,
}

impl ListView {
    /// List screen accepting certificate and key files.
    pub fn new(api: Arc<dyn CertificadoApi>, urls: Arc<dyn ObjectUrlStore>) -> Self {
        Self::with_policy(api, urls, UploadPolicy::certificate_files())
    }

    pub fn with_policy(
        api: Arc<dyn CertificadoApi>,
        urls: Arc<dyn ObjectUrlStore>,
        policy: UploadPolicy,
    ) -> Self {
        let toasts = ToastQueue::new();
        let preview = PdfPanel::new(Arc::clone(&api), urls, toasts.clone());
        Self {
            api,
            policy,
            toasts,
            load_state: LoadState::Idle,
            certificados: Vec::new(),
            search_term: String::new(),
            status_filter: String::new(),
            upload: UploadModal::default(),
            preview,
        }
    }

    /// Initial load when the screen is shown.
    pub async fn activate(&mut self) {
        self.refresh().await;
    }

    /// Re-fetch the whole collection.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) {
        self.load_state = LoadState::Loading;

        match self.api.get_all().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Certificate list loaded");
                self.certificados = records;
                self.load_state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load certificates");
                let message = err.message_or(LOAD_FALLBACK_MESSAGE);
                self.toasts.error("Error al cargar certificados", &message);
                self.load_state = LoadState::Error(message);
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn certificados(&self) -> &[CertificadoResponse] {
        &self.certificados
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }

    /// Empty string shows every status.
    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.status_filter = status.into();
    }

    /// Rows to render for the current filters.
    pub fn visible(&self) -> Vec<&CertificadoResponse> {
        filter_certificados(&self.certificados, &self.search_term, &self.status_filter)
    }

    /// Distinct download status names, in first-seen order, for the filter select.
    pub fn status_options(&self) -> Vec<&str> {
        let mut options: Vec<&str> = Vec::new();
        for record in &self.certificados {
            let status = record.download_status_name.as_str();
            if !status.is_empty() && !options.contains(&status) {
                options.push(status);
            }
        }
        options
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.toasts()
    }

    pub fn toast_queue(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn dismiss_toast(&self, id: &str) -> bool {
        self.toasts.remove(id)
    }

    // Upload modal

    pub fn upload(&self) -> &UploadModal {
        &self.upload
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.upload.phase()
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn open_upload_modal(&mut self) {
        self.upload.open = true;
        self.upload.reset();
    }

    pub fn close_upload_modal(&mut self) {
        self.upload.open = false;
        self.upload.reset();
    }

    pub fn drag_over(&mut self) {
        self.upload.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.upload.drag_over = false;
    }

    /// Dropped files; only the first one is considered.
    pub fn drop_files(&mut self, files: Vec<LocalFile>) -> bool {
        self.upload.drag_over = false;
        match files.into_iter().next() {
            Some(file) => self.select_file(file),
            None => false,
        }
    }

    /// Validate and stage a file. Returns `false` when it was rejected.
    pub fn select_file(&mut self, file: LocalFile) -> bool {
        if !self.upload.open || self.upload.uploading {
            return false;
        }

        if let Err(err) = self.policy.validate(&file) {
            tracing::debug!(file.name = %file.name, error = %err, "Rejected upload file");
            self.toasts.warning("Archivo no válido", &err.to_string());
            return false;
        }

        if self.upload.name.trim().is_empty() {
            self.upload.name = file.stem().to_string();
        }
        self.upload.file = Some(file);
        true
    }

    pub fn remove_file(&mut self) {
        self.upload.file = None;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.upload.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.upload.description = description.into();
    }

    /// Upload the staged file; on success close the modal and reload the list.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.upload.phase() != UploadPhase::Ready || self.upload.name.trim().is_empty() {
            return SubmitOutcome::NotReady;
        }
        let Some(file) = self.upload.file.clone() else {
            return SubmitOutcome::NotReady;
        };

        self.upload.uploading = true;
        let result = self.api.upload(&file).await;
        self.upload.uploading = false;

        match result {
            Ok(record) => {
                tracing::info!(certificado.id = record.id, "Certificate uploaded");
                self.close_upload_modal();
                self.toasts
                    .success("Certificado cargado", "Certificado cargado exitosamente");
                self.refresh().await;
                SubmitOutcome::Uploaded(record)
            }
            Err(err) => {
                tracing::error!(error = %err, file.name = %file.name, "Upload failed");
                self.toasts.error(
                    "Error al cargar certificado",
                    &err.message_or(UPLOAD_FALLBACK_MESSAGE),
                );
                SubmitOutcome::Failed(err)
            }
        }
    }

    // PDF preview

    pub fn preview(&self) -> &PdfPanel {
        &self.preview
    }

    pub async fn open_preview(&mut self, certificado: CertificadoResponse) -> Option<PanelEvent> {
        self.preview.update(true, Some(certificado)).await
    }

    pub fn close_preview(&mut self) -> PanelEvent {
        self.preview.close()
    }

    pub async fn download_pdf(&self, sink: &dyn DownloadSink) -> bool {
        self.preview.download(sink).await
    }

    /// Release everything the screen holds: pending toast timers and the preview.
    pub fn teardown(&mut self) {
        self.preview.close();
        self.toasts.shutdown();
    }
}

impl Drop for ListView {
    fn drop(&mut self) {
        self.teardown();
    }
}
