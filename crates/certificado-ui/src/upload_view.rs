//! Stand-alone batch upload screen: pick a file, send it, show the result.

use std::sync::Arc;

use certificado_api_client::CertificadoApi;
use certificado_core::{CertificadoResponse, LocalFile, Toast, UploadPolicy};

use crate::toast::ToastQueue;
use crate::SubmitOutcome;

const NO_FILE_MESSAGE: &str = "Por favor selecciona un archivo";
const UNKNOWN_ERROR: &str = "Error desconocido";

pub struct UploadView {
    api: Arc<dyn CertificadoApi>,
    policy: UploadPolicy,
    toasts: ToastQueue,
    selected_file: Option<LocalFile>,
    uploading: bool,
    upload_result: Option<CertificadoResponse>,
    error_message: Option<String>,
}

impl UploadView {
    /// Upload screen accepting CSV and spreadsheet batches.
    pub fn new(api: Arc<dyn CertificadoApi>) -> Self {
        Self::with_policy(api, UploadPolicy::batch_sheets())
    }

    pub fn with_policy(api: Arc<dyn CertificadoApi>, policy: UploadPolicy) -> Self {
        Self {
            api,
            policy,
            toasts: ToastQueue::new(),
            selected_file: None,
            uploading: false,
            upload_result: None,
            error_message: None,
        }
    }

    pub fn selected_file(&self) -> Option<&LocalFile> {
        self.selected_file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn upload_result(&self) -> Option<&CertificadoResponse> {
        self.upload_result.as_ref()
    }

    /// Inline error shown under the form.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.toasts()
    }

    pub fn dismiss_toast(&self, id: &str) -> bool {
        self.toasts.remove(id)
    }

    /// First of the picked files, if it passes validation.
    pub fn select_files(&mut self, files: Vec<LocalFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => self.select_file(file),
            None => false,
        }
    }

    pub fn select_file(&mut self, file: LocalFile) -> bool {
        if let Err(err) = self.policy.validate(&file) {
            tracing::debug!(file.name = %file.name, error = %err, "Rejected batch file");
            self.toasts.warning("Archivo no válido", &err.to_string());
            return false;
        }
        self.selected_file = Some(file);
        true
    }

    #[tracing::instrument(skip(self))]
    pub async fn upload(&mut self) -> SubmitOutcome {
        if self.uploading {
            return SubmitOutcome::NotReady;
        }
        let Some(file) = self.selected_file.clone() else {
            self.error_message = Some(NO_FILE_MESSAGE.to_string());
            return SubmitOutcome::NotReady;
        };

        self.uploading = true;
        self.error_message = None;
        self.upload_result = None;

        let result = self.api.upload(&file).await;
        self.uploading = false;

        match result {
            Ok(record) => {
                tracing::info!(certificado.id = record.id, file.name = %file.name, "Batch uploaded");
                self.upload_result = Some(record.clone());
                SubmitOutcome::Uploaded(record)
            }
            Err(err) => {
                tracing::error!(error = %err, file.name = %file.name, "Batch upload failed");
                self.error_message = Some(format!(
                    "Error al subir el certificado: {}",
                    err.message_or(UNKNOWN_ERROR)
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.selected_file = None;
        self.upload_result = None;
        self.error_message = None;
    }
}

impl Drop for UploadView {
    fn drop(&mut self) {
        self.toasts.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{server_error, FakeApi};
    use certificado_api_client::ApiError;
    use certificado_core::ToastKind;

    #[tokio::test]
    async fn test_upload_without_file_sets_inline_error() {
        let api = FakeApi::new(Vec::new());
        let mut view = UploadView::new(api.clone());

        assert_eq!(view.upload().await, SubmitOutcome::NotReady);

        assert_eq!(view.error_message(), Some("Por favor selecciona un archivo"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_upload_stores_result() {
        let api = FakeApi::new(Vec::new());
        let mut view = UploadView::new(api.clone());
        assert!(view.select_file(LocalFile::new("lote_marzo.xlsx", vec![0x50, 0x4b])));

        let outcome = view.upload().await;

        assert!(matches!(outcome, SubmitOutcome::Uploaded(_)));
        assert_eq!(api.calls("upload"), 1);
        assert_eq!(view.upload_result().map(|r| r.code.as_str()), Some("lote_marzo"));
        assert_eq!(view.error_message(), None);
        assert!(!view.is_uploading());
    }

    #[tokio::test]
    async fn test_failed_upload_sets_prefixed_error() {
        let api = FakeApi::new(Vec::new());
        api.fail_upload(server_error("Formato inválido"));
        let mut view = UploadView::new(api.clone());
        view.select_file(LocalFile::new("lote.csv", "code\n"));

        let outcome = view.upload().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(
            view.error_message(),
            Some("Error al subir el certificado: Formato inválido")
        );
        assert!(view.upload_result().is_none());
        assert!(view.selected_file().is_some());
    }

    #[tokio::test]
    async fn test_blank_error_falls_back_to_unknown() {
        let api = FakeApi::new(Vec::new());
        api.fail_upload(ApiError::Transport(" ".to_string()));
        let mut view = UploadView::new(api.clone());
        view.select_file(LocalFile::new("lote.csv", "code\n"));

        view.upload().await;

        assert_eq!(
            view.error_message(),
            Some("Error al subir el certificado: Error desconocido")
        );
    }

    #[tokio::test]
    async fn test_rejected_file_is_not_selected() {
        let api = FakeApi::new(Vec::new());
        let mut view = UploadView::new(api.clone());

        assert!(!view.select_files(vec![LocalFile::new("cert.pem", "x")]));
        assert!(!view.select_files(Vec::new()));

        assert!(view.selected_file().is_none());
        let kinds: Vec<ToastKind> = view.toasts().into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ToastKind::Warning]);

        view.upload().await;
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_form() {
        let api = FakeApi::new(Vec::new());
        let mut view = UploadView::new(api.clone());
        view.select_file(LocalFile::new("lote.xls", "x"));
        view.upload().await;
        assert!(view.upload_result().is_some());

        view.reset();

        assert!(view.selected_file().is_none());
        assert!(view.upload_result().is_none());
        assert!(view.error_message().is_none());
    }
}
