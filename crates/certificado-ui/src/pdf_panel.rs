//! PDF preview/download panel.
//!
//! The panel is driven by its two inputs, visibility and the selected
//! certificate, through [`PdfPanel::set_inputs`]. While it is shown it owns at
//! most one [`ObjectUrl`] for the previewed document; that handle is dropped
//! (and therefore revoked) when the panel closes, when a new load starts, when
//! the certificate changes, and when the panel itself is dropped.
//!
//! Loads are tagged with a generation number. Closing the panel or starting a
//! newer load bumps it, and a response that arrives for an older generation is
//! discarded without ever registering its bytes.

use std::sync::Arc;

use bytes::Bytes;
use certificado_api_client::{ApiResult, CertificadoApi};
use certificado_core::CertificadoResponse;

use crate::object_url::{DownloadSink, ObjectUrl, ObjectUrlStore, TrustedResourceUrl};
use crate::toast::ToastQueue;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Panel not shown.
    Hidden,
    /// Shown, but the certificate has no stored document.
    Unavailable,
    /// Shown; the last load was abandoned before it completed.
    Idle,
    Loading,
    Loaded,
    /// Last load failed; the panel closed itself.
    Error,
}

/// A preview fetch the host must perform and hand back to [`PdfPanel::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    generation: u64,
    pub document_path: String,
}

/// Notification for the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Closed,
}

#[derive(Debug)]
struct LoadedPreview {
    url: ObjectUrl,
    trusted: TrustedResourceUrl,
}

pub struct PdfPanel {
    api: Arc<dyn CertificadoApi>,
    urls: Arc<dyn ObjectUrlStore>,
    toasts: ToastQueue,
    visible: bool,
    certificado: Option<CertificadoResponse>,
    state: PreviewState,
    preview: Option<LoadedPreview>,
    generation: u64,
    pending: Option<u64>,
}

impl PdfPanel {
    pub fn new(
        api: Arc<dyn CertificadoApi>,
        urls: Arc<dyn ObjectUrlStore>,
        toasts: ToastQueue,
    ) -> Self {
        Self {
            api,
            urls,
            toasts,
            visible: false,
            certificado: None,
            state: PreviewState::Hidden,
            preview: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn certificado(&self) -> Option<&CertificadoResponse> {
        self.certificado.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// URL to embed in the viewer, when a document is loaded.
    pub fn trusted_url(&self) -> Option<&TrustedResourceUrl> {
        self.preview.as_ref().map(|preview| &preview.trusted)
    }

    pub fn object_url(&self) -> Option<&str> {
        self.preview.as_ref().map(|preview| preview.url.as_str())
    }

    /// Apply new inputs. Returns the fetch to perform when a load must start.
    ///
    /// Calling it again with unchanged inputs is a no-op: no second load is
    /// issued while one is pending or a document is already shown.
    pub fn set_inputs(
        &mut self,
        visible: bool,
        certificado: Option<CertificadoResponse>,
    ) -> Option<PreviewRequest> {
        let was_visible = self.visible;
        let changed = identity(self.certificado.as_ref()) != identity(certificado.as_ref());

        self.visible = visible;
        self.certificado = certificado;

        if !visible {
            if was_visible {
                self.deactivate();
            }
            return None;
        }

        if changed {
            // A different certificate never shows the previous document.
            self.release_preview();
            self.pending = None;
            self.generation += 1;
        }

        if self.preview.is_some() || self.pending.is_some() {
            return None;
        }

        let activating = changed || !was_visible;
        if !self.certificado.as_ref().is_some_and(|c| c.has_document()) {
            if activating {
                tracing::debug!("Preview requested for a certificate without document");
                self.state = PreviewState::Unavailable;
                self.toasts.error(
                    "Error",
                    "No hay documento disponible para este certificado",
                );
            }
            return None;
        }

        self.begin_load()
    }

    fn begin_load(&mut self) -> Option<PreviewRequest> {
        let document_path = self.certificado.as_ref()?.document_path.clone();

        self.release_preview();
        self.generation += 1;
        self.pending = Some(self.generation);
        self.state = PreviewState::Loading;

        tracing::debug!(
            generation = self.generation,
            document_path = %document_path,
            "Loading PDF preview"
        );

        Some(PreviewRequest {
            generation: self.generation,
            document_path,
        })
    }

    /// Feed back the result of a [`PreviewRequest`].
    ///
    /// Returns [`PanelEvent::Closed`] when a failure closed the panel.
    pub fn complete(
        &mut self,
        request: &PreviewRequest,
        result: ApiResult<Bytes>,
    ) -> Option<PanelEvent> {
        if self.pending != Some(request.generation) {
            tracing::debug!(
                generation = request.generation,
                current = self.generation,
                "Discarding stale preview response"
            );
            return None;
        }
        self.pending = None;

        match result {
            Ok(data) => {
                self.release_preview();
                let url = ObjectUrl::create(&self.urls, data, PDF_CONTENT_TYPE);
                let trusted = url.trusted();
                self.preview = Some(LoadedPreview { url, trusted });
                self.state = PreviewState::Loaded;
                self.toasts.success(
                    "PDF Cargado",
                    "El documento se ha cargado correctamente",
                );
                None
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    document_path = %request.document_path,
                    "Failed to load PDF preview"
                );
                self.toasts.error(
                    "Error al cargar PDF",
                    "No se pudo cargar el documento. Verifique que el archivo existe.",
                );
                let event = self.close();
                self.state = PreviewState::Error;
                Some(event)
            }
        }
    }

    /// Give up on a [`PreviewRequest`] whose result will never be delivered.
    ///
    /// The next `set_inputs` with the same visible certificate issues a fresh
    /// request. Stale or already completed requests are ignored.
    pub fn abandon(&mut self, request: &PreviewRequest) {
        if self.pending != Some(request.generation) {
            return;
        }
        tracing::debug!(generation = request.generation, "Preview load abandoned");
        self.pending = None;
        self.generation += 1;
        self.state = if self.visible {
            PreviewState::Idle
        } else {
            PreviewState::Hidden
        };
    }

    /// `set_inputs` followed by the fetch it asks for.
    ///
    /// Dropping the returned future mid-fetch abandons the request.
    pub async fn update(
        &mut self,
        visible: bool,
        certificado: Option<CertificadoResponse>,
    ) -> Option<PanelEvent> {
        let request = self.set_inputs(visible, certificado)?;
        let api = Arc::clone(&self.api);
        let mut in_flight = InFlight {
            panel: self,
            request,
            settled: false,
        };

        let result = api.get_preview_blob(&in_flight.request.document_path).await;
        in_flight.settled = true;
        in_flight.panel.complete(&in_flight.request, result)
    }

    /// Close the panel, releasing the shown document.
    pub fn close(&mut self) -> PanelEvent {
        self.deactivate();
        self.visible = false;
        PanelEvent::Closed
    }

    /// Clicks on the dimmed overlay close the panel; clicks inside it do not.
    pub fn on_overlay_click(&mut self, target_is_overlay: bool) -> Option<PanelEvent> {
        target_is_overlay.then(|| self.close())
    }

    fn deactivate(&mut self) {
        self.release_preview();
        if self.pending.take().is_some() {
            tracing::debug!(generation = self.generation, "Abandoning in-flight preview");
        }
        self.generation += 1;
        self.state = PreviewState::Hidden;
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            tracing::debug!(url = %preview.url.as_str(), "Releasing PDF preview");
        }
    }

    /// Fetch the document again and hand it to `sink` under
    /// `certificado_{code}.pdf`. The shown preview is left untouched; the
    /// download gets its own short-lived URL, revoked right after saving.
    ///
    /// Returns `true` when the file was saved.
    pub async fn download(&self, sink: &dyn DownloadSink) -> bool {
        let Some(certificado) = self.certificado.as_ref().filter(|c| c.has_document()) else {
            self.toasts
                .error("Error", "No hay documento disponible para descargar");
            return false;
        };

        let data = match self.api.get_preview_blob(&certificado.document_path).await {
            Ok(data) => data,
            Err(err) => {
                tracing::error!(error = %err, certificado.id = certificado.id, "Failed to download PDF");
                self.toasts
                    .error("Error de Descarga", "No se pudo descargar el certificado");
                return false;
            }
        };

        let file_name = certificado.download_file_name();
        let url = ObjectUrl::create(&self.urls, data, PDF_CONTENT_TYPE);
        let saved = sink.save(&url, &file_name).await;
        drop(url);

        match saved {
            Ok(()) => {
                self.toasts.success(
                    "Descarga Exitosa",
                    "El certificado se ha descargado correctamente",
                );
                true
            }
            Err(err) => {
                tracing::error!(error = %err, file_name = %file_name, "Failed to save PDF");
                self.toasts
                    .error("Error de Descarga", "No se pudo descargar el certificado");
                false
            }
        }
    }
}

impl Drop for PdfPanel {
    fn drop(&mut self) {
        self.release_preview();
    }
}

/// Abandons its request on drop unless the response was fed back.
struct InFlight<'a> {
    panel: &'a mut PdfPanel,
    request: PreviewRequest,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.panel.abandon(&self.request);
        }
    }
}

fn identity(certificado: Option<&CertificadoResponse>) -> Option<(i64, &str)> {
    certificado.map(|c| (c.id, c.document_path.as_str()))
}
