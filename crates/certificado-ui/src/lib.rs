//! Headless view models for the certificado admin screens.
//!
//! Each screen is a plain struct holding the state a renderer needs and one
//! method per user interaction. Network calls go through
//! [`certificado_api_client::CertificadoApi`]; notifications go through a
//! shared [`ToastQueue`].

pub mod list_view;
pub mod navigation;
pub mod object_url;
pub mod pdf_panel;
pub mod toast;
pub mod upload_view;

#[cfg(test)]
pub(crate) mod test_support;

pub use list_view::{filter_certificados, ListView, LoadState, UploadModal, UploadPhase};
pub use navigation::{NavLink, Route, NAV_LINKS};
pub use object_url::{
    BlobStore, DirectoryDownloads, DownloadSink, ObjectUrl, ObjectUrlStore, TrustedResourceUrl,
};
pub use pdf_panel::{PanelEvent, PdfPanel, PreviewRequest, PreviewState};
pub use toast::ToastQueue;
pub use upload_view::UploadView;

use certificado_api_client::ApiError;
use certificado_core::CertificadoResponse;

/// Result of submitting an upload from either screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Uploaded(CertificadoResponse),
    Failed(ApiError),
    /// Nothing was sent: no file selected, no name, or an upload already running.
    NotReady,
}
