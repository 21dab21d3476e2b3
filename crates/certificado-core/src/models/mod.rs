pub mod certificado;
pub mod toast;
pub mod upload;

pub use certificado::{CertificadoResponse, PreviewUrlResponse, UpdateStatusRequest};
pub use toast::{Toast, ToastKind, DEFAULT_TOAST_DURATION_MS};
pub use upload::LocalFile;
