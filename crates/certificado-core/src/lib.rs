//! Certificado Core Library
//!
//! This crate provides the domain models, display formatters, configuration and
//! upload validation shared by the API client and the view models.

pub mod config;
pub mod format;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use format::{format_date, format_download_status, format_file_size};
pub use models::{CertificadoResponse, LocalFile, PreviewUrlResponse, Toast, ToastKind};
pub use validation::{UploadPolicy, ValidationError};
