//! Validation modules

pub mod upload;

pub use upload::{UploadPolicy, ValidationError, DEFAULT_MAX_UPLOAD_BYTES};
