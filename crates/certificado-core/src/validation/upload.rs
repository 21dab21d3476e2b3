use crate::format::format_file_size;
use crate::models::LocalFile;

/// 10 MB, the limit applied by both upload screens.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

fn human_size(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// Client-side rejection of a selected file. Never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Tipo de archivo no soportado: {extension} (permitidos: {})", .allowed.join(", "))]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("El archivo es demasiado grande ({}). El tamaño máximo permitido es {}.", human_size(.size), human_size(.max))]
    FileTooLarge { size: u64, max: u64 },

    #[error("Archivo sin extensión: {0}")]
    MissingExtension(String),
}

/// Allow-list of extensions plus a maximum size for a given upload screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    max_size_bytes: u64,
}

impl UploadPolicy {
    /// Extensions are compared case-insensitively; the leading dot is optional.
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        Self {
            allowed_extensions,
            max_size_bytes,
        }
    }

    /// Certificate and key material accepted by the list screen.
    pub fn certificate_files() -> Self {
        Self::new(
            [".pem", ".crt", ".cer", ".p12", ".pfx", ".key"],
            DEFAULT_MAX_UPLOAD_BYTES,
        )
    }

    /// Batch sheets accepted by the standalone upload screen.
    pub fn batch_sheets() -> Self {
        Self::new([".csv", ".xlsx", ".xls"], DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn validate_extension(&self, file: &LocalFile) -> Result<(), ValidationError> {
        let extension = file
            .extension()
            .ok_or_else(|| ValidationError::MissingExtension(file.name.clone()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_size(&self, file: &LocalFile) -> Result<(), ValidationError> {
        let size = file.size();
        if size > self.max_size_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_size_bytes,
            });
        }
        Ok(())
    }

    /// Extension first, then size.
    pub fn validate(&self, file: &LocalFile) -> Result<(), ValidationError> {
        self.validate_extension(file)?;
        self.validate_size(file)?;
        Ok(())
    }
}
