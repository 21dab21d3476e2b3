use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

/// A file picked (or dropped) by the user, held in memory until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub data: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Load a file from disk, keeping only its file name.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("File has no usable name: {}", path.display()))?;

        Ok(Self::new(name, data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lower-cased extension including the dot (`".pem"`), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rfind('.')
            .map(|idx| self.name[idx..].to_lowercase())
    }

    /// File name without its last extension.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_and_stem() {
        let file = LocalFile::new("Servidor.Principal.CRT", vec![1, 2, 3]);
        assert_eq!(file.extension().as_deref(), Some(".crt"));
        assert_eq!(file.stem(), "Servidor.Principal");
        assert_eq!(file.size(), 3);
    }

    #[test]
    fn test_no_extension() {
        let file = LocalFile::new("README", Vec::new());
        assert_eq!(file.extension(), None);
        assert_eq!(file.stem(), "README");
    }

    #[test]
    fn test_dotfile_has_empty_stem() {
        let file = LocalFile::new(".pem", Vec::new());
        assert_eq!(file.extension().as_deref(), Some(".pem"));
        assert_eq!(file.stem(), "");
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lote.csv");
        std::fs::write(&path, b"code,name\nC001,Juan\n").unwrap();

        let file = LocalFile::read(&path).await.unwrap();

        assert_eq!(file.name, "lote.csv");
        assert_eq!(file.size(), 20);
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFile::read(dir.path().join("missing.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[tokio::test]
    async fn test_read_rejects_parent_dir() {
        let err = LocalFile::read("../secret.pem").await.unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }
}
