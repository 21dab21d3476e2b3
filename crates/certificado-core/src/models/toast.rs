use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Transient notification shown by a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Time-ordered id; unique in practice, not guaranteed.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub duration_ms: u64,
}

impl Toast {
    pub fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            kind,
            title: title.into(),
            message: message.into(),
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_defaults() {
        let toast = Toast::success("PDF Cargado", "El documento se ha cargado correctamente");
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.duration(), Duration::from_millis(5000));
        assert!(!toast.id.is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        let first = Toast::info("a", "b");
        let second = Toast::info("a", "b");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_serialized_kind_is_lowercase() {
        let toast = Toast::warning("Archivo", "no soportado").with_duration(Duration::from_secs(2));
        let value = serde_json::to_value(&toast).unwrap();
        assert_eq!(value["type"], "warning");
        assert_eq!(value["duration_ms"], 2000);
    }
}
