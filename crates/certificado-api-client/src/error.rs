//! Error type returned by every client operation.
//!
//! Failures are surfaced as they happened: no retries, no rewriting of the
//! backend's answer. Views pick the text to show with [`ApiError::user_message`].

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, DNS, TLS...).
    #[error("Http failure: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Http failure response for {url}: {status}")]
    Status {
        url: String,
        status: u16,
        /// `message` field of a JSON error body, when present.
        message: Option<String>,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, extracting the backend's `message` field if the
    /// body is a JSON object carrying one.
    pub fn from_status(url: impl Into<String>, status: u16, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());

        ApiError::Status {
            url: url.into(),
            status,
            message,
            body,
        }
    }

    /// Most specific text available: the backend's message, then the generic
    /// transport description. `None` means the caller should use its own
    /// static fallback.
    pub fn user_message(&self) -> Option<String> {
        let text = match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status { .. } => self.to_string(),
            ApiError::Transport(text) | ApiError::Decode(text) => text.clone(),
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.user_message()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx responses: the request itself was rejected.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
