use serde::{Deserialize, Deserializer, Serialize};

/// Certificate record as returned by the backend.
///
/// The backend is the only writer; the client never edits these fields.
/// String fields sent as `null` (or omitted) are read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificadoResponse {
    pub id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub code: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub maternal_last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub paternal_last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub grouping: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub certification: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub valid_until: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub expired: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pdf: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub assignment: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub observations: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub document_path: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub error_log: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub creation_date: String,
    #[serde(deserialize_with = "null_as_zero")]
    pub download_status_id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub download_status_name: String,
}

impl CertificadoResponse {
    /// Given name followed by both last names, skipping blanks.
    pub fn full_name(&self) -> String {
        [
            self.name.as_str(),
            self.paternal_last_name.as_str(),
            self.maternal_last_name.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn has_document(&self) -> bool {
        !self.document_path.trim().is_empty()
    }

    /// File name offered when the PDF is downloaded.
    ///
    /// Path separators in the code are replaced with `_` so the result is
    /// always a single file name.
    pub fn download_file_name(&self) -> String {
        let code = self.code.trim();
        if code.is_empty() {
            format!("certificado_{}.pdf", self.id)
        } else {
            format!("certificado_{}.pdf", code.replace(['/', '\\'], "_"))
        }
    }
}

/// Body of `PATCH /certificados/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Response of `GET /preview-url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewUrlResponse {
    pub url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}
