//! Domain operations of the certificado backend.
//!
//! `{certBase}` is [`ClientConfig::certificados_url`](certificado_core::ClientConfig)
//! and `{fileBase}` is its `download_url`.

use async_trait::async_trait;
use bytes::Bytes;
use certificado_core::models::{
    CertificadoResponse, LocalFile, PreviewUrlResponse, UpdateStatusRequest,
};

use crate::{ApiClient, ApiResult};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Operations the views need from the backend.
///
/// Each call issues exactly one request and reports failures unmodified.
#[async_trait]
pub trait CertificadoApi: Send + Sync {
    /// `POST {certBase}/batch` with multipart field `file`.
    async fn upload(&self, file: &LocalFile) -> ApiResult<CertificadoResponse>;

    /// `GET {certBase}/certificados/{id}`
    async fn get_by_id(&self, id: i64) -> ApiResult<CertificadoResponse>;

    /// `GET {certBase}`
    async fn get_all(&self) -> ApiResult<Vec<CertificadoResponse>>;

    /// `GET {certBase}/certificados/{id}/pdf`
    async fn get_pdf_blob(&self, id: i64) -> ApiResult<Bytes>;

    /// `PATCH {certBase}/certificados/{id}/status` with body `{"status": ...}`.
    async fn update_status(&self, id: i64, status: &str) -> ApiResult<CertificadoResponse>;

    /// `GET {fileBase}/preview?documentPath=...` accepting `application/pdf`.
    async fn get_preview_blob(&self, document_path: &str) -> ApiResult<Bytes>;

    /// `GET {certBase}/preview-url?documentPath=...`, returns the temporary URL.
    async fn get_preview_url(&self, document_path: &str) -> ApiResult<String>;
}

#[async_trait]
impl CertificadoApi for ApiClient {
    #[tracing::instrument(skip(self, file), fields(file.name = %file.name, file.size = file.size()))]
    async fn upload(&self, file: &LocalFile) -> ApiResult<CertificadoResponse> {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(file.data.to_vec()).file_name(file.name.clone()),
        );

        let record: CertificadoResponse = self
            .post_multipart(&self.certificados_url("/batch"), form)
            .await?;
        tracing::info!(certificado.id = record.id, "Certificate file uploaded");
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> ApiResult<CertificadoResponse> {
        self.get(&self.certificados_url(&format!("/certificados/{}", id)))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> ApiResult<Vec<CertificadoResponse>> {
        let records: Vec<CertificadoResponse> = self.get(&self.certificados_url("")).await?;
        tracing::debug!(count = records.len(), "Fetched certificates");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn get_pdf_blob(&self, id: i64) -> ApiResult<Bytes> {
        self.get_bytes(
            &self.certificados_url(&format!("/certificados/{}/pdf", id)),
            None,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: i64, status: &str) -> ApiResult<CertificadoResponse> {
        let body = UpdateStatusRequest {
            status: status.to_string(),
        };
        self.patch_json(
            &self.certificados_url(&format!("/certificados/{}/status", id)),
            &body,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_preview_blob(&self, document_path: &str) -> ApiResult<Bytes> {
        let url = self.download_url(&format!(
            "/preview?documentPath={}",
            urlencoding::encode(document_path)
        ));
        self.get_bytes(&url, Some(PDF_CONTENT_TYPE)).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_preview_url(&self, document_path: &str) -> ApiResult<String> {
        let url = self.certificados_url(&format!(
            "/preview-url?documentPath={}",
            urlencoding::encode(document_path)
        ));
        let response: PreviewUrlResponse = self.get(&url).await?;
        Ok(response.url)
    }
}
