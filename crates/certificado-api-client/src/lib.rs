//! HTTP client for the certificado backend.
//!
//! Provides a thin client over the certificate resource and the file download
//! service, with generic GET/POST/PATCH helpers and the domain operations in
//! [`api`]. Views depend on the [`CertificadoApi`] trait rather than on the
//! concrete client.

pub mod api;
pub mod error;

use anyhow::{Context, Result};
use bytes::Bytes;
use certificado_core::ClientConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub use api::CertificadoApi;
pub use error::{ApiError, ApiResult};

/// HTTP client for the certificado backend.
///
/// Requests are issued once: no retries, no timeout, no caching.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Create client from environment: CERTIFICADO_API_URL, CERTIFICADO_DOWNLOAD_URL.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL under the certificate resource; `path` is appended verbatim.
    pub fn certificados_url(&self, path: &str) -> String {
        format!("{}{}", self.config.certificados_url, path)
    }

    /// URL under the file download service.
    pub fn download_url(&self, path: &str) -> String {
        format!("{}{}", self.config.download_url, path)
    }

    /// Send a request and turn any non-2xx answer into [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(url, error = %err, "Request failed before a response was received");
            ApiError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = ApiError::from_status(url, status.as_u16(), error_text);
            if err.is_client_error() {
                tracing::debug!(url, status = status.as_u16(), "Backend rejected request");
            } else {
                tracing::warn!(url, status = status.as_u16(), "Backend request failed");
            }
            return Err(err);
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.send(self.client.get(url), url).await?;
        Self::read_json(response).await
    }

    /// GET request returning the raw body, optionally with an `Accept` header.
    pub async fn get_bytes(&self, url: &str, accept: Option<&str>) -> ApiResult<Bytes> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }

        let response = self.send(request, url).await?;
        Ok(response.bytes().await?)
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.send(self.client.patch(url).json(body), url).await?;
        Self::read_json(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let response = self.send(self.client.post(url).multipart(form), url).await?;
        Self::read_json(response).await
    }
}

// Re-export domain response types for convenience.
pub use certificado_core::models::{CertificadoResponse, PreviewUrlResponse};
