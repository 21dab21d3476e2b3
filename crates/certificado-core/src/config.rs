//! Configuration module
//!
//! The client only needs two base URLs: the certificate resource and the file
//! download service. Both can be overridden from the environment (or a `.env`
//! file) and default to the local development backend.

use std::env;

use anyhow::Context;

const DEFAULT_CERTIFICADOS_URL: &str = "http://localhost:8080/api/v1/certified-persons";
const DEFAULT_DOWNLOAD_URL: &str = "http://localhost:8080/api/v1/download";

/// Base URLs of the remote certificate backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Certificate resource, e.g. `http://host/api/v1/certified-persons`.
    pub certificados_url: String,
    /// File service used for PDF previews, e.g. `http://host/api/v1/download`.
    pub download_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CERTIFICADOS_URL, DEFAULT_DOWNLOAD_URL)
    }
}

impl ClientConfig {
    pub fn new(certificados_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            certificados_url: normalize_base(certificados_url.into()),
            download_url: normalize_base(download_url.into()),
        }
    }

    /// Read `CERTIFICADO_API_URL` and `CERTIFICADO_DOWNLOAD_URL`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let certificados_url = env::var("CERTIFICADO_API_URL")
            .unwrap_or_else(|_| DEFAULT_CERTIFICADOS_URL.to_string());
        let download_url = env::var("CERTIFICADO_DOWNLOAD_URL")
            .unwrap_or_else(|_| DEFAULT_DOWNLOAD_URL.to_string());

        let config = Self::new(certificados_url, download_url);
        config
            .validate()
            .context("Invalid certificado client configuration")?;

        tracing::debug!(
            certificados_url = %config.certificados_url,
            download_url = %config.download_url,
            "Loaded client configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, value) in [
            ("CERTIFICADO_API_URL", &self.certificados_url),
            ("CERTIFICADO_DOWNLOAD_URL", &self.download_url),
        ] {
            if value.is_empty() {
                return Err(anyhow::anyhow!("{} must not be empty", name));
            }
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "{} must be an http:// or https:// URL, got '{}'",
                    name,
                    value
                ));
            }
        }
        Ok(())
    }
}

fn normalize_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
