//! Application settings loaded via OrthoConfig.
//!
//! Every field can be given as a `--kebab-case` flag or a `NOTES_*`
//! environment variable. Endpoints and credentials without a sensible default
//! are optional here and checked by the accessors at startup.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::generation::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::outbound::identity::DEFAULT_TOKENINFO_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_PROMPT: &str = "Turn this document into concise, well-structured study notes in \
     Markdown. Use headings for sections and bullet points for key facts.";

/// A required setting is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Runtime configuration for the notes service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_size: u32,
    /// Bucket receiving uploaded documents.
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible stores.
    pub s3_endpoint: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    /// Instruction sent to the model with every document.
    pub prompt: Option<String>,
    /// Credits granted on first sign-in.
    #[ortho_config(default = 10)]
    pub initial_credits: u32,
    /// Lifetime of presigned upload URLs.
    #[ortho_config(default = 300)]
    pub upload_ttl_secs: u64,
    /// Timeout for calls to the model and the identity provider.
    #[ortho_config(default = 60)]
    pub http_timeout_secs: u64,
    /// OAuth client id that ID tokens must be issued for.
    pub google_client_id: Option<String>,
    pub tokeninfo_url: Option<String>,
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::Missing { name })
}

impl AppSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            name: "bind_addr",
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(&self.database_url, "database_url")
    }

    pub fn s3_bucket(&self) -> Result<&str, SettingsError> {
        required(&self.s3_bucket, "s3_bucket")
    }

    pub fn s3_region(&self) -> &str {
        self.s3_region.as_deref().unwrap_or(DEFAULT_S3_REGION)
    }

    pub fn gemini_api_key(&self) -> Result<&str, SettingsError> {
        required(&self.gemini_api_key, "gemini_api_key")
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_base_url(&self) -> &str {
        self.gemini_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    pub fn prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PROMPT)
    }

    pub fn google_client_id(&self) -> Result<&str, SettingsError> {
        required(&self.google_client_id, "google_client_id")
    }

    pub fn tokeninfo_url(&self) -> &str {
        self.tokeninfo_url.as_deref().unwrap_or(DEFAULT_TOKENINFO_URL)
    }

    pub fn upload_ttl(&self) -> Duration {
        Duration::from_secs(self.upload_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
