//! Credential loading
//!
//! The credential file is a small JSON document:
//!
//! ```json
//! {
//!   "apikey": "pk1_...",
//!   "secretapikey": "sk1_...",
//!   "endpoint": "https://api.porkbun.com/api/json/v3/dns",
//!   "domain": "example.com"
//! }
//! ```
//!
//! It is read once at startup. A missing or malformed file is fatal.

use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::error::{Error, Result};

/// Default location of the credential file, relative to the working directory
pub const DEFAULT_CREDENTIALS_PATH: &str = ".env/base.json";

/// Provider credentials and addressing
///
/// Immutable after load. Shared read-only by every operation of a batch.
///
/// # Security
///
/// The Debug implementation does NOT expose either key.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Provider API key
    /// ⚠️ NEVER log this value
    #[serde(rename = "apikey")]
    api_key: String,

    /// Provider secret API key
    /// ⚠️ NEVER log this value
    #[serde(rename = "secretapikey")]
    secret_key: String,

    /// Base URL of the provider's DNS API
    endpoint: String,

    /// Zone the records belong to
    domain: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("domain", &self.domain)
            .finish()
    }
}

impl Credentials {
    /// Build credentials directly, validating them the same way [`load`] does
    ///
    /// [`load`]: Credentials::load
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        endpoint: impl Into<String>,
        domain: impl Into<String>,
    ) -> Result<Self> {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            endpoint: endpoint.into(),
            domain: domain.into(),
        }
        .normalized()
    }

    /// Load credentials from a JSON file
    ///
    /// # Errors
    ///
    /// `Error::Config` if the file does not exist, cannot be read, is not
    /// valid JSON, lacks one of the four fields, or fails validation.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).await.map_err(|e| {
            Error::config(format!(
                "Secrets file {} could not be read: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&raw).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("Secrets file {}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse credentials from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(raw)
            .map_err(|e| Error::config(format!("malformed credentials: {}", e)))?;
        parsed.normalized()
    }

    fn normalized(mut self) -> Result<Self> {
        self.api_key = self.api_key.trim().to_string();
        self.secret_key = self.secret_key.trim().to_string();
        self.domain = self.domain.trim().trim_end_matches('.').to_string();
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();

        self.validate()?;
        Ok(self)
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config("apikey cannot be empty"));
        }
        if self.secret_key.is_empty() {
            return Err(Error::config("secretapikey cannot be empty"));
        }
        if self.domain.is_empty() {
            return Err(Error::config("domain cannot be empty"));
        }
        if self.endpoint.is_empty() {
            return Err(Error::config("endpoint cannot be empty"));
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(Error::config(format!(
                "endpoint must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Provider API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Provider secret API key
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Base URL of the provider API, without a trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Managed domain
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
