// # HTTP Transport
//
// This crate provides the reqwest-based RecordTransport for pbdns.
//
// ## Behavior
//
// - ✅ One POST per call, JSON body, no retries
// - ✅ Any HTTP response is returned as-is (status + body); classification is
//   left to the synchronizer
// - ✅ Connection-level failures map to `Error::Transport`
// - ✅ A body that cannot be read keeps its status, with an empty body
// - ✅ HTTP timeout configured (30 seconds). reqwest has no timeout by
//   default; an expired timeout is a transport failure for that row
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry or backoff
// - ❌ NO logging of request bodies (they carry credentials)
//
// ## Dry-Run Mode
//
// When `dry_run` is true, nothing is sent. The intended URL and the payload,
// stripped of credentials, are logged, and a synthetic
// `200 {"status":"SUCCESS"}` is returned so the batch proceeds as if every
// request had been accepted.

use async_trait::async_trait;
use pbdns_core::traits::{ApiResponse, RecordTransport};
use pbdns_core::{Error, Result, redact_payload};
use serde_json::Value;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
const USER_AGENT: &str = concat!("pbdns/", env!("CARGO_PKG_VERSION"));

/// Body returned for every request in dry-run mode
const DRY_RUN_BODY: &str = r#"{"status":"SUCCESS","message":"dry-run: request not sent"}"#;

/// HTTP transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, log requests instead of sending them
    dry_run: bool,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Errors
    ///
    /// `Error::Config` if the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(dry_run: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, dry_run))
    }

    /// Create a new HTTP transport (live mode)
    pub fn new_live() -> Result<Self> {
        Self::new(false)
    }

    /// Create a new HTTP transport (dry-run mode)
    pub fn new_dry_run() -> Result<Self> {
        Self::new(true)
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Whether requests are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                redact_payload(body)
            );
            return Ok(ApiResponse::new(200, DRY_RUN_BODY));
        }

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        // The status is already known; a broken body only loses the message
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read response body from {}: {}", url, e);
                String::new()
            }
        };

        tracing::debug!("POST {} -> {}", url, status);
        Ok(ApiResponse::new(status, text))
    }

    fn transport_name(&self) -> &'static str {
        if self.dry_run { "http (dry-run)" } else { "http" }
    }
}
