//! Record synchronizer
//!
//! The RecordSynchronizer is responsible for:
//! - Gating every row on the record type whitelist
//! - Building the per-operation payload and URL
//! - Sending exactly one request per row, in file order
//! - Classifying the response and logging the outcome without credentials
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Declaration file │─── Vec<RecordRow> ───┐
//! └──────────────────┘                      │
//!                                           ▼
//!                                ┌────────────────────┐
//!                                │ RecordSynchronizer │◄── Credentials
//!                                └────────────────────┘
//!                                           │
//!              ┌────────────────────────────┼──────────────────────┐
//!              │                            │                      │
//!              ▼                            ▼                      ▼
//!      ┌──────────────┐          ┌──────────────────┐     ┌────────────────┐
//!      │ Type gate    │          │ RecordTransport  │     │ OperationResult│
//!      │ (no network) │          │ (one POST / row) │     │ (log + report) │
//!      └──────────────┘          └──────────────────┘     └────────────────┘
//! ```
//!
//! ## Provider Endpoints
//!
//! | Action | URL                                                  | Body fields         |
//! |--------|------------------------------------------------------|---------------------|
//! | create | `{endpoint}/create/{domain}`                         | type, name, content |
//! | update | `{endpoint}/editByNameType/{domain}/{type}/{host}`   | content             |
//! | delete | `{endpoint}/deleteByNameType/{domain}/{type}/{host}` | (none)              |
//!
//! Every body also carries `apikey` and `secretapikey`. `{host}` is
//! percent-encoded as a single path segment.
//!
//! ## Failure Model
//!
//! No per-row failure stops the batch. Invalid types are rejected before the
//! transport is touched; transport and provider failures are recorded on the
//! row's [`OperationResult`] and the next row is attempted.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::config::Credentials;
use crate::declaration;
use crate::error::{Error, Result};
use crate::record::{Action, RecordRow, RecordType};
use crate::traits::RecordTransport;

/// Payload keys holding credentials. Stripped before anything is logged.
pub const CREDENTIAL_FIELDS: [&str; 2] = ["apikey", "secretapikey"];

/// Return a copy of `payload` with every credential field removed
pub fn redact_payload(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !CREDENTIAL_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Why a row failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Record type outside the whitelist; nothing was sent
    InvalidType,
    /// No response obtained from the provider
    Transport,
    /// Provider answered with a status other than 200
    Provider,
}

/// Outcome of a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// The row as declared
    pub row: RecordRow,
    /// Action that was attempted
    pub action: Action,
    /// Whether the provider accepted the change
    pub success: bool,
    /// HTTP status, if a response was received
    pub status_code: Option<u16>,
    /// Provider message, or the local error description when nothing was received
    pub provider_message: String,
    /// Failure classification; `None` on success
    pub failure: Option<FailureKind>,
}

impl OperationResult {
    fn succeeded(row: RecordRow, action: Action, status: u16, message: String) -> Self {
        Self {
            row,
            action,
            success: true,
            status_code: Some(status),
            provider_message: message,
            failure: None,
        }
    }

    fn failed(
        row: RecordRow,
        action: Action,
        kind: FailureKind,
        status_code: Option<u16>,
        message: String,
    ) -> Self {
        Self {
            row,
            action,
            success: false,
            status_code,
            provider_message: message,
            failure: Some(kind),
        }
    }
}

/// Ordered results of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    action: Action,
    results: Vec<OperationResult>,
}

impl BatchReport {
    /// Assemble a report from per-row results, in row order
    pub fn new(action: Action, results: Vec<OperationResult>) -> Self {
        Self { action, results }
    }

    /// Action the batch was run with
    pub fn action(&self) -> Action {
        self.action
    }

    /// Per-row results, in row order
    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }

    /// Consume the report, returning the per-row results
    pub fn into_results(self) -> Vec<OperationResult> {
        self.results
    }

    /// Number of rows processed
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch had no rows
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Rows accepted by the provider
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Rows that failed for any reason, including rejections
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Rows rejected by the type whitelist
    pub fn rejected(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.failure == Some(FailureKind::InvalidType))
            .count()
    }

    /// True when every row succeeded (vacuously true for an empty batch)
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Applies declared records to the provider
///
/// Holds the credentials read-only and a transport; nothing else. Each
/// operation is independent of every other.
pub struct RecordSynchronizer {
    credentials: Credentials,
    transport: Box<dyn RecordTransport>,
}

impl std::fmt::Debug for RecordSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSynchronizer")
            .field("credentials", &self.credentials)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl RecordSynchronizer {
    /// Create a new synchronizer
    ///
    /// # Parameters
    ///
    /// - `credentials`: Provider credentials and addressing
    /// - `transport`: Transport used to reach the provider
    pub fn new(credentials: Credentials, transport: Box<dyn RecordTransport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    /// Credentials this synchronizer was built with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Check a declared record type against the whitelist
    ///
    /// This is the gate every row passes before any network call.
    pub fn validate_type(record_type: &str) -> Result<RecordType> {
        record_type.parse()
    }

    /// Whether a declared record type is whitelisted
    pub fn is_valid_type(record_type: &str) -> bool {
        Self::validate_type(record_type).is_ok()
    }

    /// Create a record
    ///
    /// ```http
    /// POST {endpoint}/create/{domain}
    /// { "apikey", "secretapikey", "type", "name", "content" }
    /// ```
    pub async fn create(
        &self,
        host: &str,
        record_type: RecordType,
        content: &str,
    ) -> OperationResult {
        let row = RecordRow::new(host, record_type.as_str(), content);
        self.execute(Action::Create, row, record_type).await
    }

    /// Replace the content of the records matching (host, type)
    ///
    /// ```http
    /// POST {endpoint}/editByNameType/{domain}/{type}/{host}
    /// { "apikey", "secretapikey", "content" }
    /// ```
    pub async fn update(
        &self,
        host: &str,
        record_type: RecordType,
        content: &str,
    ) -> OperationResult {
        let row = RecordRow::new(host, record_type.as_str(), content);
        self.execute(Action::Update, row, record_type).await
    }

    /// Delete the records matching (host, type)
    ///
    /// ```http
    /// POST {endpoint}/deleteByNameType/{domain}/{type}/{host}
    /// { "apikey", "secretapikey" }
    /// ```
    pub async fn delete(&self, host: &str, record_type: RecordType) -> OperationResult {
        let row = RecordRow::new(host, record_type.as_str(), "");
        self.execute(Action::Delete, row, record_type).await
    }

    /// Apply `action` to a single declared row
    ///
    /// Rows with a type outside the whitelist are rejected here and never
    /// reach the transport.
    pub async fn apply_row(&self, row: &RecordRow, action: Action) -> OperationResult {
        match Self::validate_type(&row.record_type) {
            Ok(record_type) => self.execute(action, row.clone(), record_type).await,
            Err(e) => {
                error!("Rejected {} of record {}: {}", action, row.host, e);
                OperationResult::failed(
                    row.clone(),
                    action,
                    FailureKind::InvalidType,
                    None,
                    e.to_string(),
                )
            }
        }
    }

    /// Apply `action` to every row, strictly in order
    ///
    /// Every row is attempted regardless of earlier failures.
    pub async fn apply_batch(&self, rows: &[RecordRow], action: Action) -> BatchReport {
        info!("Applying {} to {} record(s)", action, rows.len());

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(self.apply_row(row, action).await);
        }

        let report = BatchReport::new(action, results);
        if report.all_succeeded() {
            info!(
                "Batch {} finished: {} succeeded",
                action,
                report.succeeded()
            );
        } else {
            warn!(
                "Batch {} finished: {} succeeded, {} failed ({} rejected before sending)",
                action,
                report.succeeded(),
                report.failed(),
                report.rejected()
            );
        }
        report
    }

    /// Load a declaration file and apply `action` to its rows
    ///
    /// # Errors
    ///
    /// `Error::DeclarationFile` if the file cannot be loaded; in that case
    /// nothing is sent and exactly one error is logged.
    pub async fn apply_file(&self, path: impl AsRef<Path>, action: Action) -> Result<BatchReport> {
        let rows = match declaration::load_rows(path).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };

        Ok(self.apply_batch(&rows, action).await)
    }

    async fn execute(&self, action: Action, row: RecordRow, record_type: RecordType) -> OperationResult {
        let (url, payload) = match action {
            Action::Create => (
                format!(
                    "{}/create/{}",
                    self.credentials.endpoint(),
                    self.credentials.domain()
                ),
                self.payload(&[
                    ("type", record_type.as_str()),
                    ("name", row.host.as_str()),
                    ("content", row.answer.as_str()),
                ]),
            ),
            Action::Update => (
                format!(
                    "{}/editByNameType/{}/{}/{}",
                    self.credentials.endpoint(),
                    self.credentials.domain(),
                    record_type,
                    urlencoding::encode(&row.host)
                ),
                self.payload(&[("content", row.answer.as_str())]),
            ),
            Action::Delete => (
                format!(
                    "{}/deleteByNameType/{}/{}/{}",
                    self.credentials.endpoint(),
                    self.credentials.domain(),
                    record_type,
                    urlencoding::encode(&row.host)
                ),
                self.payload(&[]),
            ),
        };

        self.call_api(action, row, &url, &payload).await
    }

    /// Build a request body: credentials plus the operation's fields
    fn payload(&self, fields: &[(&str, &str)]) -> Value {
        let mut map = Map::new();
        map.insert(
            "apikey".to_string(),
            Value::String(self.credentials.api_key().to_string()),
        );
        map.insert(
            "secretapikey".to_string(),
            Value::String(self.credentials.secret_key().to_string()),
        );
        for (key, value) in fields {
            map.insert((*key).to_string(), Value::String((*value).to_string()));
        }
        Value::Object(map)
    }

    async fn call_api(
        &self,
        action: Action,
        row: RecordRow,
        url: &str,
        payload: &Value,
    ) -> OperationResult {
        let logged = redact_payload(payload);
        debug!("POST {} via {}", url, self.transport.transport_name());

        match self.transport.post_json(url, payload).await {
            Ok(response) if response.is_success() => {
                let message = response.provider_message();
                info!(
                    "Record {}: {} {} {} [{}] {}",
                    action.past_tense(),
                    row.host,
                    row.record_type,
                    row.answer,
                    message,
                    logged
                );
                OperationResult::succeeded(row, action, response.status, message)
            }
            Ok(response) => {
                let err = Error::provider(response.status, response.provider_message());
                error!("Failed to {} record {}: {} {}", action, row.host, err, logged);
                OperationResult::failed(
                    row,
                    action,
                    FailureKind::Provider,
                    Some(response.status),
                    response.provider_message(),
                )
            }
            Err(e) => {
                error!("Failed to {} record {}: {} {}", action, row.host, e, logged);
                OperationResult::failed(row, action, FailureKind::Transport, None, e.to_string())
            }
        }
    }
}
