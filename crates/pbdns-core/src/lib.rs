// # pbdns-core
//
// Core library for declarative DNS record synchronization against the
// Porkbun API.
//
// ## Architecture Overview
//
// - **Credentials**: API keys, endpoint and domain, loaded once from JSON
// - **RecordRow / RecordType / Action**: the declared records and the whitelist
// - **declaration**: reads the CSV list of desired records
// - **RecordTransport**: trait for delivering one request to the provider
// - **RecordSynchronizer**: turns rows into create/update/delete calls and
//   reports per-row outcomes
//
// ## Design Principles
//
// 1. **Linear**: one request per row, in file order, never in parallel
// 2. **Fail per row**: only configuration and declaration errors stop a run
// 3. **Gate before send**: record types are checked before any network call
// 4. **No secrets in logs**: payloads are redacted before they are logged
// 5. **Library-First**: the CLI is a thin layer over this crate

pub mod traits;
pub mod sync;
pub mod record;
pub mod declaration;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{ApiResponse, RecordTransport};
pub use sync::{BatchReport, FailureKind, OperationResult, RecordSynchronizer, redact_payload};
pub use record::{Action, RecordRow, RecordType};
pub use config::{Credentials, DEFAULT_CREDENTIALS_PATH};
pub use error::{Error, Result};
