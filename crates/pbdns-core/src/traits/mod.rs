//! Core traits for pbdns
//!
//! - [`RecordTransport`]: deliver one JSON request to the provider API

pub mod transport;

pub use transport::{ApiResponse, RecordTransport};
