//! Test doubles and common utilities for synchronizer contract tests
//!
//! This module provides a recording transport and a log capture writer.
//! Neither talks to the network.

#![allow(dead_code)]

use pbdns_core::error::{Error, Result};
use pbdns_core::traits::{ApiResponse, RecordTransport};
use pbdns_core::{Credentials, RecordSynchronizer};
use serde_json::Value;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const API_KEY: &str = "pk1_do_not_log_me";
pub const SECRET_KEY: &str = "sk1_do_not_log_me_either";
pub const ENDPOINT: &str = "https://api.porkbun.test/api/json/v3/dns";
pub const DOMAIN: &str = "example.com";

/// Credentials shared by every test
pub fn test_credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY, ENDPOINT, DOMAIN).expect("test credentials are valid")
}

/// One request seen by the mock transport
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub body: Value,
}

/// Scripted reply for the next request
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str),
    ConnectionRefused,
}

/// A mock RecordTransport that records calls and plays scripted replies
///
/// Once the script runs out every request gets `200 {"status":"SUCCESS"}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    script: Arc<Mutex<VecDeque<Reply>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies, consumed one per request in order
    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let transport = Self::new();
        transport.script.lock().unwrap().extend(replies);
        transport
    }

    /// Get the number of requests made
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Get every request made, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Build a synchronizer over a transport sharing this one's counters
    pub fn synchronizer(&self) -> RecordSynchronizer {
        RecordSynchronizer::new(test_credentials(), Box::new(self.clone()))
    }
}

#[async_trait::async_trait]
impl RecordTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            body: body.clone(),
        });

        match self.script.lock().unwrap().pop_front() {
            None => Ok(ApiResponse::new(200, r#"{"status":"SUCCESS"}"#)),
            Some(Reply::Status(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Reply::ConnectionRefused) => Err(Error::transport(
                "error sending request: Connection refused (os error 111)",
            )),
        }
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// In-memory log sink for asserting on emitted log lines
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Lines emitted at ERROR level
    pub fn error_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains("ERROR"))
            .map(str::to_string)
            .collect()
    }

    /// Run `fut` to completion with this capture as the default subscriber
    pub fn run<F: std::future::Future>(&self, fut: F) -> F::Output {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime builds")
                .block_on(fut)
        })
    }
}

impl Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
