// # Record Transport Trait
//
// Defines the interface between the synchronizer and the provider's HTTP API.
//
// ## Implementations
//
// - reqwest: `pbdns-http` crate (live and dry-run)
// - Test doubles: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use pbdns_core::RecordTransport;
//
// let response = transport
//     .post_json("https://api.porkbun.com/api/json/v3/dns/create/example.com", &payload)
//     .await?;
//
// if response.is_success() {
//     // ...
// }
// ```

use async_trait::async_trait;
use serde_json::Value;

/// Raw provider response
///
/// Classification (success or failure) is left to the synchronizer; the
/// transport only reports what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, undecoded
    pub body: String,
}

impl ApiResponse {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The provider signals success with exactly 200; anything else is a failure
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Human-readable message from the body
    ///
    /// Taken from the JSON `message` field, else the JSON `status` field,
    /// else the raw body text.
    pub fn provider_message(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(json) => json
                .get("message")
                .or_else(|| json.get("status"))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| json.to_string()),
            Err(_) => self.body.trim().to_string(),
        }
    }
}

/// Trait for transport implementations
///
/// # Contract
///
/// - One call = one request. No retries, no batching.
/// - `Ok` for every response the provider sends, whatever its status.
/// - `Err(Error::Transport)` only when no response was obtained
///   (connection refused, DNS failure, reset, timeout).
/// - Never log the request body: it carries credentials.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// POST a JSON body to `url`
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_200_is_success() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(!ApiResponse::new(201, "").is_success());
        assert!(!ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(400, "").is_success());
        assert!(!ApiResponse::new(503, "").is_success());
    }

    #[test]
    fn test_provider_message_prefers_message_field() {
        let resp = ApiResponse::new(
            400,
            r#"{"status":"ERROR","message":"Invalid type."}"#,
        );
        assert_eq!(resp.provider_message(), "Invalid type.");
    }

    #[test]
    fn test_provider_message_falls_back_to_status() {
        let resp = ApiResponse::new(200, r#"{"status":"SUCCESS","id":"1234"}"#);
        assert_eq!(resp.provider_message(), "SUCCESS");
    }

    #[test]
    fn test_provider_message_non_json_body() {
        let resp = ApiResponse::new(502, "<html>Bad Gateway</html>\n");
        assert_eq!(resp.provider_message(), "<html>Bad Gateway</html>");
    }
}
