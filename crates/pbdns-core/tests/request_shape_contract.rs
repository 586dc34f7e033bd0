//! Contract Test: Request Shape
//!
//! Constraints verified:
//! - Exactly one request per valid row, in row order
//! - Each action hits its own URL template, with the host encoded as one segment
//! - Each body carries the credentials plus only the action's own fields
//!
//! If this test fails, the provider will receive requests it does not expect.

mod common;

use common::*;
use pbdns_core::{Action, RecordRow, RecordType};
use serde_json::json;

#[tokio::test]
async fn create_request() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    let result = sync.create("home", RecordType::A, "1.2.3.4").await;
    assert!(result.success);
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.action, Action::Create);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].url,
        "https://api.porkbun.test/api/json/v3/dns/create/example.com"
    );
    assert_eq!(
        calls[0].body,
        json!({
            "apikey": API_KEY,
            "secretapikey": SECRET_KEY,
            "type": "A",
            "name": "home",
            "content": "1.2.3.4",
        })
    );
}

#[tokio::test]
async fn update_request() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    let result = sync.update("www", RecordType::Cname, "example.net").await;
    assert!(result.success);

    let calls = transport.calls();
    assert_eq!(
        calls[0].url,
        "https://api.porkbun.test/api/json/v3/dns/editByNameType/example.com/CNAME/www"
    );
    assert_eq!(
        calls[0].body,
        json!({
            "apikey": API_KEY,
            "secretapikey": SECRET_KEY,
            "content": "example.net",
        })
    );
}

#[tokio::test]
async fn delete_request_carries_only_credentials() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    let report = sync
        .apply_batch(
            &[RecordRow::new("old.example.com", "CNAME", "")],
            Action::Delete,
        )
        .await;
    assert!(report.all_succeeded());

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].url,
        "https://api.porkbun.test/api/json/v3/dns/deleteByNameType/example.com/CNAME/old.example.com"
    );
    assert_eq!(
        calls[0].body,
        json!({ "apikey": API_KEY, "secretapikey": SECRET_KEY })
    );
}

#[tokio::test]
async fn host_is_a_single_path_segment() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    sync.apply_row(&RecordRow::new("a#b", "A", ""), Action::Delete)
        .await;
    let result = sync.update("x?y/z", RecordType::Txt, "v").await;

    let urls: Vec<String> = transport.calls().into_iter().map(|c| c.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/deleteByNameType/{}/A/a%23b", ENDPOINT, DOMAIN),
            format!("{}/editByNameType/{}/TXT/x%3Fy%2Fz", ENDPOINT, DOMAIN),
        ]
    );

    // The declared host is reported unchanged
    assert_eq!(result.row.host, "x?y/z");
}

#[tokio::test]
async fn delete_ignores_declared_answer() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    sync.apply_row(&RecordRow::new("mail", "MX", "10 mx.example.com"), Action::Delete)
        .await;

    let body = &transport.calls()[0].body;
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn one_request_per_row_in_order() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    let rows = vec![
        RecordRow::new("a", "A", "10.0.0.1"),
        RecordRow::new("b", "AAAA", "2001:db8::1"),
        RecordRow::new("c", "TXT", "hello"),
    ];

    let report = sync.apply_batch(&rows, Action::Update).await;

    let urls: Vec<String> = transport.calls().into_iter().map(|c| c.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/editByNameType/{}/A/a", ENDPOINT, DOMAIN),
            format!("{}/editByNameType/{}/AAAA/b", ENDPOINT, DOMAIN),
            format!("{}/editByNameType/{}/TXT/c", ENDPOINT, DOMAIN),
        ]
    );

    let reported: Vec<&RecordRow> = report.results().iter().map(|r| &r.row).collect();
    assert_eq!(reported, rows.iter().collect::<Vec<_>>());
}

#[tokio::test]
async fn empty_batch_sends_nothing() {
    let transport = MockTransport::new();
    let sync = transport.synchronizer();

    let report = sync.apply_batch(&[], Action::Create).await;

    assert!(report.is_empty());
    assert_eq!(transport.call_count(), 0);
}
