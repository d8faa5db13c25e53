//! Contract Test: Present
//!
//! Constraints verified:
//! - A missing record set is created with exactly the quoted key and TTL 60
//! - Present is idempotent: repeating it never duplicates the value
//! - Present is additive: unrelated values in the set are preserved in order
//! - Query errors other than "not found" abort before any write
//! - Create/update errors are surfaced unchanged

mod common;

use common::*;
use dns01_core::memory::{MemoryRecordApi, Operation, RecordCall};
use dns01_core::{Error, ReconcileOutcome};

#[tokio::test]
async fn present_twice_yields_single_value() {
    let api = MemoryRecordApi::new();
    let solver = solver(&api);

    let first = solver.present(&challenge("k1")).await.unwrap();
    assert_eq!(first, ReconcileOutcome::Created);
    assert_eq!(stored_records(&api), Some(vec!["\"k1\"".to_string()]));

    let second = solver.present(&challenge("k1")).await.unwrap();
    assert_eq!(
        second,
        ReconcileOutcome::Unchanged {
            records: vec!["\"k1\"".to_string()]
        }
    );
    assert_eq!(stored_records(&api), Some(vec!["\"k1\"".to_string()]));
}

#[tokio::test]
async fn created_set_has_ttl_60() {
    let api = MemoryRecordApi::new();
    solver(&api).present(&challenge("k1")).await.unwrap();

    let set = api.record_set("example.com", "_acme-challenge", "TXT").unwrap();
    assert_eq!(set.ttl, Some(60));
    assert_eq!(set.record_type, "TXT");
}

#[tokio::test]
async fn present_appends_to_existing_values() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\""]));

    let outcome = solver(&api).present(&challenge("b")).await.unwrap();

    let expected = vec!["\"a\"".to_string(), "\"b\"".to_string()];
    assert_eq!(outcome, ReconcileOutcome::Appended { records: expected.clone() });
    assert_eq!(stored_records(&api), Some(expected));
}

#[tokio::test]
async fn present_does_not_duplicate_existing_value() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\"", "\"b\""]));

    solver(&api).present(&challenge("b")).await.unwrap();

    // The unchanged list is still written back
    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        RecordCall::Update {
            domain: "example.com".to_string(),
            subname: "_acme-challenge".to_string(),
            records: vec!["\"a\"".to_string(), "\"b\"".to_string()],
        }
    );
    assert_eq!(stored_records(&api).unwrap().len(), 2);
}

#[tokio::test]
async fn raw_key_in_set_does_not_count_as_present() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["b"]));

    solver(&api).present(&challenge("b")).await.unwrap();

    assert_eq!(
        stored_records(&api),
        Some(vec!["b".to_string(), "\"b\"".to_string()])
    );
}

#[tokio::test]
async fn query_failure_aborts_without_write() {
    let api = MemoryRecordApi::new();
    api.fail_on(Operation::Get);

    let err = solver(&api).present(&challenge("k1")).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert_eq!(api.calls().len(), 1, "only the failed read may be issued");
}

#[tokio::test]
async fn create_failure_is_surfaced() {
    let api = MemoryRecordApi::new();
    api.fail_on(Operation::Create);

    let err = solver(&api).present(&challenge("k1")).await.unwrap_err();

    assert!(err.to_string().contains("injected Create failure"));
    assert_eq!(api.calls().len(), 2, "no retry after a failed create");
}

#[tokio::test]
async fn update_failure_is_surfaced() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\""]));
    api.fail_on(Operation::Update);

    let err = solver(&api).present(&challenge("b")).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert_eq!(api.calls().len(), 2);
    assert_eq!(stored_records(&api), Some(vec!["\"a\"".to_string()]));
}

#[tokio::test]
async fn subdomain_challenges_share_nothing_but_the_zone() {
    let api = MemoryRecordApi::new();
    let solver = solver(&api);

    solver
        .present(&challenge_at("_acme-challenge.sub.example.com.", "example.com.", "k1"))
        .await
        .unwrap();

    assert!(api.record_set("example.com", "_acme-challenge.sub", "TXT").is_some());
    assert!(api.record_set("example.com", "_acme-challenge", "TXT").is_none());
}
