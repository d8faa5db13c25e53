//! Contract Test: CleanUp
//!
//! Constraints verified:
//! - Only the targeted value is removed; other values keep their order
//! - An emptied set is deleted, never updated to an empty list
//! - A missing record set is an error (CleanUp runs after Present)
//! - Delete/update errors are surfaced unchanged

mod common;

use common::*;
use dns01_core::memory::{MemoryRecordApi, Operation, RecordCall};
use dns01_core::ReconcileOutcome;

#[tokio::test]
async fn cleanup_removes_only_target_value() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\"", "\"b\""]));

    let outcome = solver(&api).cleanup(&challenge("a")).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Shrunk {
            records: vec!["\"b\"".to_string()]
        }
    );
    assert_eq!(
        api.calls()[1],
        RecordCall::Update {
            domain: "example.com".to_string(),
            subname: "_acme-challenge".to_string(),
            records: vec!["\"b\"".to_string()],
        }
    );
}

#[tokio::test]
async fn cleanup_deletes_emptied_set() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\""]));

    let outcome = solver(&api).cleanup(&challenge("a")).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Deleted);
    assert_eq!(
        api.calls()[1],
        RecordCall::Delete {
            domain: "example.com".to_string(),
            subname: "_acme-challenge".to_string(),
        }
    );
    assert!(
        !api.calls().iter().any(|c| matches!(c, RecordCall::Update { .. })),
        "an emptied set must not be updated"
    );
    assert_eq!(stored_records(&api), None);
}

#[tokio::test]
async fn cleanup_removes_every_occurrence() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\"", "\"x\"", "\"a\""]));

    solver(&api).cleanup(&challenge("a")).await.unwrap();

    assert_eq!(stored_records(&api), Some(vec!["\"x\"".to_string()]));
}

#[tokio::test]
async fn cleanup_without_match_writes_set_back() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"x\""]));

    let outcome = solver(&api).cleanup(&challenge("a")).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Shrunk {
            records: vec!["\"x\"".to_string()]
        }
    );
}

#[tokio::test]
async fn cleanup_of_missing_set_fails() {
    let api = MemoryRecordApi::new();

    let err = solver(&api).cleanup(&challenge("a")).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn present_then_cleanup_restores_prior_state() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"other\""]));
    let solver = solver(&api);

    solver.present(&challenge("k1")).await.unwrap();
    assert_eq!(stored_records(&api).unwrap().len(), 2);

    solver.cleanup(&challenge("k1")).await.unwrap();
    assert_eq!(stored_records(&api), Some(vec!["\"other\"".to_string()]));
}

#[tokio::test]
async fn delete_failure_is_surfaced() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\""]));
    api.fail_on(Operation::Delete);

    let err = solver(&api).cleanup(&challenge("a")).await.unwrap_err();

    assert!(err.to_string().contains("injected Delete failure"));
    assert_eq!(stored_records(&api), Some(vec!["\"a\"".to_string()]));
}

#[tokio::test]
async fn update_failure_is_surfaced() {
    let api = MemoryRecordApi::new();
    api.insert(txt_set(&["\"a\"", "\"b\""]));
    api.fail_on(Operation::Update);

    assert!(solver(&api).cleanup(&challenge("a")).await.is_err());
    assert_eq!(api.calls().len(), 2);
}
