//! Test doubles and common utilities for solver contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::error::Result;
use dns01_core::memory::{MemoryRecordApi, MemoryRecordApiFactory, MemorySecretStore};
use dns01_core::traits::{SecretData, SecretStore};
use dns01_core::{ChallengeRequest, CredentialResolver, Error, RecordSet, Solver};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const NAMESPACE: &str = "cert-manager";
pub const SECRET_NAME: &str = "desec-token";
pub const SECRET_KEY: &str = "token";
pub const TOKEN: &str = "desec-api-token";

/// A SecretStore wrapper that counts lookups
pub struct CountingSecretStore {
    inner: MemorySecretStore,
    get_call_count: Arc<AtomicUsize>,
}

impl CountingSecretStore {
    pub fn new(inner: MemorySecretStore) -> Self {
        Self {
            inner,
            get_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times get() was called
    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    /// Create a new CountingSecretStore that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            inner: other.inner.clone(),
            get_call_count: Arc::clone(&other.get_call_count),
        }
    }
}

#[async_trait]
impl SecretStore for CountingSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.get(namespace, name).await
    }
}

/// A SecretStore that is always unreachable
pub struct UnreachableSecretStore;

#[async_trait]
impl SecretStore for UnreachableSecretStore {
    async fn get(&self, _namespace: &str, _name: &str) -> Result<Option<SecretData>> {
        Err(Error::secret_store("connection refused"))
    }
}

/// Secret store holding the default API token
pub fn token_store() -> MemorySecretStore {
    let secrets = MemorySecretStore::new();
    secrets.insert(NAMESPACE, SECRET_NAME, SECRET_KEY, TOKEN.as_bytes().to_vec());
    secrets
}

/// Solver backed by the given provider and secret store
pub fn solver_with(api: &MemoryRecordApi, secrets: Arc<dyn SecretStore>) -> Solver {
    let factory = MemoryRecordApiFactory::new(api.clone());
    Solver::new(CredentialResolver::new(secrets, Arc::new(factory)))
}

/// Solver backed by the given provider and the default token
pub fn solver(api: &MemoryRecordApi) -> Solver {
    solver_with(api, Arc::new(token_store()))
}

/// A challenge for `_acme-challenge.example.com.` in zone `example.com.`
pub fn challenge(key: &str) -> ChallengeRequest {
    challenge_at("_acme-challenge.example.com.", "example.com.", key)
}

/// A challenge at an arbitrary FQDN and zone
pub fn challenge_at(fqdn: &str, zone: &str, key: &str) -> ChallengeRequest {
    ChallengeRequest {
        uid: "uid-1".to_string(),
        challenge_type: "dns-01".to_string(),
        dns_name: "example.com".to_string(),
        key: key.to_string(),
        resource_namespace: NAMESPACE.to_string(),
        resolved_fqdn: fqdn.to_string(),
        resolved_zone: zone.to_string(),
        config: Some(serde_json::json!({
            "apiTokenSecretRef": {"name": SECRET_NAME, "key": SECRET_KEY}
        })),
        ..Default::default()
    }
}

/// A TXT record set at `_acme-challenge.example.com` holding `records`
pub fn txt_set(records: &[&str]) -> RecordSet {
    RecordSet {
        domain: "example.com".to_string(),
        subname: "_acme-challenge".to_string(),
        record_type: "TXT".to_string(),
        records: records.iter().map(|r| r.to_string()).collect(),
        ttl: Some(3600),
    }
}

/// Values currently stored at `_acme-challenge.example.com`
pub fn stored_records(api: &MemoryRecordApi) -> Option<Vec<String>> {
    api.record_set("example.com", "_acme-challenge", "TXT")
        .map(|set| set.records)
}
