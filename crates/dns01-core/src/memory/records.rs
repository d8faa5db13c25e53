// # Memory Record API
//
// In-memory implementation of RecordApi.
//
// Behaves like a provider holding record sets keyed by
// (domain, subname, type) and keeps a log of every call so tests can assert
// on the exact sequence of reads and writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::record::RecordSet;
use crate::traits::{RecordApi, RecordApiFactory};
use crate::Error;

/// One call observed by [`MemoryRecordApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCall {
    Get { domain: String, subname: String },
    Create(RecordSet),
    Update { domain: String, subname: String, records: Vec<String> },
    Delete { domain: String, subname: String },
}

/// Record API operations, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Create,
    Update,
    Delete,
}

type Key = (String, String, String);

#[derive(Debug, Default)]
struct State {
    sets: HashMap<Key, RecordSet>,
    calls: Vec<RecordCall>,
    failing: Vec<Operation>,
}

/// In-memory record API
///
/// Clones share sets, call log and injected failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordApi {
    state: Arc<Mutex<State>>,
}

impl MemoryRecordApi {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record set
    pub fn insert(&self, rrset: RecordSet) {
        let mut state = self.lock();
        state.sets.insert(key_of(&rrset.domain, &rrset.subname, &rrset.record_type), rrset);
    }

    /// Current record set at a location, if any
    pub fn record_set(&self, domain: &str, subname: &str, record_type: &str) -> Option<RecordSet> {
        self.lock().sets.get(&key_of(domain, subname, record_type)).cloned()
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<RecordCall> {
        self.lock().calls.clone()
    }

    /// Make every subsequent `op` fail with a provider error
    pub fn fail_on(&self, op: Operation) {
        self.lock().failing.push(op);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(state: &State, op: Operation) -> Result<(), Error> {
        if state.failing.contains(&op) {
            return Err(Error::provider("memory", format!("injected {:?} failure", op)));
        }
        Ok(())
    }
}

fn key_of(domain: &str, subname: &str, record_type: &str) -> Key {
    (domain.to_string(), subname.to_string(), record_type.to_string())
}

#[async_trait]
impl RecordApi for MemoryRecordApi {
    async fn get(&self, domain: &str, subname: &str, record_type: &str) -> Result<RecordSet, Error> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Get {
            domain: domain.to_string(),
            subname: subname.to_string(),
        });
        Self::check(&state, Operation::Get)?;

        state
            .sets
            .get(&key_of(domain, subname, record_type))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{}/{}/{}", domain, subname, record_type)))
    }

    async fn create(&self, rrset: &RecordSet) -> Result<RecordSet, Error> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Create(rrset.clone()));
        Self::check(&state, Operation::Create)?;

        let key = key_of(&rrset.domain, &rrset.subname, &rrset.record_type);
        if state.sets.contains_key(&key) {
            return Err(Error::provider("memory", "record set already exists"));
        }
        state.sets.insert(key, rrset.clone());
        Ok(rrset.clone())
    }

    async fn update(
        &self,
        domain: &str,
        subname: &str,
        record_type: &str,
        records: &[String],
    ) -> Result<RecordSet, Error> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Update {
            domain: domain.to_string(),
            subname: subname.to_string(),
            records: records.to_vec(),
        });
        Self::check(&state, Operation::Update)?;

        let set = state
            .sets
            .get_mut(&key_of(domain, subname, record_type))
            .ok_or_else(|| Error::not_found(format!("{}/{}/{}", domain, subname, record_type)))?;
        set.records = records.to_vec();
        Ok(set.clone())
    }

    async fn delete(&self, domain: &str, subname: &str, record_type: &str) -> Result<(), Error> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Delete {
            domain: domain.to_string(),
            subname: subname.to_string(),
        });
        Self::check(&state, Operation::Delete)?;

        state.sets.remove(&key_of(domain, subname, record_type));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory handing out clients that share one [`MemoryRecordApi`]
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordApiFactory {
    api: MemoryRecordApi,
    tokens: Arc<Mutex<Vec<String>>>,
}

impl MemoryRecordApiFactory {
    /// Factory over an existing provider
    pub fn new(api: MemoryRecordApi) -> Self {
        Self {
            api,
            tokens: Arc::default(),
        }
    }

    /// Tokens clients were created with, in order
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl RecordApiFactory for MemoryRecordApiFactory {
    fn create(&self, api_token: &str) -> Result<Box<dyn RecordApi>, Error> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(api_token.to_string());
        Ok(Box::new(self.api.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
