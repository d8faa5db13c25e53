// # In-Memory Collaborators
//
// This module provides in-memory implementations of the SecretStore and
// RecordApi traits.

pub mod records;
pub mod secrets;

pub use records::{MemoryRecordApi, MemoryRecordApiFactory, Operation, RecordCall};
pub use secrets::MemorySecretStore;
