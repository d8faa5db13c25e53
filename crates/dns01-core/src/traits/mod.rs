//! Core traits for the DNS-01 solver
//!
//! This module defines the abstract interfaces of the solver's external
//! collaborators.
//!
//! - [`RecordApi`]: Record set CRUD against a DNS provider
//! - [`SecretStore`]: Read-only namespaced secret lookup

pub mod record_api;
pub mod secret_store;

pub use record_api::{RecordApi, RecordApiFactory};
pub use secret_store::{SecretData, SecretStore};
