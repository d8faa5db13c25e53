// # dns01-core
//
// Core library for the ACME DNS-01 TXT record solver.
//
// ## Architecture Overview
//
// - **CredentialResolver**: Finds the provider API token in a namespaced secret
// - **reconcile**: Read-then-write TXT record set transitions (create / append / shrink / delete)
// - **Solver**: Ties both together for Present and CleanUp challenge requests
// - **RecordApi**: Trait for provider record set CRUD
// - **SecretStore**: Trait for read-only secret lookup
//
// ## Design Principles
//
// 1. **Stateless**: The provider's record set is the only source of truth
// 2. **Shared record sets**: Writes add or remove one value, never overwrite blindly
// 3. **Idempotent**: Repeating Present or CleanUp with the same key is safe
// 4. **Explicit collaborators**: Secret store and provider factory are injected

pub mod challenge;
pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod names;
pub mod reconcile;
pub mod record;
pub mod solver;
pub mod traits;

// Re-export core types for convenience
pub use challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
pub use config::{SecretKeySelector, SolverConfig};
pub use credentials::CredentialResolver;
pub use error::{Error, Result};
pub use names::RecordLocation;
pub use reconcile::ReconcileOutcome;
pub use record::{RecordSet, TxtValue};
pub use solver::{DEFAULT_SOLVER_NAME, Solver};
pub use traits::{RecordApi, RecordApiFactory, SecretData, SecretStore};
