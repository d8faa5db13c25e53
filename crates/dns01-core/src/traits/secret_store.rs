// # Secret Store Trait
//
// Read-only access to namespaced secrets holding provider credentials.
//
// ## Implementations
//
// - Kubernetes: `dns01-secret-kube` crate
// - In-memory: `dns01_core::memory::MemorySecretStore`

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Key/value contents of a secret
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up a secret by namespace and name
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SecretData))`: The secret's data map
    /// - `Ok(None)`: No such secret
    /// - `Err(Error)`: Store unreachable or request rejected
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, crate::Error>;
}
