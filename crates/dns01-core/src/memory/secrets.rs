// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// Useful for tests and for running the solver outside a cluster with a
// token supplied at startup.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::traits::{SecretData, SecretStore};

/// In-memory secret store implementation
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::memory::MemorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store.insert("cert-manager", "desec-token", "token", b"abc".to_vec());
///
///     let data = store.get("cert-manager", "desec-token").await?;
///     assert!(data.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl MemorySecretStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one data key of a secret, creating the secret if needed
    pub fn insert(&self, namespace: &str, name: &str, key: &str, value: Vec<u8>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Remove a whole secret
    pub fn remove(&self, namespace: &str, name: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.remove(&(namespace.to_string(), name.to_string()));
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, crate::Error> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.get(&(namespace.to_string(), name.to_string())).cloned())
    }
}
