// # Kubernetes Secret Store
//
// This crate provides a `SecretStore` backed by Kubernetes `Secret`
// objects, used to find the provider API token referenced by a challenge.
//
// ## Access
//
// Read-only: one `GET /api/v1/namespaces/:ns/secrets/:name` per lookup.
// The service account running the solver needs `get` on secrets in every
// namespace challenges are issued from.
//
// ## Initialization
//
// The Kubernetes client is built once at startup (in-cluster config or
// kubeconfig) and passed in explicitly; there is no process-wide client.

use async_trait::async_trait;
use dns01_core::traits::{SecretData, SecretStore};
use dns01_core::{Error, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

/// Secret store reading Kubernetes `Secret` objects
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Wrap an existing Kubernetes client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient environment
    ///
    /// Uses the in-cluster service account when running in a pod and the
    /// local kubeconfig otherwise.
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| Error::secret_store(format!("Failed to create Kubernetes client: {}", e)))?;
        Ok(Self::new(client))
    }
}

impl std::fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

/// Extract the decoded data map of a secret
///
/// `stringData` is write-only in the API and never returned on reads, so
/// only `data` is considered.
pub fn secret_data(secret: Secret) -> SecretData {
    secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.0))
        .collect()
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<SecretData>> {
        tracing::debug!("Fetching secret {}/{}", namespace, name);

        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        match secrets.get_opt(name).await {
            Ok(Some(secret)) => Ok(Some(secret_data(secret))),
            Ok(None) => {
                tracing::debug!("Secret {}/{} not found", namespace, name);
                Ok(None)
            }
            Err(e) => Err(Error::secret_store(format!(
                "unable to get secret `{}/{}`: {}",
                namespace, name, e
            ))),
        }
    }
}
