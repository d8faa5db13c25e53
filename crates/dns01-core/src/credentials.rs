//! Credential resolution
//!
//! Turns a challenge request into an authenticated provider client:
//!
//! 1. Decode the challenge's solver config
//! 2. Fetch the referenced secret from the request's namespace
//! 3. Extract the configured data key as the API token
//! 4. Build a fresh client through the provider factory

use std::sync::Arc;

use tracing::debug;

use crate::challenge::ChallengeRequest;
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::traits::{RecordApi, RecordApiFactory, SecretStore};

/// Resolves provider credentials for a challenge
///
/// Both collaborators are injected; the resolver itself holds no state
/// between calls.
#[derive(Clone)]
pub struct CredentialResolver {
    secrets: Arc<dyn SecretStore>,
    factory: Arc<dyn RecordApiFactory>,
}

impl CredentialResolver {
    /// Create a resolver over a secret store and a provider client factory
    pub fn new(secrets: Arc<dyn SecretStore>, factory: Arc<dyn RecordApiFactory>) -> Self {
        Self { secrets, factory }
    }

    /// Look up the API token referenced by the challenge's config
    pub async fn api_token(&self, ch: &ChallengeRequest) -> Result<String> {
        let cfg = SolverConfig::load(ch.config.as_ref())?;
        let selector = &cfg.api_token_secret_ref;
        let namespace = ch.resource_namespace.as_str();

        if selector.name.is_empty() {
            return Err(Error::credential_unavailable(
                namespace,
                &selector.name,
                &selector.key,
                "no apiTokenSecretRef configured",
            ));
        }

        debug!("Looking up API token secret {}/{}", namespace, selector.name);

        let data = self
            .secrets
            .get(namespace, &selector.name)
            .await?
            .ok_or_else(|| {
                Error::credential_unavailable(namespace, &selector.name, &selector.key, "secret not found")
            })?;

        let raw = data.get(&selector.key).ok_or_else(|| {
            Error::credential_unavailable(namespace, &selector.name, &selector.key, "key not found in secret")
        })?;

        let token = std::str::from_utf8(raw).map_err(|_| {
            Error::credential_unavailable(namespace, &selector.name, &selector.key, "value is not valid UTF-8")
        })?;

        let token = token.trim();
        if token.is_empty() {
            return Err(Error::credential_unavailable(
                namespace,
                &selector.name,
                &selector.key,
                "value is empty",
            ));
        }

        Ok(token.to_string())
    }

    /// Build an authenticated client for the challenge
    pub async fn client(&self, ch: &ChallengeRequest) -> Result<Box<dyn RecordApi>> {
        let token = self.api_token(ch).await?;
        self.factory.create(&token)
    }

    /// Name of the provider clients are built for
    pub fn provider_name(&self) -> &'static str {
        self.factory.provider_name()
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("provider", &self.factory.provider_name())
            .finish()
    }
}
