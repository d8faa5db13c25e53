//! Configuration types for the DNS-01 solver
//!
//! The only configuration the solver reads per challenge is the reference
//! to the secret holding the provider API token.

use serde::{Deserialize, Serialize};

/// Per-challenge solver configuration
///
/// Decoded from the opaque `config` object of a challenge request:
///
/// ```json
/// { "apiTokenSecretRef": { "name": "desec-token", "key": "token" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Location of the API token
    #[serde(default)]
    pub api_token_secret_ref: SecretKeySelector,
}

/// Selects one data key of a named secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    /// Secret name
    #[serde(default)]
    pub name: String,

    /// Data key within the secret
    #[serde(default)]
    pub key: String,
}

impl SolverConfig {
    /// Decode the configuration payload of a challenge
    ///
    /// A missing or `null` payload yields the default (empty) config; lookup
    /// fails later because no secret name is set.
    pub fn load(payload: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        match payload {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Self::deserialize(value)
                .map_err(|e| crate::Error::config(format!("error decoding solver config: {}", e))),
        }
    }
}
