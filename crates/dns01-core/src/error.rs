//! Error types for the DNS-01 solver
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS-01 solver
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed solver configuration payload
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API token secret or one of its keys could not be resolved
    #[error("Credential unavailable: key `{key}` of secret `{namespace}/{name}`: {reason}")]
    CredentialUnavailable {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Secret name
        name: String,
        /// Data key inside the secret
        key: String,
        /// What went wrong
        reason: String,
    },

    /// Secret store transport errors
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record set not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credential error naming the secret and key involved
    pub fn credential_unavailable(
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::CredentialUnavailable {
            namespace: namespace.into(),
            name: name.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the provider reported the record set as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_error_names_secret_and_key() {
        let err = Error::credential_unavailable("cert-manager", "desec-token", "token", "key not found");
        let msg = err.to_string();
        assert!(msg.contains("cert-manager/desec-token"));
        assert!(msg.contains("`token`"));
    }

    #[test]
    fn only_not_found_is_not_found() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::provider("desec", "boom").is_not_found());
        assert!(!Error::auth("nope").is_not_found());
    }
}
