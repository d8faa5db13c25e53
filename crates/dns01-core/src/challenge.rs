//! Challenge request and response types
//!
//! These follow the JSON shape cert-manager posts to DNS-01 webhook solvers
//! (`acme.cert-manager.io/v1alpha1`, kind `ChallengePayload`).

use serde::{Deserialize, Deserializer, Serialize};

/// API version of the challenge payload
pub const API_VERSION: &str = "acme.cert-manager.io/v1alpha1";

/// Kind of the challenge payload
pub const KIND: &str = "ChallengePayload";

/// Requested solver action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the proof value
    Present,
    /// Remove the proof value
    CleanUp,
}

// Unrecognized actions decode as `None` so the caller can answer with a
// failure response instead of rejecting the whole payload.
fn known_action<'de, D>(deserializer: D) -> Result<Option<ChallengeAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("Present") => Some(ChallengeAction::Present),
        Some("CleanUp") => Some(ChallengeAction::CleanUp),
        _ => None,
    })
}

/// A single DNS-01 challenge handed to the solver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Identifier echoed back in the response
    #[serde(default)]
    pub uid: String,

    /// Present or CleanUp; `None` when absent or not recognized
    #[serde(
        default,
        deserialize_with = "known_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<ChallengeAction>,

    /// Challenge type, "dns-01"
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// Name being validated (e.g. "example.com")
    #[serde(default)]
    pub dns_name: String,

    /// Proof value to publish
    #[serde(default)]
    pub key: String,

    /// Namespace to look credentials up in
    #[serde(default)]
    pub resource_namespace: String,

    /// FQDN the TXT record must appear at, with trailing dot
    #[serde(default, rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone the FQDN resolves into, with trailing dot
    #[serde(default)]
    pub resolved_zone: String,

    /// Whether ambient credentials may be used
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque per-issuer solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Failure details attached to a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Always "Failure" when present
    pub status: String,
    /// Human readable error
    pub message: String,
    /// Machine readable reason
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// HTTP-like status code
    #[serde(default)]
    pub code: u16,
}

/// Solver answer for one challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Request uid
    pub uid: String,
    /// Whether the action succeeded
    pub success: bool,
    /// Failure details, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ChallengeResponse {
    /// Successful response for `uid`
    pub fn success(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: true,
            status: None,
        }
    }

    /// Failed response for `uid` carrying `err`
    pub fn failure(uid: impl Into<String>, err: &crate::Error) -> Self {
        Self {
            uid: uid.into(),
            success: false,
            status: Some(Status {
                status: "Failure".to_string(),
                message: err.to_string(),
                reason: reason_for(err).to_string(),
                code: 500,
            }),
        }
    }
}

fn reason_for(err: &crate::Error) -> &'static str {
    use crate::Error;
    match err {
        Error::Config(_) | Error::Json(_) | Error::InvalidInput(_) => "BadRequest",
        Error::CredentialUnavailable { .. } | Error::Authentication(_) => "Unauthorized",
        Error::NotFound(_) => "NotFound",
        Error::RateLimited(_) => "TooManyRequests",
        _ => "InternalError",
    }
}

/// Envelope exchanged with cert-manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// API version, see [`API_VERSION`]
    #[serde(default)]
    pub api_version: String,
    /// Kind, see [`KIND`]
    #[serde(default)]
    pub kind: String,
    /// Incoming request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    /// Outgoing response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    /// Build the reply envelope for `response`
    pub fn reply(request: Option<ChallengeRequest>, response: ChallengeResponse) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            request,
            response: Some(response),
        }
    }
}
