//! DNS-01 solver
//!
//! The [`Solver`] is what the webhook server calls for each challenge. It
//! resolves credentials, derives the record location and runs the
//! reconciler:
//!
//! ```text
//! ChallengeRequest ─▶ CredentialResolver ─▶ RecordApi client
//!                                                  │
//!                     RecordLocation + TxtValue ──▶ reconcile::{present, cleanup}
//! ```
//!
//! Errors are logged and returned unchanged; nothing is retried here.

use tracing::{error, info};

use crate::challenge::{ChallengeAction, ChallengeRequest, ChallengeResponse};
use crate::credentials::CredentialResolver;
use crate::error::Result;
use crate::names::RecordLocation;
use crate::reconcile::{self, ReconcileOutcome};
use crate::record::TxtValue;

/// Default solver name, as referenced from issuer configs
pub const DEFAULT_SOLVER_NAME: &str = "desec";

/// DNS-01 challenge solver
#[derive(Debug, Clone)]
pub struct Solver {
    name: String,
    credentials: CredentialResolver,
}

impl Solver {
    /// Create a solver named [`DEFAULT_SOLVER_NAME`]
    pub fn new(credentials: CredentialResolver) -> Self {
        Self::with_name(DEFAULT_SOLVER_NAME, credentials)
    }

    /// Create a solver with a custom name
    pub fn with_name(name: impl Into<String>, credentials: CredentialResolver) -> Self {
        Self {
            name: name.into(),
            credentials,
        }
    }

    /// Name the solver is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish the challenge key
    pub async fn present(&self, ch: &ChallengeRequest) -> Result<ReconcileOutcome> {
        let result = self.do_present(ch).await;
        if let Err(e) = &result {
            error!("Present failed for {}: {}", ch.resolved_fqdn, e);
        }
        result
    }

    /// Remove the challenge key
    pub async fn cleanup(&self, ch: &ChallengeRequest) -> Result<ReconcileOutcome> {
        let result = self.do_cleanup(ch).await;
        if let Err(e) = &result {
            error!("CleanUp failed for {}: {}", ch.resolved_fqdn, e);
        }
        result
    }

    /// Run `action` and wrap the result as a challenge response
    pub async fn handle(&self, action: ChallengeAction, ch: &ChallengeRequest) -> ChallengeResponse {
        let result = match action {
            ChallengeAction::Present => self.present(ch).await,
            ChallengeAction::CleanUp => self.cleanup(ch).await,
        };

        match result {
            Ok(_) => ChallengeResponse::success(&ch.uid),
            Err(e) => ChallengeResponse::failure(&ch.uid, &e),
        }
    }

    async fn do_present(&self, ch: &ChallengeRequest) -> Result<ReconcileOutcome> {
        let api = self.credentials.client(ch).await?;
        let loc = RecordLocation::from_resolved(&ch.resolved_fqdn, &ch.resolved_zone);

        let outcome = reconcile::present(api.as_ref(), &loc, &TxtValue::quote(&ch.key)).await?;
        info!("Presented challenge at {} via {}: {:?}", loc, api.provider_name(), outcome);
        Ok(outcome)
    }

    async fn do_cleanup(&self, ch: &ChallengeRequest) -> Result<ReconcileOutcome> {
        let api = self.credentials.client(ch).await?;
        let loc = RecordLocation::from_resolved(&ch.resolved_fqdn, &ch.resolved_zone);

        let outcome = reconcile::cleanup(api.as_ref(), &loc, &TxtValue::quote(&ch.key)).await?;
        info!("Cleaned up challenge at {} via {}: {:?}", loc, api.provider_name(), outcome);
        Ok(outcome)
    }
}
