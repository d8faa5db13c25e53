//! Webhook HTTP endpoint
//!
//! cert-manager posts a `ChallengePayload` to
//! `/apis/<group>/v1alpha1/<solver>` and expects the same envelope back
//! with `response` filled in. Failures of the solver are reported inside
//! the response, not as HTTP errors.
//!
//! The kube-aggregator reaches the solver through an APIService and first
//! reads the discovery document at `/apis/<group>/v1alpha1`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use dns01_core::challenge::KIND;
use dns01_core::{ChallengePayload, ChallengeResponse, Error, Solver};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    group: Arc<str>,
    solver: Solver,
}

impl AppState {
    pub fn new(group: &str, solver: Solver) -> Self {
        Self {
            group: Arc::from(group),
            solver,
        }
    }

    /// Whether a request path addresses this webhook
    fn serves(&self, group: &str, solver: &str) -> bool {
        *self.group == *group && self.solver.name() == solver
    }

    /// Discovery document for the solver's group version
    fn resource_list(&self) -> ApiResourceList {
        let name = self.solver.name().to_string();
        ApiResourceList {
            kind: "APIResourceList",
            api_version: "v1",
            group_version: format!("{}/{}", self.group, VERSION),
            resources: vec![ApiResource {
                singular_name: name.clone(),
                name,
                namespaced: false,
                kind: KIND,
                verbs: vec!["create"],
            }],
        }
    }
}

const VERSION: &str = "v1alpha1";

/// Kubernetes `APIResourceList` served for API discovery
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiResourceList {
    kind: &'static str,
    api_version: &'static str,
    group_version: String,
    resources: Vec<ApiResource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiResource {
    name: String,
    singular_name: String,
    namespaced: bool,
    kind: &'static str,
    verbs: Vec<&'static str>,
}

/// Build the webhook router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/apis/:group/v1alpha1", get(discovery))
        .route("/apis/:group/v1alpha1/:solver", post(challenge))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn discovery(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<ApiResourceList>, StatusCode> {
    if *state.group != *group {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(state.resource_list()))
}

async fn challenge(
    State(state): State<AppState>,
    Path((group, solver)): Path<(String, String)>,
    Json(payload): Json<ChallengePayload>,
) -> Result<Json<ChallengePayload>, StatusCode> {
    if !state.serves(&group, &solver) {
        warn!("Rejecting challenge for unknown solver {}/{}", group, solver);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(handle_payload(&state.solver, payload).await))
}

/// Run the requested action and build the reply envelope
pub async fn handle_payload(solver: &Solver, payload: ChallengePayload) -> ChallengePayload {
    let Some(request) = payload.request else {
        let err = Error::invalid_input("challenge payload has no request");
        return ChallengePayload::reply(None, ChallengeResponse::failure("", &err));
    };

    let Some(action) = request.action else {
        let err = Error::invalid_input("challenge request has no action");
        let response = ChallengeResponse::failure(&request.uid, &err);
        return ChallengePayload::reply(Some(request), response);
    };

    info!(
        "{:?} challenge {} for {} (zone {})",
        action, request.uid, request.resolved_fqdn, request.resolved_zone
    );
    let response = solver.handle(action, &request).await;
    ChallengePayload::reply(Some(request), response)
}
