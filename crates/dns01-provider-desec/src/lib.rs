// # deSEC Record API
//
// This crate provides the deSEC implementation of `RecordApi` for the
// DNS-01 solver.
//
// - ✅ One HTTP request per trait method
// - ✅ Full error propagation (the calling framework owns retries)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic
// - ❌ NO caching (the provider's record set is the source of truth)
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - deSEC API: https://desec.readthedocs.io/en/latest/dns/rrsets.html
// - Retrieve RRset: GET    `/domains/:name/rrsets/:subname/:type/`
// - Create RRset:   POST   `/domains/:name/rrsets/`
// - Modify RRset:   PATCH  `/domains/:name/rrsets/:subname/:type/`
// - Delete RRset:   DELETE `/domains/:name/rrsets/:subname/:type/`
//
// An empty subname (zone apex) is addressed as `@` in URLs.

use async_trait::async_trait;
use dns01_core::traits::{RecordApi, RecordApiFactory};
use dns01_core::{Error, RecordSet, Result};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// deSEC API base URL
pub const DESEC_API_BASE: &str = "https://desec.io/api/v1";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "desec";

/// deSEC record API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform GET requests
/// - Log the intended POST/PATCH/DELETE payload
/// - **NOT** actually modify record sets
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct DesecProvider {
    /// deSEC API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DesecProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesecProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// POST body for a new record set
#[derive(Serialize)]
struct CreateBody<'a> {
    subname: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    ttl: u32,
    records: &'a [String],
}

/// PATCH body replacing the values of a record set
#[derive(Serialize)]
struct UpdateBody<'a> {
    records: &'a [String],
}

impl DesecProvider {
    /// Create a new deSEC client
    ///
    /// # Parameters
    ///
    /// - `api_token`: deSEC API token
    /// - `base_url`: API base URL (see [`DESEC_API_BASE`])
    /// - `dry_run`: If true, perform GET requests but skip mutations
    pub fn new(api_token: impl Into<String>, base_url: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();

        // Validate token is not empty
        if api_token.is_empty() {
            return Err(Error::config("deSEC API token cannot be empty"));
        }

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a client against the public deSEC API (live mode)
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, DESEC_API_BASE, false)
    }

    /// Create a client against the public deSEC API (dry-run mode)
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, DESEC_API_BASE, true)
    }

    fn rrsets_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/rrsets/", self.base_url, domain)
    }

    fn rrset_url(&self, domain: &str, subname: &str, record_type: &str) -> String {
        let subname = if subname.is_empty() { "@" } else { subname };
        format!(
            "{}/domains/{}/rrsets/{}/{}/",
            self.base_url, domain, subname, record_type
        )
    }

    /// Send one authenticated request, mapping failures to solver errors
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        what: &str,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .request(method, url)
            .header("Authorization", format!("Token {}", self.api_token))
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(status_error(status, retry_after.as_deref(), &error_text, what))
    }
}

/// Map a non-success HTTP status to a solver error
fn status_error(status: StatusCode, retry_after: Option<&str>, body: &str, what: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(what.to_string()),
        429 => match retry_after {
            Some(secs) => Error::rate_limited(format!(
                "deSEC rate limit exceeded, retry after {}s. Status: {}",
                secs, status
            )),
            None => Error::rate_limited(format!("deSEC rate limit exceeded. Status: {}", status)),
        },
        500..=599 => Error::provider(
            PROVIDER,
            format!("deSEC server error (transient): {} - {}", status, body),
        ),
        _ => Error::provider(PROVIDER, format!("{} failed: {} - {}", what, status, body)),
    }
}

#[async_trait]
impl RecordApi for DesecProvider {
    async fn get(&self, domain: &str, subname: &str, record_type: &str) -> Result<RecordSet> {
        let url = self.rrset_url(domain, subname, record_type);
        tracing::debug!("GET {}", url);

        let what = format!("RRset {}/{}/{}", domain, subname, record_type);
        let response = self.send::<()>(Method::GET, &url, None, &what).await?;

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }

    async fn create(&self, rrset: &RecordSet) -> Result<RecordSet> {
        let url = self.rrsets_url(&rrset.domain);
        let body = CreateBody {
            subname: &rrset.subname,
            record_type: &rrset.record_type,
            ttl: rrset.ttl.unwrap_or(dns01_core::record::CHALLENGE_TTL),
            records: &rrset.records,
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                serde_json::to_string(&body)?
            );
            return Ok(rrset.clone());
        }

        let what = format!("RRset {}/{}/{}", rrset.domain, rrset.subname, rrset.record_type);
        let response = self.send(Method::POST, &url, Some(&body), &what).await?;

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }

    async fn update(
        &self,
        domain: &str,
        subname: &str,
        record_type: &str,
        records: &[String],
    ) -> Result<RecordSet> {
        let url = self.rrset_url(domain, subname, record_type);
        let body = UpdateBody { records };
        let unchanged = RecordSet {
            domain: domain.to_string(),
            subname: subname.to_string(),
            record_type: record_type.to_string(),
            records: records.to_vec(),
            ttl: None,
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(&body)?
            );
            return Ok(unchanged);
        }

        let what = format!("RRset {}/{}/{}", domain, subname, record_type);
        let response = self.send(Method::PATCH, &url, Some(&body), &what).await?;

        // deSEC answers 204 when the PATCH emptied (and thereby deleted) the set
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(RecordSet {
                records: Vec::new(),
                ..unchanged
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }

    async fn delete(&self, domain: &str, subname: &str, record_type: &str) -> Result<()> {
        let url = self.rrset_url(domain, subname, record_type);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        let what = format!("RRset {}/{}/{}", domain, subname, record_type);
        self.send::<()>(Method::DELETE, &url, None, &what).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating deSEC clients
///
/// One client is built per challenge from the token resolved for it.
#[derive(Debug, Clone)]
pub struct DesecFactory {
    base_url: String,
    dry_run: bool,
}

impl DesecFactory {
    /// Factory for clients against `base_url`
    pub fn new(base_url: impl Into<String>, dry_run: bool) -> Self {
        if dry_run {
            tracing::warn!("deSEC provider running in DRY-RUN mode - no changes will be made");
        }

        Self {
            base_url: base_url.into(),
            dry_run,
        }
    }
}

impl Default for DesecFactory {
    fn default() -> Self {
        Self::new(DESEC_API_BASE, false)
    }
}

impl RecordApiFactory for DesecFactory {
    fn create(&self, api_token: &str) -> Result<Box<dyn RecordApi>> {
        Ok(Box::new(DesecProvider::new(
            api_token,
            self.base_url.clone(),
            self.dry_run,
        )?))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
