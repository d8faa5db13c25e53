// # Record API Trait
//
// Defines the record set CRUD contract the solver needs from a DNS provider.
//
// ## Implementations
//
// - deSEC: `dns01-provider-desec` crate
// - In-memory: `dns01_core::memory::MemoryRecordApi` (tests, dry runs)
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::RecordApi;
//
// #[tokio::main]
// async fn main() -> dns01_core::Result<()> {
//     let api = /* RecordApi implementation */;
//
//     let set = api.get("example.com", "_acme-challenge", "TXT").await?;
//     println!("{:?}", set.records);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::RecordSet;

/// Trait for DNS provider record APIs
///
/// A record set is addressed by `(domain, subname, type)`. Implementations
/// translate each method into exactly one provider API call.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (the calling framework re-invokes the solver)
/// - ❌ Cache record sets between calls (the provider is the source of truth)
/// - ❌ Decide how a record set should change (owned by the reconciler)
/// - ❌ Spawn tasks or threads
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Fetch the record set at `(domain, subname, record_type)`
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSet)`: The stored record set
    /// - `Err(Error::NotFound)`: No such record set
    /// - `Err(Error)`: Any other failure
    async fn get(
        &self,
        domain: &str,
        subname: &str,
        record_type: &str,
    ) -> Result<RecordSet, crate::Error>;

    /// Create a new record set
    async fn create(&self, rrset: &RecordSet) -> Result<RecordSet, crate::Error>;

    /// Replace the values of an existing record set
    ///
    /// `records` is the complete new value list.
    async fn update(
        &self,
        domain: &str,
        subname: &str,
        record_type: &str,
        records: &[String],
    ) -> Result<RecordSet, crate::Error>;

    /// Delete a record set entirely
    async fn delete(&self, domain: &str, subname: &str, record_type: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Builds an authenticated [`RecordApi`] handle from an API token
///
/// Handles are constructed fresh for every challenge; nothing is pooled.
pub trait RecordApiFactory: Send + Sync {
    /// Create a client authenticated with `api_token`
    fn create(&self, api_token: &str) -> Result<Box<dyn RecordApi>, crate::Error>;

    /// Name of the provider the factory builds clients for
    fn provider_name(&self) -> &'static str;
}
