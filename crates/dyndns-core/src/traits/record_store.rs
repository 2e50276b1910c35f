//! DNS provider seam
//!
//! [`RecordStore`] is the contract the reconciler drives: four remote
//! operations, each a single API call. Implementations translate to and
//! from the provider's record representation and surface the provider's own
//! error message on failure. Retries, caching and write decisions belong to
//! the caller, never to an implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{DnsRecord, StoredRecord};

/// Interface to a DNS provider's record API
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolve the provider's zone id for a root domain.
    ///
    /// Returns `Ok(None)` when the account has no zone for the domain; the
    /// caller decides whether that is an error.
    async fn resolve_zone(&self, root_domain: &str) -> Result<Option<String>>;

    /// Fetch the record stored for `hostname` within a zone.
    ///
    /// Providers may hold several records under one name; implementations
    /// return the first one listed.
    async fn fetch_record(&self, zone_id: &str, hostname: &str) -> Result<Option<StoredRecord>>;

    /// Create `record` in the zone, returning the provider's response
    /// payload verbatim.
    async fn create_record(&self, zone_id: &str, record: &DnsRecord)
    -> Result<serde_json::Value>;

    /// Rewrite the record addressed by `record_id` with `record`, returning
    /// the provider's response payload verbatim.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> Result<serde_json::Value>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}
