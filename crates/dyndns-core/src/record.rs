//! DNS record model and merge semantics
//!
//! A request carries a hostname, an IP, and optional attribute overrides.
//! The desired record is computed by layering overrides over the existing
//! record's values and falling back to defaults (`A` / automatic TTL /
//! proxied). Overrides are decided by presence, not truthiness: an explicit
//! `proxied=false` or `ttl=0` wins over a stored value.

use serde::{Deserialize, Serialize};

/// TTL value the provider treats as "automatic"
pub const TTL_AUTO: u32 = 1;

/// A single DNS entry, either as stored by the provider or as the caller
/// wants it to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully-qualified record name
    pub name: String,

    /// IP address or target
    pub content: String,

    /// Time-to-live in seconds; [`TTL_AUTO`] means automatic
    pub ttl: u32,

    /// Whether the provider proxies traffic for this record
    pub proxied: bool,
}

/// A record as returned by the provider, carrying its assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Opaque provider-assigned record id
    pub id: String,

    #[serde(flatten)]
    pub record: DnsRecord,
}

/// Caller-supplied attribute overrides. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub record_type: Option<String>,
    pub ttl: Option<u32>,
    pub proxied: Option<bool>,
}

impl DnsRecord {
    /// Compute the desired record for a request.
    ///
    /// `name` and `content` always come from the request; every other field
    /// is override, else existing value, else default.
    pub fn merged(
        existing: Option<&DnsRecord>,
        hostname: &str,
        ip: &str,
        overrides: &Overrides,
    ) -> Self {
        Self {
            record_type: overrides
                .record_type
                .clone()
                .or_else(|| existing.map(|r| r.record_type.clone()))
                .unwrap_or_else(|| "A".to_string()),
            name: hostname.to_string(),
            content: ip.to_string(),
            ttl: overrides.ttl.or(existing.map(|r| r.ttl)).unwrap_or(TTL_AUTO),
            proxied: overrides
                .proxied
                .or(existing.map(|r| r.proxied))
                .unwrap_or(true),
        }
    }

    /// Whether this desired record matches `existing` in every field a write
    /// would touch. `name` is deliberately not compared; the lookup already
    /// scoped it.
    pub fn matches(&self, existing: &DnsRecord) -> bool {
        self.record_type == existing.record_type
            && self.content == existing.content
            && self.ttl == existing.ttl
            && self.proxied == existing.proxied
    }
}
