//! The read-compare-write cycle
//!
//! One reconciliation pass per request: resolve the zone, fetch the current
//! record, merge the request into a desired record, and write only when the
//! two differ. Always two reads; zero or one write. No state survives the
//! call, since the provider's API is the sole source of truth; concurrent
//! passes for the same hostname race with last-writer-wins semantics.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{DnsRecord, Overrides};
use crate::traits::RecordStore;

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Existing record already matched the desired one; nothing was written
    Unchanged,

    /// No record existed; one was created. Carries the provider's response.
    Created(serde_json::Value),

    /// Existing record was rewritten in place. Carries the provider's
    /// response.
    Updated(serde_json::Value),
}

/// Root domain of a hostname: the last two dot-separated labels.
///
/// `home.example.com` becomes `example.com`. Multi-label public suffixes
/// (`co.uk`) are not special-cased; zones are expected to live at the
/// two-label cut.
pub fn root_domain(hostname: &str) -> String {
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        hostname.to_string()
    } else {
        labels[labels.len() - 2..].join(".")
    }
}

/// Bring the provider's record for `hostname` in line with `ip` and the
/// requested overrides.
///
/// Fails with [`Error::ZoneNotFound`] when no zone covers the hostname's
/// root domain; provider failures propagate unchanged.
pub async fn reconcile(
    store: &dyn RecordStore,
    hostname: &str,
    ip: &str,
    overrides: &Overrides,
) -> Result<Outcome> {
    let domain = root_domain(hostname);
    debug!(hostname, domain = %domain, "resolving zone");

    let zone_id = store
        .resolve_zone(&domain)
        .await?
        .ok_or(Error::ZoneNotFound(domain))?;

    let existing = store.fetch_record(&zone_id, hostname).await?;
    let desired = DnsRecord::merged(
        existing.as_ref().map(|stored| &stored.record),
        hostname,
        ip,
        overrides,
    );

    match existing {
        Some(stored) if desired.matches(&stored.record) => {
            info!(
                provider = store.provider_name(),
                hostname, "record unchanged"
            );
            Ok(Outcome::Unchanged)
        }
        Some(stored) => {
            info!(
                provider = store.provider_name(),
                hostname,
                content = %desired.content,
                "updating record"
            );
            let payload = store.update_record(&zone_id, &stored.id, &desired).await?;
            Ok(Outcome::Updated(payload))
        }
        None => {
            info!(
                provider = store.provider_name(),
                hostname,
                content = %desired.content,
                "creating record"
            );
            let payload = store.create_record(&zone_id, &desired).await?;
            Ok(Outcome::Created(payload))
        }
    }
}
