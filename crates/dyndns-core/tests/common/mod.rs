//! Test doubles for reconciler contract tests
//!
//! The mock store scripts the provider's state and records every call, so
//! tests can assert exactly which remote operations a reconciliation pass
//! performed and with what payloads.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dyndns_core::error::{Error, Result};
use dyndns_core::record::{DnsRecord, StoredRecord, TTL_AUTO};
use dyndns_core::traits::RecordStore;

/// Where a scripted failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Resolve,
    Fetch,
    Write,
}

/// A write observed by the mock store
#[derive(Debug, Clone)]
pub struct WriteCall {
    pub zone_id: String,
    /// `Some` for updates, `None` for creates
    pub record_id: Option<String>,
    pub record: DnsRecord,
}

/// A scripted [`RecordStore`] whose writes take effect, so a second pass
/// observes the state the first one produced.
pub struct MockRecordStore {
    zone: Option<String>,
    existing: Mutex<Option<StoredRecord>>,
    fail_on: Option<FailPoint>,
    resolve_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    writes: Mutex<Vec<WriteCall>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            zone: Some("zone-1".to_string()),
            existing: Mutex::new(None),
            fail_on: None,
            resolve_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Script the zone lookup result
    pub fn with_zone(mut self, zone: Option<&str>) -> Self {
        self.zone = zone.map(str::to_string);
        self
    }

    /// Script the stored record
    pub fn with_existing(self, stored: StoredRecord) -> Self {
        *self.existing.lock().unwrap() = Some(stored);
        self
    }

    /// Fail with a provider error at the given point
    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail_on = Some(point);
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    fn fail_if(&self, point: FailPoint) -> Result<()> {
        if self.fail_on == Some(point) {
            return Err(Error::provider("cloudflare", "upstream exploded"));
        }
        Ok(())
    }

    fn record_write(&self, zone_id: &str, record_id: Option<&str>, record: &DnsRecord) {
        self.writes.lock().unwrap().push(WriteCall {
            zone_id: zone_id.to_string(),
            record_id: record_id.map(str::to_string),
            record: record.clone(),
        });
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn resolve_zone(&self, _root_domain: &str) -> Result<Option<String>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailPoint::Resolve)?;
        Ok(self.zone.clone())
    }

    async fn fetch_record(&self, _zone_id: &str, _hostname: &str) -> Result<Option<StoredRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailPoint::Fetch)?;
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<serde_json::Value> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailPoint::Write)?;
        self.record_write(zone_id, None, record);

        let stored = StoredRecord {
            id: "rec-created".to_string(),
            record: record.clone(),
        };
        let payload = serde_json::json!({ "success": true, "result": &stored });
        *self.existing.lock().unwrap() = Some(stored);
        Ok(payload)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> Result<serde_json::Value> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailPoint::Write)?;
        self.record_write(zone_id, Some(record_id), record);

        let stored = StoredRecord {
            id: record_id.to_string(),
            record: record.clone(),
        };
        let payload = serde_json::json!({ "success": true, "result": &stored });
        *self.existing.lock().unwrap() = Some(stored);
        Ok(payload)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An A record with the automatic TTL, proxied, as the provider would store
pub fn stored_a_record(id: &str, name: &str, content: &str) -> StoredRecord {
    StoredRecord {
        id: id.to_string(),
        record: DnsRecord {
            record_type: "A".to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: TTL_AUTO,
            proxied: true,
        },
    }
}
