// # dyndns-core
//
// Core library for the dynamic-DNS reconciliation endpoint.
//
// ## Architecture Overview
//
// - **RecordStore**: Trait for a DNS provider's record API (resolve zone,
//   fetch record, create, update)
// - **DnsRecord / Overrides**: Record model and the merge that layers
//   caller overrides on top of stored values and defaults
// - **reconcile**: The read-compare-write cycle, with at most one provider
//   write per invocation
//
// ## Design Principles
//
// 1. **Explicit dependencies**: The provider client is passed into the
//    reconciler as a trait object, never a module-level singleton
// 2. **Stateless**: Nothing is cached or persisted between invocations;
//    the provider's API is the sole source of truth
// 3. **Library-first**: All core behavior is usable and testable without
//    the daemon

pub mod error;
pub mod reconcile;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use error::{Error, Result};
pub use reconcile::{Outcome, reconcile, root_domain};
pub use record::{DnsRecord, Overrides, StoredRecord, TTL_AUTO};
pub use traits::RecordStore;
