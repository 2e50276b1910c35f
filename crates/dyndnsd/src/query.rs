//! Update-request decoding
//!
//! Query parameters arrive as optional strings. `hostname` and `ip` are
//! required; the override parameters are coerced by presence. An empty
//! `type`, an unparsable `ttl` or a `proxied` value other than
//! "true"/"false" is treated as absent rather than rejected.

use dyndns_core::record::Overrides;
use dyndns_core::{Error, Result};
use serde::Deserialize;

/// Raw query parameters of the update endpoint
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub hostname: Option<String>,
    pub ip: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub ttl: Option<String>,
    pub proxied: Option<String>,
}

/// A decoded update request
#[derive(Debug, PartialEq)]
pub struct UpdateRequest {
    pub hostname: String,
    pub ip: String,
    pub overrides: Overrides,
}

impl UpdateParams {
    /// Decode the raw parameters, rejecting requests without a hostname or
    /// an IP.
    pub fn decode(self) -> Result<UpdateRequest> {
        let hostname = self.hostname.filter(|value| !value.is_empty());
        let ip = self.ip.filter(|value| !value.is_empty());
        let (Some(hostname), Some(ip)) = (hostname, ip) else {
            return Err(Error::invalid_input("missing hostname or ip"));
        };

        Ok(UpdateRequest {
            hostname,
            ip,
            overrides: Overrides {
                record_type: self.record_type.filter(|value| !value.is_empty()),
                ttl: self.ttl.as_deref().and_then(|raw| raw.parse().ok()),
                proxied: self.proxied.as_deref().and_then(parse_proxied),
            },
        })
    }
}

fn parse_proxied(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
