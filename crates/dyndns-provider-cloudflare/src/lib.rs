// # Cloudflare DNS Provider
//
// [`RecordStore`] implementation backed by the Cloudflare API v4.
//
// Each operation is a single HTTP call with no retries and no caching;
// failure handling and write decisions belong to the reconciler. On a
// non-success HTTP status the error carries Cloudflare's own message when
// the response envelope supplies one, and a generic fallback otherwise.
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
//
// ## Security
//
// The API token never appears in logs, and the Debug implementation
// redacts it.

use std::time::Duration;

use async_trait::async_trait;
use dyndns_core::error::{Error, Result};
use dyndns_core::record::{DnsRecord, StoredRecord};
use dyndns_core::traits::RecordStore;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback when the error envelope carries no message
const GENERIC_API_ERROR: &str = "Cloudflare API error";

/// Cloudflare API client
///
/// Holds the bearer token it was constructed with; credentials are an
/// explicit dependency, not ambient state.
pub struct CloudflareClient {
    /// Cloudflare API token. Never log this value.
    api_token: String,

    /// API root, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Subset of the Cloudflare envelope carrying a successful result
#[derive(Debug, Deserialize)]
struct ResultEnvelope<T> {
    result: Option<T>,
}

/// Subset of the Cloudflare envelope carrying failure details
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl CloudflareClient {
    /// Create a client against the production Cloudflare API.
    ///
    /// Fails when `api_token` is empty.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a client against a different API root. Useful for tests.
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Perform one API call and return the raw response body.
    ///
    /// The body is parsed regardless of status: Cloudflare reports failures
    /// inside the envelope, and the first error message becomes the error
    /// surfaced to the caller.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&DnsRecord>,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, method = %method, "Cloudflare API request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("Cloudflare request failed: {e}")))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::http(format!("failed to parse Cloudflare response: {e}")))?;

        if !status.is_success() {
            let envelope: ErrorEnvelope = serde_json::from_value(payload).unwrap_or_default();
            let message = envelope
                .errors
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());
            return Err(Error::provider("cloudflare", message));
        }

        Ok(payload)
    }

    /// Perform a GET and pull the typed `result` out of the envelope
    async fn get_result<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let payload = self.call(Method::GET, path, None).await?;
        let envelope: ResultEnvelope<T> = serde_json::from_value(payload)?;
        Ok(envelope.result)
    }
}

/// Zone listing entry; only the id is needed
#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
}

#[async_trait]
impl RecordStore for CloudflareClient {
    async fn resolve_zone(&self, root_domain: &str) -> Result<Option<String>> {
        let zones: Option<Vec<Zone>> = self
            .get_result(&format!("zones?name={root_domain}"))
            .await?;

        let zone_id = zones
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|zone| zone.id);
        debug!(root_domain, ?zone_id, "zone lookup");
        Ok(zone_id)
    }

    async fn fetch_record(&self, zone_id: &str, hostname: &str) -> Result<Option<StoredRecord>> {
        let records: Option<Vec<StoredRecord>> = self
            .get_result(&format!("zones/{zone_id}/dns_records?name={hostname}"))
            .await?;

        // several records may share a name; the first one listed wins
        Ok(records.unwrap_or_default().into_iter().next())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<serde_json::Value> {
        self.call(
            Method::POST,
            &format!("zones/{zone_id}/dns_records"),
            Some(record),
        )
        .await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> Result<serde_json::Value> {
        self.call(
            Method::PUT,
            &format!("zones/{zone_id}/dns_records/{record_id}"),
            Some(record),
        )
        .await
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let client = CloudflareClient::new("");
        assert!(matches!(client, Err(Error::Config(_))));
    }

    #[test]
    fn api_token_not_exposed_in_debug() {
        let client = CloudflareClient::new("secret_token_12345").unwrap();

        let debug_str = format!("{client:?}");
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("CloudflareClient"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CloudflareClient::with_base_url("token", "http://localhost:9000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn provider_name_is_cloudflare() {
        let client = CloudflareClient::new("token").unwrap();
        assert_eq!(client.provider_name(), "cloudflare");
    }
}
