//! Basic-auth credential gate
//!
//! Requests carry `Authorization: Basic <base64(user:pass)>`. Anything
//! malformed fails closed, and rejection happens before the reconciler
//! runs.

use base64::prelude::{BASE64_STANDARD, Engine as _};

/// Shared-secret credentials the daemon was configured with
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// Validate an Authorization header value against the configured
/// credentials.
pub fn validate_basic_auth(header: Option<&str>, credentials: &Credentials) -> bool {
    let Some(header) = header else {
        return false;
    };
    let Some(encoded) = header.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64_STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, pass)) = decoded.split_once(':') else {
        return false;
    };

    user == credentials.user && pass == credentials.pass
}
