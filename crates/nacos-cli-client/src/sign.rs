//! SPAS request signing for access-key/secret-key authentication
//!
//! The canonical payload layout is checked bit-for-bit by the server's
//! signature verifier.

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Headers attached to a signed request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Millisecond Unix timestamp
    pub timestamp: String,
    pub access_key: String,
    pub signature: String,
}

/// Build the canonical payload from tenant, group, and timestamp.
pub fn sign_data(tenant: &str, group: &str, timestamp: &str) -> String {
    match (tenant.is_empty(), group.is_empty()) {
        (true, true) => timestamp.to_string(),
        (true, false) => format!("{}+{}", group, timestamp),
        (false, true) => format!("{}+{}", tenant, timestamp),
        (false, false) => format!("{}+{}+{}", tenant, group, timestamp),
    }
}

/// HMAC-SHA1 of `data` keyed by `secret_key`, base64-encoded.
pub fn spas_sign(data: &str, secret_key: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Sign a request for the given tenant and group at `timestamp`.
pub fn sign(tenant: &str, group: &str, timestamp: &str, secret_key: &str) -> String {
    spas_sign(&sign_data(tenant, group, timestamp), secret_key)
}

/// Produce the full header set for a request signed at `timestamp_ms`.
pub fn signed_headers(
    access_key: &str,
    secret_key: &str,
    tenant: &str,
    group: &str,
    timestamp_ms: i64,
) -> SignedHeaders {
    let timestamp = timestamp_ms.to_string();
    let signature = sign(tenant, group, &timestamp, secret_key);
    SignedHeaders {
        timestamp,
        access_key: access_key.to_string(),
        signature,
    }
}
