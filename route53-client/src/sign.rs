//! Route 53 AWS3-HTTPS request signature
//!
//! Reference: <https://docs.aws.amazon.com/Route53/latest/DeveloperGuide/RESTAuthentication.html>
//!
//! The string to sign is the request date alone; verb, path and body are not
//! part of it. The date travels in `X-Amz-Date` so the server can recompute it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::credentials::Credentials;

type HmacSha256 = Hmac<Sha256>;

pub const DATE_HEADER: &str = "X-Amz-Date";
pub const AUTHORIZATION_HEADER: &str = "X-Amzn-Authorization";
pub const SECURITY_TOKEN_HEADER: &str = "X-Amz-Security-Token";

/// RFC 1123 date as expected in `X-Amz-Date`.
pub fn format_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Builds the authentication headers for one request.
pub fn sign(credentials: &Credentials, date: &str) -> Vec<(String, String)> {
    let signature = STANDARD.encode(hmac_sha256(
        credentials.secret_access_key.as_bytes(),
        date.as_bytes(),
    ));

    let mut headers = vec![
        (DATE_HEADER.to_string(), date.to_string()),
        (
            AUTHORIZATION_HEADER.to_string(),
            format!(
                "AWS3-HTTPS AWSAccessKeyId={},Algorithm=HmacSHA256,Signature={}",
                credentials.access_key_id, signature
            ),
        ),
    ];

    if let Some(token) = &credentials.session_token {
        headers.push((SECURITY_TOKEN_HEADER.to_string(), token.clone()));
    }

    headers
}
