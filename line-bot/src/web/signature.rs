//! LINE webhook signature verification.
//!
//! LINE signs webhook requests with HMAC-SHA256 over the raw request body,
//! keyed by the channel secret, and sends the base64-encoded digest in the
//! `X-Line-Signature` header.
//! Reference: https://developers.line.biz/en/docs/messaging-api/receiving-messages/#verifying-signatures

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Verify a LINE webhook signature.
///
/// # Arguments
///
/// * `channel_secret` - The channel secret from the LINE Developer Console
/// * `body` - The raw request body, exactly as received
/// * `signature` - The `X-Line-Signature` header value
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise. A missing secret or
/// signature fails closed.
pub fn verify_line_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    if channel_secret.is_empty() || signature.is_empty() {
        warn!(
            has_channel_secret = !channel_secret.is_empty(),
            has_signature = !signature.is_empty(),
            "line_signature_missing_fields"
        );
        return false;
    }

    // Compute expected signature: base64(HMAC-SHA256(channel_secret, body))
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("line_signature_invalid_key");
            return false;
        }
    };

    mac.update(body);

    let expected_signature = BASE64.encode(mac.finalize().into_bytes());

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            "line_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_missing_fields() {
        assert!(!verify_line_signature("", b"body", "sig"));
        assert!(!verify_line_signature("secret", b"body", ""));
    }

    #[test]
    fn test_verify_signature_valid() {
        let secret = "test-channel-secret";
        let body = br#"{"destination":"U1","events":[]}"#;
        let signature = sign(secret, body);

        assert!(verify_line_signature(secret, body, &signature));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let body = br#"{"destination":"U1","events":[]}"#;
        let signature = sign("other-secret", body);

        assert!(!verify_line_signature("test-channel-secret", body, &signature));
    }

    #[test]
    fn test_verify_signature_tampered_body() {
        let secret = "test-channel-secret";
        let signature = sign(secret, b"original body");

        assert!(!verify_line_signature(secret, b"tampered body", &signature));
    }

    #[test]
    fn test_verify_signature_garbage_header() {
        assert!(!verify_line_signature("secret", b"body", "not base64 at all"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
