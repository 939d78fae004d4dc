//! HMAC-SHA256 signature verification for the inbound boundary.
//!
//! Every inbound request carries a hex-encoded HMAC of its raw body,
//! computed with the shared secret. Verification happens before any
//! registry or engine code runs.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the HMAC-SHA256 of `payload` as a lowercase hex string.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex-encoded HMAC-SHA256 signature against `payload`.
///
/// Accepts an optional `sha256=` prefix. Comparison is constant-time
/// to avoid leaking the expected signature through timing.
pub fn verify(payload: &[u8], signature: &str, secret: &str) -> bool {
    if signature.is_empty() {
        return false;
    }

    let hex_signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    timing_safe_eq(hex_signature, &sign(payload, secret))
}

/// Constant-time string comparison.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.as_bytes().iter().zip(b.as_bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_verifies() {
        let payload = b"notification payload";
        let signature = sign(payload, "secret");

        assert!(verify(payload, &signature, "secret"));
        assert!(verify(payload, &format!("sha256={signature}"), "secret"));
    }

    #[test]
    fn tampered_payload_rejected() {
        let signature = sign(b"original", "secret");
        assert!(!verify(b"tampered", &signature, "secret"));
    }

    #[test]
    fn wrong_secret_rejected() {
        let signature = sign(b"payload", "secret");
        assert!(!verify(b"payload", &signature, "other-secret"));
    }

    #[test]
    fn empty_signature_rejected() {
        assert!(!verify(b"payload", "", "secret"));
    }

    #[test]
    fn signing_is_deterministic() {
        let a = sign(b"payload", "secret");
        let b = sign(b"payload", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn timing_safe_eq_handles_length_mismatch() {
        assert!(timing_safe_eq("abc", "abc"));
        assert!(!timing_safe_eq("abc", "abd"));
        assert!(!timing_safe_eq("abc", "abcd"));
    }
}
