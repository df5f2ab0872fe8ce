use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Headers Creem has delivered the signature under, in lookup order.
const SIGNATURE_HEADERS: [&str; 4] = [
    "creem-signature",
    "x-creem-signature",
    "x-signature",
    "signature",
];

pub fn signature_from_headers(headers: &HeaderMap) -> Option<&str> {
    SIGNATURE_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Lowercase hex HMAC-SHA256 of `payload`.
pub fn sign(secret: &[u8], payload: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex signature against `payload`.
pub fn verify(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &[u8] = b"whsec_test_secret";

    #[test]
    fn accepts_own_signature() {
        let payload = br#"{"id":"evt_1"}"#;
        let sig = sign(SECRET, payload).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify(SECRET, payload, &sig));
        assert!(verify(SECRET, payload, &sig.to_uppercase()));
    }

    #[test]
    fn rejects_tampered_payload_and_wrong_secret() {
        let sig = sign(SECRET, b"original").unwrap();
        assert!(!verify(SECRET, b"tampered", &sig));
        assert!(!verify(b"other_secret", b"original", &sig));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!verify(SECRET, b"payload", "not-hex"));
        assert!(!verify(SECRET, b"payload", ""));
        assert!(!verify(SECRET, b"payload", "abcd"));
    }

    #[test]
    fn header_lookup_follows_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("signature", HeaderValue::from_static("fallback"));
        assert_eq!(signature_from_headers(&headers), Some("fallback"));

        headers.insert("x-creem-signature", HeaderValue::from_static("preferred"));
        assert_eq!(signature_from_headers(&headers), Some("preferred"));

        headers.insert("creem-signature", HeaderValue::from_static(""));
        assert_eq!(signature_from_headers(&headers), Some("preferred"));
    }
}
