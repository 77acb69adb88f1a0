//! Bearer-token inspection.
//!
//! The client never verifies signatures (it holds no key); it only reads the
//! self-describing `exp` claim out of the token's payload segment so expiry
//! can be decided locally, without a round trip.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// The payload fields the client cares about.
#[derive(Debug, Deserialize)]
struct TokenPayload {
    /// Expiry as seconds since the Unix epoch.
    exp: Option<i64>,
}

/// Decode the payload segment of a three-segment token.
///
/// Returns `None` for anything structurally off: wrong segment count, bad
/// base64, or a payload that is not a JSON object.
fn decode_payload(token: &str) -> Option<TokenPayload> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    // Tokens are base64url without padding, but tolerate padded encoders.
    let trimmed = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(trimmed).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry instant of a token, if its payload declares one.
///
/// Returns `None` both for tokens without an `exp` claim and for malformed
/// tokens; callers that need to distinguish should use [`is_expired_at`].
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_payload(token)?.exp?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Whether `token` is expired at instant `now`.
///
/// A token with no `exp` claim is NOT expired. A token that cannot be decoded
/// at all IS expired: forcing re-authentication is safer than trusting a
/// malformed credential.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_payload(token) {
        None => true,
        Some(TokenPayload { exp: None }) => false,
        Some(TokenPayload { exp: Some(exp) }) => exp * 1000 < now.timestamp_millis(),
    }
}

/// Whether `token` is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn signed_token(exp: i64) -> String {
        encode(
            &Header::default(),
            &Claims {
                sub: "7".into(),
                exp,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode token")
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let token = signed_token(Utc::now().timestamp() + 3600);
        assert!(!is_expired(&token));
        assert!(expiry(&token).is_some());
    }

    #[test]
    fn past_exp_is_expired() {
        let token = signed_token(Utc::now().timestamp() - 60);
        assert!(is_expired(&token));
    }

    #[test]
    fn exp_boundary_compares_in_milliseconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).single().expect("ts");
        let token = signed_token(1_700_000_000);
        // exp * 1000 == now in ms → not strictly less → not expired.
        assert!(!is_expired_at(&token, now));
        assert!(is_expired_at(&token, now + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn token_without_exp_is_not_expired() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"7"}"#);
        let token = format!("hh.{payload}.sig");
        assert!(!is_expired(&token));
        assert!(expiry(&token).is_none());
    }

    #[test]
    fn malformed_tokens_are_expired() {
        for bad in [
            "",
            "not-a-token",
            "only.two",
            "a.b.c.d",
            "aa.!!!.cc",
            "aa.bm90IGpzb24.cc", // payload decodes but is not JSON
        ] {
            assert!(is_expired(bad), "expected expired: {bad:?}");
        }
    }

    #[test]
    fn padded_payload_is_tolerated() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"exp":1}"#);
        let token = format!("hh.{payload}.sig");
        assert!(is_expired(&token));
    }
}
