//! Operator session tokens
//!
//! A session token binds an operator name to the service's session secret:
//!
//! ```text
//! token = hex(name) "." hex(SHA-256(name ":" secret))
//! ```
//!
//! The name is hex encoded so any UTF-8 name survives a cookie value
//! unescaped. Pure functions only; cookie handling lives in the service.

use sha2::{Digest, Sha256};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "qadesk_session";

/// Longest operator name accepted at login
pub const MAX_OPERATOR_LEN: usize = 64;

/// Trim an operator name and reject empty or oversized names
///
/// # Examples
///
/// ```
/// use qadesk_common::session::normalize_operator;
///
/// assert_eq!(normalize_operator("  alice "), Some("alice".to_string()));
/// assert_eq!(normalize_operator("   "), None);
/// ```
pub fn normalize_operator(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_OPERATOR_LEN {
        return None;
    }
    Some(name.to_string())
}

/// Issue a signed session token for an operator
pub fn issue_token(operator: &str, secret: &str) -> String {
    format!(
        "{}.{}",
        hex_encode(operator.as_bytes()),
        signature(operator, secret)
    )
}

/// Verify a session token, returning the operator name it carries
///
/// # Examples
///
/// ```
/// use qadesk_common::session::{issue_token, verify_token};
///
/// let token = issue_token("alice", "0123456789abcdef");
/// assert_eq!(verify_token(&token, "0123456789abcdef"), Some("alice".to_string()));
/// assert_eq!(verify_token(&token, "another-secret-value"), None);
/// ```
pub fn verify_token(token: &str, secret: &str) -> Option<String> {
    let (name_hex, sig) = token.split_once('.')?;
    let name = String::from_utf8(hex_decode(name_hex)?).ok()?;
    let expected = signature(&name, secret);
    if !constant_time_eq(sig.as_bytes(), expected.as_bytes()) {
        return None;
    }
    normalize_operator(&name).filter(|n| *n == name)
}

fn signature(operator: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(operator.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-0123456789";

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("alice", SECRET);
        assert_eq!(verify_token(&token, SECRET), Some("alice".to_string()));
    }

    #[test]
    fn test_token_round_trip_non_ascii_name() {
        let token = issue_token("审核员 02", SECRET);
        assert!(token.is_ascii());
        assert_eq!(verify_token(&token, SECRET), Some("审核员 02".to_string()));
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = issue_token("alice", SECRET);
        assert_eq!(verify_token(&token, "some-other-secret-value"), None);
    }

    #[test]
    fn test_tampered_name_rejected() {
        let token = issue_token("alice", SECRET);
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", hex_encode(b"mallory"), sig);
        assert_eq!(verify_token(&forged, SECRET), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(verify_token("", SECRET), None);
        assert_eq!(verify_token("no-dot-here", SECRET), None);
        assert_eq!(verify_token("abc.def", SECRET), None);
        assert_eq!(verify_token("zz.00", SECRET), None);
    }

    #[test]
    fn test_normalize_operator_bounds() {
        assert_eq!(normalize_operator("\tbob\n"), Some("bob".to_string()));
        assert_eq!(normalize_operator(""), None);
        assert!(normalize_operator(&"x".repeat(MAX_OPERATOR_LEN)).is_some());
        assert!(normalize_operator(&"x".repeat(MAX_OPERATOR_LEN + 1)).is_none());
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes = [0u8, 1, 0x7f, 0xff];
        assert_eq!(hex_decode(&hex_encode(&bytes)), Some(bytes.to_vec()));
        assert_eq!(hex_decode("abc"), None);
    }
}
