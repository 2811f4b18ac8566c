//! Constant-time comparison for bearer tokens.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compare two secrets without leaking their content or length through timing.
///
/// Both inputs are hashed to SHA-256 digests first, then compared with
/// `subtle::ConstantTimeEq`.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_tokens_match() {
        assert!(constant_time_eq(b"metrics-token", b"metrics-token"));
    }

    #[test]
    fn different_tokens_do_not_match() {
        assert!(!constant_time_eq(b"metrics-token", b"metrics-tokeN"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!constant_time_eq(b"metrics", b"metrics-token"));
    }
}
