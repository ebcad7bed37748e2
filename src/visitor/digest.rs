use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;

/// Built-in salt mixed into every visitor digest
pub const DEFAULT_SALT: &str = "scam-shield-visitors-2024";

/// Number of hex characters kept from the SHA-256 output (64 bits)
pub const DIGEST_HEX_LEN: usize = 16;

/// Process-wide salt, installed at most once
static SALT: OnceLock<String> = OnceLock::new();

/// Install the digest salt for this process
///
/// Returns `false` when a salt was already installed; the first value wins so
/// digests stay stable for the lifetime of the process.
pub fn init_visitor_salt(salt: Option<&str>) -> bool {
    let mut installed = false;
    SALT.get_or_init(|| {
        installed = true;
        salt.unwrap_or(DEFAULT_SALT).to_string()
    });
    installed
}

fn salt() -> &'static str {
    SALT.get_or_init(|| DEFAULT_SALT.to_string())
}

/// Pseudonymous visitor identity: truncated `sha256(address + salt)` in lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitorDigest(String);

impl VisitorDigest {
    /// Digest an address with the process salt
    pub fn from_address(address: &str) -> Self {
        Self::with_salt(address, salt())
    }

    /// Digest an address with an explicit salt
    pub fn with_salt(address: &str, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(address.as_bytes());
        hasher.update(salt.as_bytes());
        let hash = hasher.finalize();
        Self(hex::encode(&hash[..DIGEST_HEX_LEN / 2]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitorDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_16_lowercase_hex_chars() {
        let digest = VisitorDigest::with_salt("203.0.113.5", DEFAULT_SALT);
        assert_eq!(digest.as_str().len(), DIGEST_HEX_LEN);
        assert!(digest
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let first = VisitorDigest::with_salt("203.0.113.5", DEFAULT_SALT);
        let second = VisitorDigest::with_salt("203.0.113.5", DEFAULT_SALT);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_addresses_have_distinct_digests() {
        let addresses = ["203.0.113.5", "203.0.113.6", "2001:db8::1", "unknown", ""];
        let digests: std::collections::HashSet<_> = addresses
            .iter()
            .map(|a| VisitorDigest::with_salt(a, DEFAULT_SALT))
            .collect();
        assert_eq!(digests.len(), addresses.len());
    }

    #[test]
    fn test_salt_changes_digest() {
        let a = VisitorDigest::with_salt("203.0.113.5", DEFAULT_SALT);
        let b = VisitorDigest::with_salt("203.0.113.5", "another-salt");
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_matches_known_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        let digest = VisitorDigest::with_salt("ab", "c");
        assert_eq!(digest.as_str(), "ba7816bf8f01cfea");
    }
}
