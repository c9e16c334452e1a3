//! Session key fingerprint logged at startup.
//!
//! Lets operators confirm which signing key a replica loaded without ever
//! printing key material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
///
/// # Examples
/// ```rust
/// use actix_web::cookie::Key;
/// use notegen::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stable_for_the_same_key_material() {
        let key = Key::derive_from(&[b'a'; 64]);
        assert_eq!(key_fingerprint(&key), key_fingerprint(&key.clone()));
    }

    #[rstest]
    fn lowercase_hex_of_fixed_width() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn distinct_keys_give_distinct_fingerprints() {
        let a = key_fingerprint(&Key::derive_from(&[b'a'; 64]));
        let b = key_fingerprint(&Key::derive_from(&[b'b'; 64]));
        assert_ne!(a, b);
    }
}
