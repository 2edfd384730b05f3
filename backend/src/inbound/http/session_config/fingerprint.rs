//! Short, non-reversible label for the cookie signing key.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const LABEL_LEN: usize = 16;

/// First sixteen hex digits of `SHA-256(signing key)`.
///
/// Two instances log the same label exactly when they share a key.
///
/// ```rust
/// use actix_web::cookie::Key;
/// use events_backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let key = Key::derive_from(&[7; 64]);
/// assert_eq!(key_fingerprint(&key), key_fingerprint(&key.clone()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let mut label = hex::encode(Sha256::digest(key.signing()));
    label.truncate(LABEL_LEN);
    label
}
