//! Random identifier and payload generation.
//!
//! Bucket names, object keys and object bodies left unspecified on the
//! command line are synthesized here so example invocations do not require
//! the caller to invent unique names.

use rand::Rng;

/// Uppercase-alphanumeric charset used for all generated material.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BUCKET_NAME_LEN: usize = 6;
const OBJECT_KEY_LEN: usize = 10;

/// Default generated object body size in bytes.
pub const DEFAULT_PAYLOAD_LEN: usize = 64;

/// Generate a random bucket name, exactly 6 uppercase-alphanumeric chars.
pub fn bucket_name() -> String {
    alphanumeric(BUCKET_NAME_LEN)
}

/// Generate a random object key, exactly 10 uppercase-alphanumeric chars.
pub fn object_key() -> String {
    alphanumeric(OBJECT_KEY_LEN)
}

/// Generate `len` bytes of random uppercase-alphanumeric content.
pub fn payload(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())])
        .collect()
}

fn alphanumeric(len: usize) -> String {
    // payload() only ever emits ASCII from CHARSET
    String::from_utf8(payload(len)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_charset(s: &[u8]) {
        assert!(s.iter().all(|b| CHARSET.contains(b)));
    }

    #[test]
    fn test_bucket_name_shape() {
        let name = bucket_name();
        assert_eq!(name.len(), 6);
        assert_charset(name.as_bytes());
    }

    #[test]
    fn test_object_key_shape() {
        let key = object_key();
        assert_eq!(key.len(), 10);
        assert_charset(key.as_bytes());
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(payload(0).len(), 0);
        assert_eq!(payload(DEFAULT_PAYLOAD_LEN).len(), 64);
        let body = payload(1000);
        assert_eq!(body.len(), 1000);
        assert_charset(&body);
    }

    #[test]
    fn test_names_vary() {
        // Two draws colliding on a 36^10 space would point at a broken RNG.
        assert_ne!(object_key(), object_key());
    }
}
