//! Symmetric key material and the message transform.
//!
//! The chat cipher is a ChaCha20 keystream XOR: one [`transform`] call
//! encrypts, the same call on the result decrypts. The 4-byte session salt
//! is expanded into the stream nonce with HKDF-SHA256.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

pub use crate::frame::{KEY_LEN, SALT_LEN};

/// Stream nonce length expected by the cipher.
const NONCE_LEN: usize = 12;

/// Generate a fresh 32-byte session key from the OS RNG.
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Generate a fresh 4-byte session salt from the OS RNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Expand the session salt into the 12-byte stream nonce.
fn salt_nonce(salt: &[u8; SALT_LEN]) -> [u8; NONCE_LEN] {
    let hk = Hkdf::<Sha256>::new(None, salt);
    let mut nonce = [0u8; NONCE_LEN];
    hk.expand(b"ETHERCHAT-SALT-NONCE", &mut nonce)
        .expect("12 bytes is a valid length for HKDF");
    nonce
}

/// XOR the key-derived keystream into `data`.
///
/// Applying the transform twice with the same key and salt returns the
/// original bytes, so the one operation serves both directions.
pub fn transform(data: &[u8], key: &[u8; KEY_LEN], salt: &[u8; SALT_LEN]) -> Vec<u8> {
    let nonce = salt_nonce(salt);
    let mut cipher = ChaCha20::new(key.into(), (&nonce).into());
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    out
}
