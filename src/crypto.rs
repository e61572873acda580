//! Low-level cryptographic operations.
//!
//! This module is one of exactly two places in the crate that import `ring`
//! directly (the other is `keys`). All other modules perform encryption and
//! decryption exclusively through the functions exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption)
//! - **Nonce**: 96-bit (12 bytes), generated fresh per encryption call via `SystemRandom`
//! - **Key size**: 256 bits (32 bytes)
//! - **Salt size**: 128 bits (16 bytes), generated once per user

use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::HeirvaultError;

/// The AEAD algorithm used throughout heirvault.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Size of a derived or recovery key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of a password salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Fill a buffer from the system CSPRNG.
///
/// `ring::rand::SystemRandom` is the only source of randomness in the
/// crate. Nonces, salts, and recovery keys all come from here; nothing is
/// ever counter-based or seeded from a predictable source.
fn fill_random(buf: &mut [u8]) -> Result<(), HeirvaultError> {
    let rng = SystemRandom::new();
    rng.fill(buf).map_err(|_| HeirvaultError::RandomnessFailure)
}

/// Encrypt a plaintext payload using AES-256-GCM.
///
/// Returns the nonce prepended to the ciphertext. The caller does not need
/// to manage the nonce separately — it is bundled with the output and
/// extracted automatically during decryption. A fresh nonce is generated
/// for every call, so two encryptions of the same plaintext under the same
/// key produce different output.
///
/// # Layout of returned bytes
/// ```text
/// [ nonce (12 bytes) ][ ciphertext + GCM tag ]
/// ```
pub fn encrypt(key_bytes: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, HeirvaultError> {
    let unbound = UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| HeirvaultError::InvalidKey)?;
    let key = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    fill_random(&mut nonce_bytes)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // `seal_in_place_append_tag` encrypts the buffer in place and appends
    // the GCM authentication tag.
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| HeirvaultError::EncryptionFailure)?;

    let mut output = Vec::with_capacity(NONCE_LEN + in_out.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&in_out);
    Ok(output)
}

/// Decrypt a payload using AES-256-GCM.
///
/// Expects the input to be in the layout produced by `encrypt`: nonce
/// (12 bytes) followed by ciphertext and GCM tag.
///
/// If the key is wrong or the ciphertext has been truncated or tampered
/// with, the GCM authentication check fails and this function returns
/// `AuthenticationFailure` — the same error for every cause. The caller
/// receives no partial plaintext.
pub fn decrypt(key_bytes: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>, HeirvaultError> {
    if blob.len() < NONCE_LEN {
        return Err(HeirvaultError::AuthenticationFailure);
    }

    let nonce_bytes: [u8; NONCE_LEN] = blob[..NONCE_LEN]
        .try_into()
        .map_err(|_| HeirvaultError::AuthenticationFailure)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let unbound = UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| HeirvaultError::InvalidKey)?;
    let key = LessSafeKey::new(unbound);

    let mut payload = blob[NONCE_LEN..].to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut payload)
        .map_err(|_| HeirvaultError::AuthenticationFailure)?;

    Ok(plaintext.to_vec())
}

/// Generate a cryptographically secure random key.
///
/// This is the only function in the crate that produces raw key material
/// from scratch. It backs `generate_recovery_key()` in the public API.
pub fn generate_random_key() -> Result<[u8; KEY_LEN], HeirvaultError> {
    let mut key = [0u8; KEY_LEN];
    fill_random(&mut key)?;
    Ok(key)
}

/// Generate a random password salt.
///
/// Generated once per user and stored alongside the ciphertext; the salt
/// is not secret, it only binds a password to its derived key.
pub fn generate_salt() -> Result<[u8; SALT_LEN], HeirvaultError> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;
    Ok(salt)
}
