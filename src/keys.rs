//! Key derivation and ownership.
//!
//! This module owns two responsibilities:
//! 1. Stretching a user password into a 256-bit key with PBKDF2-HMAC-SHA256.
//! 2. Holding key material in types that are opaque, non-cloneable, and
//!    zeroised on drop.
//!
//! This is one of exactly two modules permitted to import `ring` directly
//! (the other is `crypto`). The derivation logic lives here because it
//! operates on the key material itself — not on ciphertexts.
//!
//! ## Derivation structure
//!
//! ```text
//! PBKDF2-HMAC-SHA256(
//!     password   = user password,
//!     salt       = 16 random bytes, stored per user,
//!     iterations = 100,000,
//!     output     = 32 bytes
//! )
//! ```
//!
//! The iteration count is the deliberate cost of the scheme: an attacker
//! holding a captured salt + ciphertext pair pays it once per password
//! guess. Derivation is deterministic — the same (password, salt) pair
//! always yields the same key, so nothing derived is ever persisted.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroize;

use crate::codec;
use crate::crypto::{KEY_LEN, SALT_LEN};
use crate::error::HeirvaultError;

/// PBKDF2 iteration count. Every deployed blob was derived at this cost;
/// changing it changes every derived key.
pub(crate) const PBKDF2_ITERATIONS: u32 = 100_000;

static PBKDF2_ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

// ---------------------------------------------------------------------------
// Derived key
// ---------------------------------------------------------------------------

/// A key derived from a password and salt.
///
/// - Not `Clone`. Each derived key is a single-use value scoped to one
///   encrypt or decrypt operation.
/// - Zeroised on drop.
/// - Raw bytes never leave the crate. Other modules access derived keys
///   only through `as_bytes()`, which is `pub(crate)`.
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Borrow the raw key bytes for use in encrypt/decrypt operations.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Recovery key
// ---------------------------------------------------------------------------

/// A 32-byte high-entropy recovery secret, held by the user alone.
///
/// Unlike [`DerivedKey`] it is not stretched from anything — it is full
/// entropy from the system CSPRNG and is used directly as AES-256-GCM key
/// material. It is shown to the user exactly once at generation time; the
/// crate can accept one as input but has no way to reproduce a forgotten
/// one.
///
/// - Not `Clone`.
/// - Zeroised on drop.
pub struct RecoveryKey {
    bytes: [u8; KEY_LEN],
}

impl RecoveryKey {
    /// Construct a `RecoveryKey` from raw bytes.
    ///
    /// `pub(crate)` — callers obtain keys through
    /// `crate::generate_recovery_key()` or [`RecoveryKey::from_encoded`].
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Borrow the raw key bytes for use in encrypt/decrypt operations.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// The base64 wire form of the key.
    pub fn to_encoded(&self) -> String {
        codec::bytes_to_text(&self.bytes)
    }

    /// Reconstruct a key from its base64 wire form.
    ///
    /// Fails with `DecodeFailure` on malformed base64 or on input that
    /// does not decode to exactly 32 bytes.
    pub fn from_encoded(text: &str) -> Result<Self, HeirvaultError> {
        let mut decoded = codec::text_to_bytes(text)?;
        if decoded.len() != KEY_LEN {
            decoded.zeroize();
            return Err(HeirvaultError::DecodeFailure(format!(
                "recovery key must decode to {} bytes",
                KEY_LEN
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }
}

impl Drop for RecoveryKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive a key from a password and a base64-encoded salt.
///
/// The salt text is decoded to its raw 16 bytes before derivation; a salt
/// that is not valid base64 or has the wrong length is rejected before any
/// key material is touched.
pub(crate) fn derive_key(password: &str, salt: &str) -> Result<DerivedKey, HeirvaultError> {
    let salt_bytes = codec::text_to_bytes(salt)?;
    if salt_bytes.len() != SALT_LEN {
        return Err(HeirvaultError::DecodeFailure(format!(
            "salt must decode to {} bytes",
            SALT_LEN
        )));
    }

    let iterations =
        NonZeroU32::new(PBKDF2_ITERATIONS).ok_or(HeirvaultError::KeyDerivationFailure)?;

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::derive(
        PBKDF2_ALGORITHM,
        iterations,
        &salt_bytes,
        password.as_bytes(),
        &mut bytes,
    );

    Ok(DerivedKey { bytes })
}
