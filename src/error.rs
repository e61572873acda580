//! Error types for heirvault.
//!
//! Every error variant is a distinct failure mode in the encryption
//! subsystem. Error messages are intentionally minimal — they signal
//! *what* failed without revealing *why* in ways that could leak
//! cryptographic state. In particular, `AuthenticationFailure` carries a
//! single message for every cause: distinguishing a wrong key from a
//! tampered ciphertext would hand an attacker an oracle.

use std::fmt;

/// The single error type for all heirvault operations.
#[derive(Debug)]
pub enum HeirvaultError {
    /// A cryptographic key was invalid (wrong length, malformed, etc.).
    InvalidKey,

    /// Encryption failed. The underlying `ring` operation returned an error.
    EncryptionFailure,

    /// Authenticated decryption failed the GCM tag check. This covers:
    /// wrong password, wrong recovery key or PIN, truncated blob, or
    /// tampered ciphertext. Callers must not attempt to tell these apart.
    AuthenticationFailure,

    /// Key derivation (PBKDF2) failed.
    KeyDerivationFailure,

    /// The system's random number generator failed to produce bytes.
    RandomnessFailure,

    /// Malformed base64 or malformed grouped-key input. Input validation
    /// only — safe to surface precisely.
    DecodeFailure(String),

    /// A payload could not be serialized before encryption, or could not
    /// be deserialized after a successful authenticated decryption.
    SerializationFailure(String),

    /// The share-token store reported a failure. The consistency manager
    /// converts this into a not-success outcome rather than propagating.
    Persistence(String),
}

impl fmt::Display for HeirvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "invalid key"),
            Self::EncryptionFailure => write!(f, "encryption failed"),
            Self::AuthenticationFailure => write!(f, "invalid key or password"),
            Self::KeyDerivationFailure => write!(f, "key derivation failed"),
            Self::RandomnessFailure => write!(f, "randomness source failed"),
            Self::DecodeFailure(reason) => write!(f, "decode failed: {}", reason),
            Self::SerializationFailure(reason) => write!(f, "serialization failed: {}", reason),
            Self::Persistence(reason) => write!(f, "persistence failure: {}", reason),
        }
    }
}

impl std::error::Error for HeirvaultError {}
