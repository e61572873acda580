//! # heirvault
//!
//! Zero-knowledge client-side encryption core for estate vaults.
//!
//! The server never sees plaintext: the client encrypts the vault payload
//! under a password-derived key ([`vault`]), keeps the password
//! recoverable through a user-held recovery key ([`recovery`]), and keeps
//! relative-access share tokens consistent across password changes
//! ([`share`]).
//!
//! ## Public API
//!
//! The public surface of this crate is intentionally narrow. Only the
//! modules and functions listed here are intended for use by callers.
//! Key derivation and the AEAD layer are `pub(crate)`; key material is
//! held in opaque types that are zeroised on drop and never serialized.

// Module declarations.
pub mod codec;
pub(crate) mod crypto;
pub mod error;
pub(crate) mod keys;
pub mod recovery;
pub mod share;
pub mod vault;

pub use keys::RecoveryKey;

use error::HeirvaultError;

/// Generate a cryptographically secure recovery key.
///
/// This is the only entry point for producing raw key material. The
/// returned [`RecoveryKey`] is the sole method of account recovery: it
/// must be displayed to the user exactly once
/// ([`recovery::format_recovery_key`]) and is not retrievable afterward —
/// the crate can accept a key as input but cannot reproduce a forgotten
/// one.
pub fn generate_recovery_key() -> Result<RecoveryKey, HeirvaultError> {
    let bytes = crypto::generate_random_key()?;
    Ok(RecoveryKey::from_bytes(bytes))
}
