//! Share-token consistency across password changes.
//!
//! A share token grants a relative decrypt access, optionally carrying the
//! account password sealed under a PIN-derived key
//! (`encrypted_recovery_key`). That material is bound to the password that
//! was current when the token was issued: after a password change it can
//! never decrypt to anything useful again. This module owns the invariant
//! that no active token keeps such stale material — it is cleared, not
//! migrated, because re-sealing would require the PIN in plaintext.
//!
//! Any code path that changes a user's password MUST call
//! [`invalidate_share_token_encryption`] before confirming success, and
//! should call [`count_affected_share_tokens`] beforehand to warn the user
//! how many relative-access links will fall back to manual recovery-key
//! entry.
//!
//! Persistence is reached through the [`ShareTokenStore`] trait. Implement
//! it over the real token table; [`MemoryShareTokenStore`] is the built-in
//! single-process implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::crypto;
use crate::error::HeirvaultError;
use crate::keys;

/// One share-token row, as this crate sees it.
///
/// The crate reads `user_id` and `is_active` as filters, reads
/// `encrypted_recovery_key` to detect presence, and writes it to `None` on
/// invalidation. Everything else on the row belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareToken {
    pub id: String,
    pub user_id: String,
    pub is_active: bool,
    /// The account password sealed under a PIN-derived key, or `None` once
    /// invalidated. Absence is the signal the relative-facing flow uses to
    /// fall back to manual recovery-key entry.
    pub encrypted_recovery_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The persistence boundary for share tokens. Implement this to back the
/// consistency manager with a database table or other persistent store.
pub trait ShareTokenStore {
    /// Count active tokens for `user_id` whose recovery material is
    /// present.
    fn count_recovery_material(&self, user_id: &str) -> Result<u64, HeirvaultError>;

    /// Clear recovery material on every active token for `user_id` that
    /// has it, returning how many rows changed.
    ///
    /// Implementations MUST perform the select-and-clear as one atomic
    /// operation — a single conditional bulk update, or both steps inside
    /// one transaction — so a token created concurrently cannot slip
    /// between the read and the write.
    fn clear_recovery_material(&mut self, user_id: &str) -> Result<u64, HeirvaultError>;
}

/// Result of an invalidation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationOutcome {
    /// False when the store failed; the caller must then assume the
    /// invalidation did not happen and block the password change.
    pub success: bool,
    /// Number of tokens whose recovery material was cleared.
    pub affected_count: u64,
}

/// Clear stale recovery material on every active share token for a user.
///
/// Called synchronously as part of the password-change transaction. A
/// store failure degrades to `{ success: false, affected_count: 0 }` —
/// undercounting is the safe direction, because falsely claiming
/// invalidation leaves relatives holding material that silently cannot
/// decrypt.
pub fn invalidate_share_token_encryption(
    store: &mut dyn ShareTokenStore,
    user_id: &str,
) -> InvalidationOutcome {
    match store.clear_recovery_material(user_id) {
        Ok(affected_count) => InvalidationOutcome {
            success: true,
            affected_count,
        },
        Err(_) => InvalidationOutcome {
            success: false,
            affected_count: 0,
        },
    }
}

/// Read-only precondition check before a password change: how many active
/// tokens will lose their one-click recovery. Returns `0` on store
/// failure.
pub fn count_affected_share_tokens(store: &dyn ShareTokenStore, user_id: &str) -> u64 {
    store.count_recovery_material(user_id).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// PIN-sealed recovery material
// ---------------------------------------------------------------------------

/// Seal the account password under a PIN for embedding in a share token.
///
/// A PIN has far less entropy than a recovery key, so it is stretched
/// through the same PBKDF2 discipline as the password itself before use
/// as key material. The salt is the caller's to generate
/// ([`crate::vault::generate_salt`]) and persist on the token row beside
/// the blob.
pub fn seal_recovery_material(
    password: &str,
    pin: &str,
    pin_salt: &str,
) -> Result<String, HeirvaultError> {
    let key = keys::derive_key(pin, pin_salt)?;
    let sealed = crypto::encrypt(key.as_bytes(), password.as_bytes())?;
    Ok(codec::bytes_to_text(&sealed))
}

/// Open PIN-sealed recovery material back into the account password.
///
/// Fails with `AuthenticationFailure` on a wrong PIN or tampered blob.
pub fn open_recovery_material(
    blob: &str,
    pin: &str,
    pin_salt: &str,
) -> Result<String, HeirvaultError> {
    let sealed = codec::text_to_bytes(blob)?;
    let key = keys::derive_key(pin, pin_salt)?;
    let plaintext = crypto::decrypt(key.as_bytes(), &sealed)?;

    String::from_utf8(plaintext)
        .map_err(|_| HeirvaultError::DecodeFailure("recovered password is not valid UTF-8".into()))
}

// ---------------------------------------------------------------------------
// Built-in store: in-memory
// ---------------------------------------------------------------------------

/// In-memory share-token store.
///
/// The built-in implementation behind [`ShareTokenStore`], used by tests
/// and single-process callers. The clear is a single pass over the rows
/// under `&mut self`, so nothing can interleave with it.
#[derive(Debug, Default)]
pub struct MemoryShareTokenStore {
    tokens: Vec<ShareToken>,
}

impl MemoryShareTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token row.
    pub fn insert(&mut self, token: ShareToken) {
        self.tokens.push(token);
    }

    /// Look up a token by id.
    pub fn get(&self, id: &str) -> Option<&ShareToken> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// All rows, in insertion order.
    pub fn tokens(&self) -> &[ShareToken] {
        &self.tokens
    }
}

impl ShareTokenStore for MemoryShareTokenStore {
    fn count_recovery_material(&self, user_id: &str) -> Result<u64, HeirvaultError> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.is_active && t.encrypted_recovery_key.is_some())
            .count() as u64)
    }

    fn clear_recovery_material(&mut self, user_id: &str) -> Result<u64, HeirvaultError> {
        let mut affected = 0;
        for token in &mut self.tokens {
            if token.user_id == user_id && token.is_active && token.encrypted_recovery_key.is_some()
            {
                token.encrypted_recovery_key = None;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
