//! Recovery-key wrap of the account password.
//!
//! A recovery key is 32 bytes of full entropy, generated once and held by
//! the user alone. It is used directly as AES-256-GCM key material — no
//! PBKDF2, because there is nothing to stretch: the key is already as
//! strong as the cipher. What gets encrypted is the *password*, not the
//! vault payload; recovering the password feeds the normal unlock path in
//! [`crate::vault`]. The server stores only the resulting blob, so a
//! server-side compromise alone reveals neither password nor key.
//!
//! The display form splits the encoded key into 4-character groups joined
//! by hyphens for human transcription. The grouping carries no
//! cryptographic meaning.

use crate::codec;
use crate::crypto;
use crate::error::HeirvaultError;
use crate::keys::RecoveryKey;

/// Width of one display group in [`format_recovery_key`].
const GROUP_LEN: usize = 4;

/// Encrypt the account password under a recovery key.
///
/// Returns base64( nonce ‖ ciphertext + tag ), the same blob layout as
/// vault payloads. Stored server-side as the password-recovery blob.
pub fn encrypt_password(password: &str, key: &RecoveryKey) -> Result<String, HeirvaultError> {
    let sealed = crypto::encrypt(key.as_bytes(), password.as_bytes())?;
    Ok(codec::bytes_to_text(&sealed))
}

/// Decrypt a password-recovery blob back into the account password.
///
/// Fails with `AuthenticationFailure` when the key is wrong or the blob
/// has been tampered with. On failure the caller must discard any state
/// and return to key entry — retrying the same key cannot succeed.
pub fn decrypt_password(blob: &str, key: &RecoveryKey) -> Result<String, HeirvaultError> {
    let sealed = codec::text_to_bytes(blob)?;
    let plaintext = crypto::decrypt(key.as_bytes(), &sealed)?;

    // The tag already verified, so non-UTF-8 here can only mean the blob
    // was produced from something that was never a password.
    String::from_utf8(plaintext)
        .map_err(|_| HeirvaultError::DecodeFailure("recovered password is not valid UTF-8".into()))
}

/// Format a recovery key for one-time display.
///
/// The encoded key is split into 4-character groups joined by hyphens,
/// e.g. `dGhp-cyBp-cyBu-b3Qg...`. Shown to the user exactly once at
/// generation time; there is no way to re-display a forgotten key.
pub fn format_recovery_key(key: &RecoveryKey) -> String {
    let encoded = key.to_encoded();
    let mut display = String::with_capacity(encoded.len() + encoded.len() / GROUP_LEN);

    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            display.push('-');
        }
        display.push(c);
    }

    display
}

/// Parse a user-entered grouped key back into a [`RecoveryKey`].
///
/// Exact inverse of [`format_recovery_key`] for any key the formatter
/// produced: hyphens are stripped, the remainder must be base64 decoding
/// to exactly 32 bytes. Whitespace trimming is the caller's job.
pub fn parse_recovery_key(display: &str) -> Result<RecoveryKey, HeirvaultError> {
    let stripped: String = display.chars().filter(|c| *c != '-').collect();
    RecoveryKey::from_encoded(&stripped)
}
