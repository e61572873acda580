//! Password-based encryption of vault payloads.
//!
//! The engine behind every save: serialize the payload to JSON, stretch
//! the password into a key (`keys::derive_key`), seal with AES-256-GCM
//! through `crypto`, and hand back base64 text. Decryption reverses each
//! step.
//!
//! Every call derives its key fresh from the supplied password and salt —
//! no key is cached between operations, so concurrent calls with
//! different credentials are fully independent.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::crypto::{self, NONCE_LEN, TAG_LEN};
use crate::error::HeirvaultError;
use crate::keys;

/// Fixed plaintext sealed by [`create_password_verifier`]. Decrypting a
/// verifier blob back to this marker proves the password without touching
/// vault data.
const VERIFIER_MARKER: &str = "heirvault-password-verifier";

/// Smallest decoded length a well-formed blob can have: nonce + GCM tag
/// (the ciphertext of an empty payload).
const MIN_BLOB_LEN: usize = NONCE_LEN + TAG_LEN;

/// Generate a fresh password salt, base64-encoded for storage.
///
/// Generated once per user at onboarding or password change, then reused
/// for every derivation for that user.
pub fn generate_salt() -> Result<String, HeirvaultError> {
    let salt = crypto::generate_salt()?;
    Ok(codec::bytes_to_text(&salt))
}

/// Encrypt a serializable payload under a password-derived key.
///
/// Returns base64( nonce ‖ ciphertext + tag ). The nonce is random per
/// call, so encrypting the same payload twice yields two different blobs
/// that decrypt to the same value — ciphertexts across saves cannot be
/// correlated.
pub fn encrypt<T: Serialize>(
    data: &T,
    password: &str,
    salt: &str,
) -> Result<String, HeirvaultError> {
    let plaintext = serde_json::to_vec(data)
        .map_err(|e| HeirvaultError::SerializationFailure(e.to_string()))?;

    let key = keys::derive_key(password, salt)?;
    let sealed = crypto::encrypt(key.as_bytes(), &plaintext)?;

    Ok(codec::bytes_to_text(&sealed))
}

/// Decrypt a blob produced by [`encrypt`] back into its payload.
///
/// Fails with `DecodeFailure` on malformed base64 and with
/// `AuthenticationFailure` when the GCM tag check fails — wrong password,
/// wrong salt, truncated or tampered blob all produce the same error.
pub fn decrypt<T: DeserializeOwned>(
    blob: &str,
    password: &str,
    salt: &str,
) -> Result<T, HeirvaultError> {
    let sealed = codec::text_to_bytes(blob)?;

    let key = keys::derive_key(password, salt)?;
    let plaintext = crypto::decrypt(key.as_bytes(), &sealed)?;

    serde_json::from_slice(&plaintext)
        .map_err(|e| HeirvaultError::SerializationFailure(e.to_string()))
}

/// Encrypt the fixed verifier marker under the given credentials.
///
/// The resulting blob is stored alongside the vault; [`verify_password`]
/// checks a candidate password against it without decrypting real data.
pub fn create_password_verifier(password: &str, salt: &str) -> Result<String, HeirvaultError> {
    encrypt(&VERIFIER_MARKER, password, salt)
}

/// Check a candidate password against a verifier blob.
///
/// Returns `false` on any failure — wrong password, malformed blob,
/// anything — instead of propagating. Never distinguishes causes.
pub fn verify_password(test_blob: &str, password: &str, salt: &str) -> bool {
    matches!(
        decrypt::<String>(test_blob, password, salt),
        Ok(marker) if marker == VERIFIER_MARKER
    )
}

/// Best-effort check that a JSON value looks like an encrypted blob.
///
/// True when the value is a string, is valid base64, and decodes to at
/// least nonce + tag bytes. Used to tell already-encrypted fields from
/// plaintext that has not been migrated yet. This is a heuristic, not a
/// cryptographic guarantee — it must never gate access decisions.
pub fn is_encrypted_data(value: &serde_json::Value) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };

    match codec::text_to_bytes(text) {
        Ok(bytes) => bytes.len() >= MIN_BLOB_LEN,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_salt() -> String {
        generate_salt().unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let salt = test_salt();
        let data = json!({
            "accounts": [{"bank": "Alpine Credit", "iban": "CH93..."}],
            "notes": "safe deposit box key is taped under the drawer",
        });

        let blob = encrypt(&data, "hunter2", &salt).unwrap();
        let restored: serde_json::Value = decrypt(&blob, "hunter2", &salt).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_ciphertext_differs_plaintext_stable() {
        let salt = test_salt();
        let data = json!({"k": "v"});

        let blob_a = encrypt(&data, "pw", &salt).unwrap();
        let blob_b = encrypt(&data, "pw", &salt).unwrap();
        assert_ne!(blob_a, blob_b);

        let a: serde_json::Value = decrypt(&blob_a, "pw", &salt).unwrap();
        let b: serde_json::Value = decrypt(&blob_b, "pw", &salt).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let salt = test_salt();
        let blob = encrypt(&json!("secret"), "right", &salt).unwrap();

        let result = decrypt::<serde_json::Value>(&blob, "wrong", &salt);
        assert!(matches!(result, Err(HeirvaultError::AuthenticationFailure)));
    }

    #[test]
    fn test_wrong_salt_rejected() {
        let blob = encrypt(&json!("secret"), "pw", &test_salt()).unwrap();

        let result = decrypt::<serde_json::Value>(&blob, "pw", &test_salt());
        assert!(matches!(result, Err(HeirvaultError::AuthenticationFailure)));
    }

    #[test]
    fn test_verifier() {
        let salt = test_salt();
        let verifier = create_password_verifier("pw", &salt).unwrap();

        assert!(verify_password(&verifier, "pw", &salt));
        assert!(!verify_password(&verifier, "wrong", &salt));
        assert!(!verify_password("garbage-not-base64", "pw", &salt));
    }

    #[test]
    fn test_is_encrypted_data_boundaries() {
        assert!(!is_encrypted_data(&json!("")));
        assert!(!is_encrypted_data(&json!(42)));
        assert!(!is_encrypted_data(&json!(null)));
        assert!(!is_encrypted_data(&json!("not-base64!!")));

        // Base64 of fewer than nonce + tag bytes: too short to be a blob.
        let short = codec::bytes_to_text(&[0u8; MIN_BLOB_LEN - 1]);
        assert!(!is_encrypted_data(&json!(short)));

        // A real blob passes.
        let salt = test_salt();
        let blob = encrypt(&json!({}), "pw", &salt).unwrap();
        assert!(is_encrypted_data(&json!(blob)));

        // So does any base64 of at least nonce + tag bytes.
        let lookalike = codec::bytes_to_text(&[0u8; MIN_BLOB_LEN]);
        assert!(is_encrypted_data(&json!(lookalike)));
    }
}
