//! End-to-end password recovery: recovery key → password → vault.

use heirvault::{generate_recovery_key, recovery, vault};
use serde_json::json;

#[test]
fn test_full_recovery_flow() {
    // Onboarding: salt, vault blob, recovery key, password-recovery blob.
    let password = "correct horse battery staple";
    let salt = vault::generate_salt().unwrap();
    let vault_blob = vault::encrypt(&json!({"will": "stored at notary Keller"}), password, &salt)
        .unwrap();

    let key = generate_recovery_key().unwrap();
    let recovery_blob = recovery::encrypt_password(password, &key).unwrap();

    // The user is shown the grouped form exactly once and writes it down.
    let written_down = recovery::format_recovery_key(&key);

    // Months later: password forgotten, key re-entered from paper.
    let reentered = recovery::parse_recovery_key(&written_down).unwrap();
    let recovered_password = recovery::decrypt_password(&recovery_blob, &reentered).unwrap();
    assert_eq!(recovered_password, password);

    // The recovered password unlocks the vault through the normal path.
    let payload: serde_json::Value =
        vault::decrypt(&vault_blob, &recovered_password, &salt).unwrap();
    assert_eq!(payload["will"], "stored at notary Keller");
}

#[test]
fn test_wrong_recovery_key_returns_to_entry() {
    // The unlock flow: Decrypting -> Failed sends the user back to key
    // entry; a different 32-byte key must never decrypt the blob.
    let key = generate_recovery_key().unwrap();
    let blob = recovery::encrypt_password("pw", &key).unwrap();

    let wrong = generate_recovery_key().unwrap();
    assert!(recovery::decrypt_password(&blob, &wrong).is_err());

    // The right key still works afterwards — failure left no state behind.
    assert_eq!(recovery::decrypt_password(&blob, &key).unwrap(), "pw");
}

#[test]
fn test_format_is_transcribable_and_invertible() {
    for _ in 0..8 {
        let key = generate_recovery_key().unwrap();
        let display = recovery::format_recovery_key(&key);

        // Groups of at most 4, hyphen-separated, nothing else.
        assert!(display
            .chars()
            .all(|c| c == '-' || c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
        for group in display.split('-') {
            assert!((1..=4).contains(&group.len()));
        }

        let parsed = recovery::parse_recovery_key(&display).unwrap();
        assert_eq!(parsed.to_encoded(), key.to_encoded());
    }
}

#[test]
fn test_parser_rejects_partial_keys() {
    let key = generate_recovery_key().unwrap();
    let display = recovery::format_recovery_key(&key);

    // A dropped trailing group is a decode error, not a crypto error.
    let truncated = display.rsplit_once('-').unwrap().0;
    assert!(recovery::parse_recovery_key(truncated).is_err());
}

#[test]
fn test_recovery_keys_are_unique() {
    let a = generate_recovery_key().unwrap();
    let b = generate_recovery_key().unwrap();
    assert_ne!(a.to_encoded(), b.to_encoded());
}
