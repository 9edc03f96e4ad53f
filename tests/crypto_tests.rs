//! Integration tests for the Sesame crypto module.

use sesame::crypto::kdf::{derive_into, Cost, ENTRY_LEN};
use sesame::crypto::{derive_entry_material, derive_master_secret, lock_checksum, open, seal, MasterSecret};
use sesame::errors::SesameError;

// ---------------------------------------------------------------------------
// Sealing round-trip
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = br#"{"sesame":{"cave":0}}"#;

    let sealed = seal(&key, plaintext).expect("seal should succeed");

    // 12-byte nonce + 16-byte tag around the ciphertext.
    assert_eq!(sealed.len(), plaintext.len() + 28);

    let recovered = open(&key, &sealed).expect("open should succeed");
    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn seal_produces_different_blobs_each_time() {
    let key = [0xCDu8; 32];
    let plaintext = b"same store";

    let first = seal(&key, plaintext).expect("seal 1");
    let second = seal(&key, plaintext).expect("seal 2");

    assert_ne!(first, second, "each seal must use a fresh nonce");
}

#[test]
fn open_with_wrong_key_fails() {
    let sealed = seal(&[0x11u8; 32], b"secret").expect("seal");
    let result = open(&[0x22u8; 32], &sealed);
    assert!(matches!(result, Err(SesameError::Crypto)));
}

#[test]
fn open_with_truncated_data_fails() {
    let result = open(&[0xAAu8; 32], &[0u8; 5]);
    assert!(matches!(result, Err(SesameError::Crypto)));
}

#[test]
fn open_with_tampered_data_fails() {
    let key = [0xBBu8; 32];
    let mut sealed = seal(&key, b"index data").expect("seal");
    // Flip a byte after the nonce.
    if let Some(byte) = sealed.get_mut(15) {
        *byte ^= 0xFF;
    }
    assert!(matches!(open(&key, &sealed), Err(SesameError::Crypto)));
}

#[test]
fn seal_rejects_short_keys() {
    assert!(matches!(
        seal(&[0u8; 16], b"x"),
        Err(SesameError::EncryptionFailed(_))
    ));
}

// ---------------------------------------------------------------------------
// Key derivation (scrypt)
// ---------------------------------------------------------------------------

#[test]
fn master_secret_is_deterministic() {
    let cost = Cost::from_pow(20).unwrap();
    let a = derive_master_secret("00ff00ff00ff00ff00ff00", &cost).expect("derive 1");
    let b = derive_master_secret("00ff00ff00ff00ff00ff00", &cost).expect("derive 2");
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn master_secret_depends_on_text_and_cost() {
    let low = Cost::from_pow(18).unwrap();
    let high = Cost::from_pow(20).unwrap();

    let a = derive_master_secret("aaaa", &high).unwrap();
    let b = derive_master_secret("aaab", &high).unwrap();
    let c = derive_master_secret("aaaa", &low).unwrap();

    assert_ne!(a.as_bytes(), b.as_bytes());
    assert_ne!(a.as_bytes(), c.as_bytes());
}

#[test]
fn cost_exponent_is_bounded() {
    assert!(Cost::from_pow(9).is_err());
    assert!(Cost::from_pow(41).is_err());
    assert!(Cost::from_pow(10).is_ok());
}

#[test]
fn derivation_requires_a_full_salt() {
    let mut out = [0u8; 32];
    let result = derive_into(b"pw", &[0u8; 16], &Cost::entry(), &mut out);
    assert!(matches!(result, Err(SesameError::KeyDerivationFailed(_))));
}

#[test]
fn entry_material_is_salted_with_the_secret() {
    let entry = br#"{"service":"foo","user":"bar","index":0}"#;
    let one = MasterSecret::new([1u8; 32]);
    let two = MasterSecret::new([2u8; 32]);

    let a = derive_entry_material(entry, &one).unwrap();
    let again = derive_entry_material(entry, &one).unwrap();
    let b = derive_entry_material(entry, &two).unwrap();

    assert_eq!(a.len(), ENTRY_LEN);
    assert_eq!(*a, *again);
    assert_ne!(*a, *b);
}

// ---------------------------------------------------------------------------
// Lock checksum
// ---------------------------------------------------------------------------

#[test]
fn lock_checksum_binds_secret_and_index() {
    let secret = MasterSecret::new([7u8; 32]);
    let checksum = lock_checksum(&secret, 0);

    assert_eq!(checksum.len(), 4);
    assert!(checksum
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    assert_eq!(checksum, lock_checksum(&secret, 0));
    assert_ne!(
        lock_checksum(&secret, 0),
        lock_checksum(&MasterSecret::new([8u8; 32]), 0)
    );
}
