//! Cryptographic primitives for Sesame.
//!
//! This module provides:
//! - AES-256-GCM sealed blobs and sealed files (`encryption`)
//! - scrypt key derivation with libsodium-style costs (`kdf`)
//! - The zeroizing `MasterSecret` (`keys`)
//! - The CRC-16 lock checksum (`checksum`)

pub mod checksum;
pub mod encryption;
pub mod kdf;
pub mod keys;

pub use checksum::lock_checksum;
pub use encryption::{open, read_sealed, seal, write_sealed};
pub use kdf::{derive_entry_material, derive_master_secret, Cost};
pub use keys::MasterSecret;
