//! Sealed blobs and the files that hold them.
//!
//! The cave file and the lock file share one format: a fresh random
//! 12-byte nonce followed by the AES-256-GCM ciphertext and tag.  There is
//! no header or version byte, so nothing but the key tells one sealed file
//! from another.
//!
//! Layout of a sealed blob:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! Opening never distinguishes a wrong key from a damaged blob: both are
//! `SesameError::Crypto`.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::errors::{Result, SesameError};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes a sealed blob adds to its plaintext.
pub const OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Seal `plaintext` under a 32-byte `key`.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SesameError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| SesameError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a blob produced by [`seal`].
///
/// The plaintext comes back in a zeroizing buffer since it is either the
/// store or a master secret.
pub fn open(key: &[u8], sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    // Anything shorter cannot even carry a tag.
    if sealed.len() < OVERHEAD {
        return Err(SesameError::Crypto);
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SesameError::Crypto)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| SesameError::Crypto)
}

/// Read and open the sealed file at `path`.
///
/// A missing or unreadable file is an IO error; everything after that is
/// `SesameError::Crypto`.
pub fn read_sealed(path: &Path, key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let sealed = fs::read(path)?;
    open(key, &sealed)
}

/// Seal `plaintext` and replace the file at `path` with it.
///
/// Returns the size written.
pub fn write_sealed(path: &Path, key: &[u8], plaintext: &[u8]) -> Result<usize> {
    let sealed = seal(key, plaintext)?;
    write_atomic(path, &sealed)?;
    Ok(sealed.len())
}

/// Write `data` to `path` via a sibling temp file and a rename, so readers
/// never see a half-written file.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
