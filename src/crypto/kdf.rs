//! Memory-hard key derivation using scrypt.
//!
//! Costs are expressed the way libsodium's `crypto_pwhash_scryptsalsa208sha256`
//! expresses them, as a memory limit in bytes and an operations limit, and
//! are mapped onto scrypt's `(log_n, r, p)` with the same selection rule.
//! Two configurations are used by the cave:
//!
//! - master and lock keys: memory `2^pow` bytes, a 32-byte zero salt, so the
//!   same seed always yields the same key;
//! - per-entry material: memory `2^20` bytes, salted with the master secret.

use scrypt::Params;
use zeroize::Zeroizing;

use super::keys::{MasterSecret, KEY_LEN};
use crate::errors::{Result, SesameError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the per-entry derived material in bytes.
pub const ENTRY_LEN: usize = 44;

/// Memory exponent used for per-entry derivation.
pub const ENTRY_POW: u32 = 20;

/// Smallest accepted memory exponent.
pub const MIN_POW: u32 = 10;

/// Largest accepted memory exponent.
pub const MAX_POW: u32 = 40;

/// Production memory exponent (1 GiB).
pub const DEFAULT_POW: u32 = 30;

/// libsodium never runs scrypt with fewer operations than this.
const MIN_OPSLIMIT: u64 = 32_768;

/// Block size parameter, fixed as in libsodium.
const SCRYPT_R: u32 = 8;

/// The salt used for master and lock keys.
const ZERO_SALT: [u8; SALT_LEN] = [0u8; SALT_LEN];

/// A scrypt cost expressed as memory and operations limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    /// Memory limit in bytes.
    pub memlimit: u64,
    /// Operations limit.
    pub opslimit: u64,
}

impl Cost {
    /// Memory `2^pow` bytes and `memory / 32` operations.
    pub fn from_pow(pow: u32) -> Result<Self> {
        if !(MIN_POW..=MAX_POW).contains(&pow) {
            return Err(SesameError::KeyDerivationFailed(format!(
                "cost exponent must be between {MIN_POW} and {MAX_POW} (got {pow})"
            )));
        }
        let memlimit = 1u64 << pow;
        Ok(Self {
            memlimit,
            opslimit: memlimit / 32,
        })
    }

    /// The fixed cost of per-entry derivation.
    pub fn entry() -> Self {
        let memlimit = 1u64 << ENTRY_POW;
        Self {
            memlimit,
            opslimit: memlimit / 32,
        }
    }

    /// Translate the limits into scrypt's `(log_n, r, p)`.
    pub fn scrypt_params(&self) -> (u8, u32, u32) {
        let opslimit = self.opslimit.max(MIN_OPSLIMIT);
        let r = u64::from(SCRYPT_R);

        if opslimit < self.memlimit / 32 {
            let max_n = opslimit / (r * 4);
            (log_n_below(max_n), SCRYPT_R, 1)
        } else {
            let max_n = self.memlimit / (r * 128);
            let log_n = log_n_below(max_n);
            let max_rp = ((opslimit / 4) >> log_n).min(0x3fff_ffff);
            let p = u32::try_from(max_rp / r).unwrap_or(u32::MAX);
            (log_n, SCRYPT_R, p)
        }
    }
}

/// Smallest `log_n >= 1` with `2^log_n > max_n / 2`.
fn log_n_below(max_n: u64) -> u8 {
    let mut log_n: u8 = 1;
    while log_n < 63 && (1u64 << log_n) <= max_n / 2 {
        log_n += 1;
    }
    log_n
}

/// Derive `output.len()` bytes from `password` and `salt` at `cost`.
pub fn derive_into(password: &[u8], salt: &[u8], cost: &Cost, output: &mut [u8]) -> Result<()> {
    if salt.len() != SALT_LEN {
        return Err(SesameError::KeyDerivationFailed(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let (log_n, r, p) = cost.scrypt_params();
    let params = Params::new(log_n, r, p, output.len())
        .map_err(|e| SesameError::KeyDerivationFailed(format!("invalid scrypt params: {e}")))?;

    scrypt::scrypt(password, salt, &params, output)
        .map_err(|e| SesameError::KeyDerivationFailed(format!("scrypt failed: {e}")))
}

/// Derive a 32-byte key from `text` with the zero salt.
///
/// Used for the master secret (from the hex seed) and the lock key (from
/// the checksum).  The same text and cost always give the same key.
pub fn derive_master_secret(text: &str, cost: &Cost) -> Result<MasterSecret> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    derive_into(text.as_bytes(), &ZERO_SALT, cost, key.as_mut())?;
    Ok(MasterSecret::new(*key))
}

/// Derive the per-entry material for a serialized entry.
pub fn derive_entry_material(
    entry: &[u8],
    secret: &MasterSecret,
) -> Result<Zeroizing<[u8; ENTRY_LEN]>> {
    let mut material = Zeroizing::new([0u8; ENTRY_LEN]);
    derive_into(entry, secret.as_bytes(), &Cost::entry(), material.as_mut())?;
    Ok(material)
}
