//! The 16-bit checksum behind unlock codes.

use crc::{Crc, CRC_16_ARC};

use super::keys::MasterSecret;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Number of hex digits in a rendered checksum.
pub const CHECKSUM_LEN: usize = 4;

/// CRC-16/ARC over the secret bytes followed by the decimal sentinel index,
/// as four lowercase hex digits.
pub fn lock_checksum(secret: &MasterSecret, sentinel_index: i64) -> String {
    let mut digest = CRC16.digest();
    digest.update(secret.as_bytes());
    digest.update(sentinel_index.to_string().as_bytes());
    format!("{:04x}", digest.finalize())
}
