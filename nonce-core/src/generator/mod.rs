//! Shared bit-packing between the three nonce generators.
//!
//! Every width shares the same prefix layout — 42 timestamp bits, then 9
//! machine-ID bits — so the packing math lives here once instead of being
//! repeated in `counter.rs`/`sortable.rs`/`encrypted.rs`.

mod counter;
mod encrypted;
mod sortable;

pub(crate) use counter::nonce as counter_nonce;
pub(crate) use encrypted::encrypted_nonce;
pub(crate) use sortable::{cas_retry_count, sortable_nonce};

use crate::constants::{low_bits_mask, COUNTER_BITS_64, COUNTER_BITS_96, MACHINE_ID_BITS, TIMESTAMP_BITS};
use crate::error::{NonceError, Result};

/// Which generator produced the plaintext nonce an encrypted nonce wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceBase {
    Counter,
    Sortable,
}

/// Packs `(timestamp, machine_id, counter)` into a big-endian byte string of
/// `width` bits, per the bit-layout table in §3: 42 timestamp bits, then 9
/// machine-ID bits, then a width-specific counter/payload field (with 13
/// zero-padding bits ahead of the counter for `width = 128`).
pub(crate) fn to_nonce(timestamp: u64, machine_id: u16, counter: u64, width: u16) -> Result<Vec<u8>> {
    let ts = (timestamp as u128) & (low_bits_mask(TIMESTAMP_BITS) as u128);
    let mid = (machine_id as u128) & (low_bits_mask(MACHINE_ID_BITS) as u128);

    let value: u128 = match width {
        64 => {
            let cnt = (counter as u128) & (low_bits_mask(COUNTER_BITS_64) as u128);
            (ts << (MACHINE_ID_BITS + COUNTER_BITS_64)) | (mid << COUNTER_BITS_64) | cnt
        }
        96 => {
            let cnt = (counter as u128) & (low_bits_mask(COUNTER_BITS_96) as u128);
            (ts << (MACHINE_ID_BITS + COUNTER_BITS_96)) | (mid << COUNTER_BITS_96) | cnt
        }
        128 => {
            // 13 zero-padding bits sit between the machine-ID field and the
            // full 64-bit counter; since `value` starts at zero those bits
            // need no explicit write.
            let cnt = counter as u128;
            (ts << 86) | (mid << 77) | cnt
        }
        other => return Err(NonceError::UnsupportedWidth(other)),
    };

    let bytes = value.to_be_bytes();
    let byte_width = (width as usize) / 8;
    Ok(bytes[16 - byte_width..].to_vec())
}

/// Decodes the leading 42 timestamp bits out of a nonce of any width.
pub(crate) fn decode_timestamp(nonce: &[u8]) -> Result<u64> {
    let bit_width = (nonce.len() * 8) as u32;
    if nonce.is_empty() || nonce.len() > 16 {
        return Err(NonceError::UnsupportedWidth(bit_width as u16));
    }
    let mut padded = [0u8; 16];
    padded[16 - nonce.len()..].copy_from_slice(nonce);
    let value = u128::from_be_bytes(padded);
    Ok((value >> (bit_width - TIMESTAMP_BITS)) as u64)
}
