//! Symmetric encrypt/decrypt codec (spec.md §4.4).
//!
//! `encrypt`/`decrypt` are inverses under the factory's configured cipher
//! for a given width, recovered here from the input's byte length. They are
//! only safe to use on blocks this factory's generators produced — no
//! padding, no authentication, no IV diversification is performed, and none
//! is added by decoding a ciphertext that was never validly encrypted.

use crate::error::{NonceError, Result};
use crate::state::FactoryState;

fn cipher_for<'a>(state: &'a FactoryState, width: u16) -> Result<&'a crate::crypto::CipherContext> {
    match width {
        64 => state.cipher64.as_ref(),
        96 => state.cipher96.as_ref(),
        128 => state.cipher128.as_ref(),
        _ => None,
    }
    .ok_or(NonceError::NoCipherConfigured(width))
}

pub(crate) fn encrypt(state: &FactoryState, nonce: &[u8]) -> Result<Vec<u8>> {
    let width = (nonce.len() * 8) as u16;
    let ctx = cipher_for(state, width)?;

    if width == 96 && ctx.native_block_len() == 8 {
        if nonce[8..12] != [0, 0, 0, 0] {
            return Err(NonceError::InvalidTail);
        }
        let mut block = nonce[..8].to_vec();
        ctx.encrypt_block(&mut block);
        block.extend_from_slice(&[0u8; 4]);
        return Ok(block);
    }

    let mut block = nonce.to_vec();
    ctx.encrypt_block(&mut block);
    Ok(block)
}

pub(crate) fn decrypt(state: &FactoryState, nonce: &[u8]) -> Result<Vec<u8>> {
    let width = (nonce.len() * 8) as u16;
    let ctx = cipher_for(state, width)?;

    if width == 96 && ctx.native_block_len() == 8 {
        if nonce[8..12] != [0, 0, 0, 0] {
            return Err(NonceError::InvalidTail);
        }
        let mut block = nonce[..8].to_vec();
        ctx.decrypt_block(&mut block);
        block.extend_from_slice(&[0u8; 4]);
        return Ok(block);
    }

    let mut block = nonce.to_vec();
    ctx.decrypt_block(&mut block);
    Ok(block)
}

/// Decodes a sortable nonce's leading 42 bits into a UTC datetime, using the
/// factory's configured epoch.
pub(crate) fn get_datetime(state: &FactoryState, nonce: &[u8]) -> Result<chrono::DateTime<chrono::Utc>> {
    let ts = crate::generator::decode_timestamp(nonce)?;
    let millis = state.epoch_ms + ts as i64;
    chrono::DateTime::from_timestamp_millis(millis).ok_or(NonceError::TimestampOverflow)
}
