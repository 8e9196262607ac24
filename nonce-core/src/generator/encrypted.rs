//! Encrypted-nonce generator (spec.md §4.3).
//!
//! Composes the counter or sortable generator with the factory's
//! width-matched cipher. For `width = 96` with a 64-bit cipher, the 64-bit
//! base nonce is encrypted and 32 zero bits are appended (§4.3, §9's
//! "96-bit Blowfish/3DES gap") rather than attempting to stretch an 8-byte
//! block cipher over 12 bytes.

use crate::error::{NonceError, Result};
use crate::generator::{counter_nonce, sortable_nonce, NonceBase};
use crate::state::FactoryState;

pub(crate) fn encrypted_nonce(state: &FactoryState, width: u16, base: NonceBase) -> Result<Vec<u8>> {
    match width {
        64 => {
            let ctx = state
                .cipher64
                .as_ref()
                .ok_or(NonceError::NoCipherConfigured(64))?;
            let mut plain = generate(state, base, 64)?;
            ctx.encrypt_block(&mut plain);
            Ok(plain)
        }
        128 => {
            let ctx = state
                .cipher128
                .as_ref()
                .ok_or(NonceError::NoCipherConfigured(128))?;
            let mut plain = generate(state, base, 128)?;
            ctx.encrypt_block(&mut plain);
            Ok(plain)
        }
        96 => {
            let ctx = state
                .cipher96
                .as_ref()
                .ok_or(NonceError::NoCipherConfigured(96))?;
            if ctx.native_block_len() == 12 {
                let mut plain = generate(state, base, 96)?;
                ctx.encrypt_block(&mut plain);
                Ok(plain)
            } else {
                // 8-byte cipher: encrypt a 64-bit base nonce, pad the tail.
                let mut plain = generate(state, base, 64)?;
                ctx.encrypt_block(&mut plain);
                plain.extend_from_slice(&[0u8; 4]);
                Ok(plain)
            }
        }
        other => Err(NonceError::UnsupportedWidth(other)),
    }
}

fn generate(state: &FactoryState, base: NonceBase, width: u16) -> Result<Vec<u8>> {
    match base {
        NonceBase::Counter => counter_nonce(state, width),
        NonceBase::Sortable => sortable_nonce(state, width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CipherChoice, CipherConfig};
    use crate::state::{init, lookup, FactoryOpts};

    #[test]
    fn encrypted_64_differs_from_plaintext() {
        init(
            FactoryOpts::new(0)
                .with_name("enc-64")
                .with_cipher64(CipherConfig::new(CipherChoice::Blowfish))
                .with_base_key(vec![0xABu8; 32]),
        )
        .unwrap();
        let state = lookup("enc-64").unwrap();
        let plain = counter_nonce(&state, 64).unwrap();
        let cipher = encrypted_nonce(&state, 64, NonceBase::Counter).unwrap();
        assert_ne!(plain, cipher);
    }

    #[test]
    fn encrypted_96_with_blowfish_has_zero_tail() {
        init(
            FactoryOpts::new(0)
                .with_name("enc-96-tail")
                .with_cipher96(CipherConfig::new(CipherChoice::Blowfish))
                .with_base_key(vec![0xCDu8; 32]),
        )
        .unwrap();
        let state = lookup("enc-96-tail").unwrap();
        let cipher = encrypted_nonce(&state, 96, NonceBase::Counter).unwrap();
        assert_eq!(&cipher[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn no_cipher_configured_is_an_error() {
        init(FactoryOpts::new(0).with_name("enc-none")).unwrap();
        let state = lookup("enc-none").unwrap();
        let err = encrypted_nonce(&state, 64, NonceBase::Counter).unwrap_err();
        assert_eq!(err, NonceError::NoCipherConfigured(64));
    }
}
