//! Width-matched block ciphers and their pre-initialized contexts.
//!
//! A cipher context is built once, at `init`, and shared by reference across
//! every `encrypt`/`decrypt`/`encrypted_nonce` call — see spec.md §4.3 and
//! Design Notes §9 ("ciphers as immutable shared state"). Blowfish and AES
//! keep a constructed `BlockEncrypt + BlockDecrypt` object around so the hot
//! path only ever does a single-block transform, never a key schedule.
//! 3DES deliberately does *not* pre-build a context (spec.md: "no significant
//! benefit") — its key bytes are kept instead and the one-shot primitive is
//! invoked per call.

use aes::Aes256;
use blowfish::Blowfish;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use des::TdesEde3;

use crate::error::{NonceError, Result};

/// User-facing cipher selection for a given width. Not every combination of
/// `(choice, width)` is valid; `CipherContext::init` rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherChoice {
    Blowfish,
    TripleDes,
    Aes,
    Speck,
}

/// Key length, in bytes, required by `choice` at `width`. Speck's key size
/// depends on the width (Speck64/128, Speck96/144, Speck128/256 each name
/// block size / key size in bits); every other cipher's key size is fixed.
pub fn key_len(choice: CipherChoice, width: u16) -> usize {
    match choice {
        CipherChoice::Blowfish => 16,  // 128-bit
        CipherChoice::TripleDes => 24, // 192-bit
        CipherChoice::Aes => 32,       // 256-bit
        CipherChoice::Speck => match width {
            64 => 16,  // Speck64/128
            96 => 18,  // Speck96/144
            128 => 32, // Speck128/256
            _ => 16,
        },
    }
}

/// A pre-initialized, width-bound cipher context.
pub(crate) enum CipherContext {
    Blowfish(Box<Blowfish>),
    Aes256(Box<Aes256>),
    /// 3DES keeps only its key; see module docs for why it isn't pre-built.
    TripleDes([u8; 24]),
    #[cfg(feature = "speck")]
    Speck64(Box<speck_cipher::Speck64_128>),
    #[cfg(feature = "speck")]
    Speck96(Box<speck_cipher::Speck96_144>),
    #[cfg(feature = "speck")]
    Speck128(Box<speck_cipher::Speck128_256>),
}

impl CipherContext {
    /// Builds a context for `choice` at `width` from an already-sized key.
    pub(crate) fn build(choice: CipherChoice, width: u16, key: &[u8]) -> Result<Self> {
        match (choice, width) {
            (CipherChoice::Blowfish, 64) | (CipherChoice::Blowfish, 96) => {
                let key = cipher::Key::<Blowfish>::from_slice(key);
                Ok(CipherContext::Blowfish(Box::new(Blowfish::new(key))))
            }
            (CipherChoice::TripleDes, 64) | (CipherChoice::TripleDes, 96) => {
                let mut buf = [0u8; 24];
                buf.copy_from_slice(key);
                Ok(CipherContext::TripleDes(buf))
            }
            (CipherChoice::Aes, 128) => {
                let key = cipher::Key::<Aes256>::from_slice(key);
                Ok(CipherContext::Aes256(Box::new(Aes256::new(key))))
            }
            #[cfg(feature = "speck")]
            (CipherChoice::Speck, 64) => {
                let key = cipher::Key::<speck_cipher::Speck64_128>::from_slice(key);
                Ok(CipherContext::Speck64(Box::new(
                    speck_cipher::Speck64_128::new(key),
                )))
            }
            #[cfg(feature = "speck")]
            (CipherChoice::Speck, 96) => {
                let key = cipher::Key::<speck_cipher::Speck96_144>::from_slice(key);
                Ok(CipherContext::Speck96(Box::new(
                    speck_cipher::Speck96_144::new(key),
                )))
            }
            #[cfg(feature = "speck")]
            (CipherChoice::Speck, 128) => {
                let key = cipher::Key::<speck_cipher::Speck128_256>::from_slice(key);
                Ok(CipherContext::Speck128(Box::new(
                    speck_cipher::Speck128_256::new(key),
                )))
            }
            #[cfg(not(feature = "speck"))]
            (CipherChoice::Speck, _) => Err(NonceError::SpeckUnavailable),
            (choice, width) => Err(NonceError::CipherUnsupportedForWidth {
                cipher: choice_name(choice),
                width: width as u8,
            }),
        }
    }

    /// Block size, in bytes, this context natively transforms.
    pub(crate) fn native_block_len(&self) -> usize {
        match self {
            CipherContext::Blowfish(_) => 8,
            CipherContext::TripleDes(_) => 8,
            CipherContext::Aes256(_) => 16,
            #[cfg(feature = "speck")]
            CipherContext::Speck64(_) => 8,
            #[cfg(feature = "speck")]
            CipherContext::Speck96(_) => 12,
            #[cfg(feature = "speck")]
            CipherContext::Speck128(_) => 16,
        }
    }

    /// Encrypts exactly one native block in place.
    pub(crate) fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), self.native_block_len());
        match self {
            CipherContext::Blowfish(c) => {
                let b = cipher::Block::<Blowfish>::from_mut_slice(block);
                c.encrypt_block(b);
            }
            CipherContext::Aes256(c) => {
                let b = cipher::Block::<Aes256>::from_mut_slice(block);
                c.encrypt_block(b);
            }
            CipherContext::TripleDes(key) => {
                // CBC with a zero IV over a single block; no chaining state
                // survives the call, matching the "no pre-init benefit" note.
                let key = cipher::Key::<TdesEde3>::from_slice(key);
                let iv = cipher::Iv::<cbc::Encryptor<TdesEde3>>::default();
                let mut enc = cbc::Encryptor::<TdesEde3>::new(key, iv);
                let b = cipher::Block::<TdesEde3>::from_mut_slice(block);
                enc.encrypt_block_mut(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck64(c) => {
                let b = cipher::Block::<speck_cipher::Speck64_128>::from_mut_slice(block);
                c.encrypt_block(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck96(c) => {
                let b = cipher::Block::<speck_cipher::Speck96_144>::from_mut_slice(block);
                c.encrypt_block(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck128(c) => {
                let b = cipher::Block::<speck_cipher::Speck128_256>::from_mut_slice(block);
                c.encrypt_block(b);
            }
        }
    }

    /// Decrypts exactly one native block in place.
    pub(crate) fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), self.native_block_len());
        match self {
            CipherContext::Blowfish(c) => {
                let b = cipher::Block::<Blowfish>::from_mut_slice(block);
                c.decrypt_block(b);
            }
            CipherContext::Aes256(c) => {
                let b = cipher::Block::<Aes256>::from_mut_slice(block);
                c.decrypt_block(b);
            }
            CipherContext::TripleDes(key) => {
                let key = cipher::Key::<TdesEde3>::from_slice(key);
                let iv = cipher::Iv::<cbc::Decryptor<TdesEde3>>::default();
                let mut dec = cbc::Decryptor::<TdesEde3>::new(key, iv);
                let b = cipher::Block::<TdesEde3>::from_mut_slice(block);
                dec.decrypt_block_mut(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck64(c) => {
                let b = cipher::Block::<speck_cipher::Speck64_128>::from_mut_slice(block);
                c.decrypt_block(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck96(c) => {
                let b = cipher::Block::<speck_cipher::Speck96_144>::from_mut_slice(block);
                c.decrypt_block(b);
            }
            #[cfg(feature = "speck")]
            CipherContext::Speck128(c) => {
                let b = cipher::Block::<speck_cipher::Speck128_256>::from_mut_slice(block);
                c.decrypt_block(b);
            }
        }
    }
}

pub(crate) fn choice_name(choice: CipherChoice) -> &'static str {
    match choice {
        CipherChoice::Blowfish => "Blowfish",
        CipherChoice::TripleDes => "TripleDES",
        CipherChoice::Aes => "AES-256",
        CipherChoice::Speck => "Speck",
    }
}
