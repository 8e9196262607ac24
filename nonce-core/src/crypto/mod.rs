//! Cipher selection, key derivation, and context initialization.
//!
//! This module is the boundary between `FactoryOpts` (what the caller asked
//! for) and the three `Option<CipherContext>` slots `FactoryState` actually
//! holds. Everything here runs once, at `init`; nothing in `generator::*`
//! touches a key or builds a cipher object.

mod block;
mod kdf;

pub use block::CipherChoice;
pub(crate) use block::{choice_name, CipherContext};
pub use kdf::{PBKDF2_ITERATIONS_CURRENT, PBKDF2_ITERATIONS_LEGACY};

use crate::error::{NonceError, Result};

/// Per-width cipher configuration requested at `init`.
#[derive(Debug, Clone)]
pub struct CipherConfig {
    pub choice: CipherChoice,
    /// Explicit key override; if `None`, the key is derived from the
    /// factory's `base_key` via PBKDF2.
    pub key: Option<Vec<u8>>,
}

impl CipherConfig {
    pub fn new(choice: CipherChoice) -> Self {
        Self { choice, key: None }
    }

    pub fn with_key(choice: CipherChoice, key: Vec<u8>) -> Self {
        Self {
            choice,
            key: Some(key),
        }
    }
}

/// Resolves one width's key bytes: either the caller's override (validated
/// against the cipher's required length) or a PBKDF2 derivation from
/// `base_key` salted with a per-(cipher, width) label.
fn resolve_key(
    config: &CipherConfig,
    width: u16,
    base_key: Option<&[u8]>,
    pbkdf2_iterations: u32,
) -> Result<Vec<u8>> {
    let expected = block::key_len(config.choice, width);

    if let Some(key) = &config.key {
        if key.len() != expected {
            return Err(NonceError::KeySizeMismatch {
                cipher: block::choice_name(config.choice),
                expected,
                actual: key.len(),
            });
        }
        return Ok(key.clone());
    }

    let base_key = base_key.ok_or(NonceError::KeySizeMismatch {
        cipher: block::choice_name(config.choice),
        expected,
        actual: 0,
    })?;

    let label = format!("{}{}", block::choice_name(config.choice), width);
    let mut out = vec![0u8; expected];
    kdf::derive(base_key, &label, pbkdf2_iterations, &mut out);
    Ok(out)
}

/// Builds the pre-initialized cipher context for one width, or `None` if no
/// `CipherConfig` was supplied for that width.
pub(crate) fn init_context(
    config: Option<&CipherConfig>,
    width: u16,
    base_key: Option<&[u8]>,
    pbkdf2_iterations: u32,
) -> Result<Option<CipherContext>> {
    let Some(config) = config else {
        return Ok(None);
    };
    let key = resolve_key(config, width, base_key, pbkdf2_iterations)?;
    let ctx = CipherContext::build(config.choice, width, &key)?;
    Ok(Some(ctx))
}
