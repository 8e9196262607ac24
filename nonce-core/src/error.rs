//! Error types for the nonce factory.
//!
//! This module defines every error variant `init`, the generators, and the
//! symmetric codec can return. Variants are grouped by doc comment into the
//! three kinds the design distinguishes — programmer errors, configuration
//! failures, and (none currently exist) runtime failures — rather than as
//! separate Rust types, since the factory has a single flat call surface.
//!
//! ```
//! use nonce_core::{FactoryOpts, NonceError};
//!
//! match nonce_core::init(FactoryOpts::new(9999)) {
//!     Err(NonceError::MachineIdOutOfRange(id)) => {
//!         eprintln!("machine_id {id} is out of range");
//!     }
//!     other => {
//!         let _ = other;
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors returned by `nonce-core`'s public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NonceError {
    /// A generator or codec call named a factory that was never `init`-ed.
    ///
    /// Programmer error: the caller must `init` a factory under this name
    /// before calling any other operation on it.
    #[error("factory `{0}` is not initialized")]
    FactoryNotInitialized(String),

    /// `init` was called with a `machine_id` outside `0..=511`.
    #[error("machine_id {0} is out of range (0..=511)")]
    MachineIdOutOfRange(u16),

    /// `init` was called with a `base_key` shorter than 256 bits (32 bytes).
    #[error("base_key must be at least 32 bytes, got {0}")]
    BaseKeyTooSmall(usize),

    /// A per-width key override did not match the selected cipher's required
    /// key length.
    #[error("cipher {cipher} requires a {expected}-byte key, got {actual}")]
    KeySizeMismatch {
        cipher: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The selected cipher cannot be used at the requested width (for
    /// example AES at width 64, or a 64-bit cipher requested to fully cover
    /// 96 bits).
    #[error("cipher {cipher} is not supported for {width}-bit nonces")]
    CipherUnsupportedForWidth { cipher: &'static str, width: u8 },

    /// `encrypt`/`decrypt` was called on a 96-bit nonce whose trailing 32
    /// bits were non-zero, which cannot have been produced by a 64-bit
    /// cipher under this factory's configuration.
    #[error("96-bit nonce has a non-zero tail; not a value this factory could have produced")]
    InvalidTail,

    /// `init`'s epoch is so far in the past that the 42-bit timestamp field
    /// would already be out of room.
    ///
    /// Configuration failure: raised synchronously from `init`.
    #[error("timestamp field would overflow immediately for this epoch")]
    TimestampOverflow,

    /// A cipher selection named `Speck` but this build was compiled without
    /// the `speck` feature.
    ///
    /// Configuration failure: raised synchronously from `init`.
    #[error("Speck cipher support was not compiled into this build (enable the `speck` feature)")]
    SpeckUnavailable,

    /// A generator or codec call was made with a width other than 64, 96, or
    /// 128 bits.
    #[error("unsupported nonce width: {0} bits")]
    UnsupportedWidth(u16),

    /// `encrypted_nonce`/`encrypt`/`decrypt` was called on a factory with no
    /// cipher configured for the requested width.
    #[error("no cipher configured for {0}-bit nonces")]
    NoCipherConfigured(u16),
}

/// Result alias used throughout `nonce-core`.
pub type Result<T> = std::result::Result<T, NonceError>;
