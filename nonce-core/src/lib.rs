//! A lock-free, locally-unique nonce factory.
//!
//! `nonce-core` produces 64-, 96-, or 128-bit identifiers, unique within a
//! bounded (≤512-node) fleet, at sustained rates of tens of millions per
//! second per node. Three variants are offered through the same factory:
//! [`nonce`] (fast, unique, predictable), [`sortable_nonce`] (leading bits
//! encode true wall-clock time) and [`encrypted_nonce`] (unique *and*
//! unpredictable, via a width-matched block cipher).
//!
//! Call [`init`] once per named factory before calling any other function;
//! every other entry point takes a `name` and looks up the corresponding
//! state in a process-global registry.
//!
//! ```
//! use nonce_core::{init, nonce, FactoryOpts};
//!
//! init(FactoryOpts::new(0).with_name("example")).unwrap();
//! let a = nonce("example", 64).unwrap();
//! let b = nonce("example", 64).unwrap();
//! assert_ne!(a, b);
//! ```

mod clock;
mod codec;
mod constants;
mod crypto;
mod error;
mod generator;
mod state;

pub use crypto::{CipherChoice, CipherConfig};
pub use error::{NonceError, Result};
pub use generator::NonceBase;
pub use state::FactoryOpts;

use chrono::{DateTime, Utc};

/// Initializes a factory under `opts.name`, replacing any prior state
/// registered under that name. See [`FactoryOpts`] for the full set of
/// options.
pub fn init(opts: FactoryOpts) -> Result<()> {
    state::init(opts)
}

/// Produces one counter-nonce of `width` bits (64, 96, or 128) from the
/// factory registered under `name`.
pub fn nonce(name: &str, width: u16) -> Result<Vec<u8>> {
    let factory = state::lookup(name)?;
    generator::counter_nonce(&factory, width)
}

/// Produces one sortable-nonce of `width` bits, whose leading 42 bits equal
/// the emission timestamp.
pub fn sortable_nonce(name: &str, width: u16) -> Result<Vec<u8>> {
    let factory = state::lookup(name)?;
    generator::sortable_nonce(&factory, width)
}

/// Produces one encrypted nonce of `width` bits, built from a counter or
/// sortable base nonce per `base`.
pub fn encrypted_nonce(name: &str, width: u16, base: NonceBase) -> Result<Vec<u8>> {
    let factory = state::lookup(name)?;
    generator::encrypted_nonce(&factory, width, base)
}

/// Encrypts a previously emitted nonce under the factory's cipher for its
/// width (recovered from `nonce.len()`). Safe only for nonces this factory
/// produced; see [`codec`] module docs.
pub fn encrypt(name: &str, nonce: &[u8]) -> Result<Vec<u8>> {
    let factory = state::lookup(name)?;
    codec::encrypt(&factory, nonce)
}

/// Inverse of [`encrypt`].
pub fn decrypt(name: &str, nonce: &[u8]) -> Result<Vec<u8>> {
    let factory = state::lookup(name)?;
    codec::decrypt(&factory, nonce)
}

/// Decodes a sortable nonce's leading 42 bits into a UTC datetime, using the
/// factory's configured epoch.
pub fn get_datetime(name: &str, nonce: &[u8]) -> Result<DateTime<Utc>> {
    let factory = state::lookup(name)?;
    codec::get_datetime(&factory, nonce)
}

/// Number of CAS-failure/saturation retries the sortable-nonce generator
/// has performed, process-wide, since startup. Exposed for tests and
/// operational curiosity; not part of any uniqueness guarantee.
pub fn sortable_retry_count() -> u64 {
    generator::cas_retry_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_scenario_one() {
        init(
            FactoryOpts::new(1)
                .with_name("e2e-1")
                .with_epoch_ms(constants_default_epoch())
                .with_base_key(vec![0xAAu8; 32]),
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        let n = nonce("e2e-1", 64).unwrap();
        let value = u64::from_be_bytes(n.try_into().unwrap());
        let ts = value >> 22;
        let machine_id = (value >> 13) & 0x1FF;
        let counter = value & 0x1FFF;
        assert!(ts <= 500);
        assert_eq!(machine_id, 1);
        assert_eq!(counter, 0);
    }

    #[test]
    fn end_to_end_scenario_three_encrypt_decrypt_round_trip() {
        init(
            FactoryOpts::new(0)
                .with_name("e2e-3")
                .with_cipher64(CipherConfig::new(CipherChoice::Blowfish))
                .with_base_key(vec![0x42u8; 32]),
        )
        .unwrap();
        let p = nonce("e2e-3", 64).unwrap();
        let c = encrypt("e2e-3", &p).unwrap();
        assert_ne!(c, p);
        assert_eq!(decrypt("e2e-3", &c).unwrap(), p);
    }

    #[test]
    fn end_to_end_scenario_four_96_bit_tail_is_zero() {
        init(
            FactoryOpts::new(0)
                .with_name("e2e-4")
                .with_cipher96(CipherConfig::new(CipherChoice::Blowfish))
                .with_base_key(vec![0x99u8; 32]),
        )
        .unwrap();
        let c = encrypted_nonce("e2e-4", 96, NonceBase::Counter).unwrap();
        assert_eq!(&c[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn unknown_factory_errors_cleanly() {
        let err = nonce("does-not-exist", 64).unwrap_err();
        assert!(matches!(err, NonceError::FactoryNotInitialized(_)));
    }

    fn constants_default_epoch() -> i64 {
        1_735_689_600_000
    }
}
