//! Factory construction, the process-global registry, and `init`.
//!
//! A `FactoryState` is immutable after construction except for its two
//! atomic counter slots (spec.md §5). It is published once into a
//! name-keyed registry and handed out to callers as a cheap `Arc` clone —
//! directly grounded on `router-core`'s single-slot
//! `static GLOBAL: OnceLock<T>` global-singleton idiom
//! (`router-core/src/system/udp_sender/mod.rs`), widened from one slot to a
//! `HashMap` per Design Notes §9's "concurrent read-mostly map" guidance.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, OnceLock, RwLock};

use crate::clock::MonotonicClock;
use crate::constants::{
    DEFAULT_EPOCH_MS, DEFAULT_FACTORY_NAME, MAX_MACHINE_ID, ONE_DAY_MS, OVERFLOW_WARNING_DAYS,
    SORTABLE_COUNT_BITS, TIMESTAMP_HORIZON_MS,
};
use crate::crypto::{self, CipherConfig, CipherContext, PBKDF2_ITERATIONS_CURRENT};
use crate::error::{NonceError, Result};

/// Options accepted by `init`. Construct with `FactoryOpts::new(machine_id)`
/// and chain the `with_*` setters for anything beyond the defaults —
/// mirroring the plain-struct, builder-style configuration objects
/// `router-core::config` uses for `ProxyNode`/`GatewayNode`, minus the
/// `serde`/`mini-config` wiring those need for on-disk persistence (this
/// library persists nothing).
#[derive(Debug, Clone)]
pub struct FactoryOpts {
    pub machine_id: u16,
    pub name: String,
    pub epoch_ms: i64,
    pub base_key: Option<Vec<u8>>,
    pub cipher64: Option<CipherConfig>,
    pub cipher96: Option<CipherConfig>,
    pub cipher128: Option<CipherConfig>,
    pub pbkdf2_iterations: u32,
}

impl FactoryOpts {
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id,
            name: DEFAULT_FACTORY_NAME.to_string(),
            epoch_ms: DEFAULT_EPOCH_MS,
            base_key: None,
            cipher64: None,
            cipher96: None,
            cipher128: None,
            pbkdf2_iterations: PBKDF2_ITERATIONS_CURRENT,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_epoch_ms(mut self, epoch_ms: i64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    pub fn with_base_key(mut self, base_key: Vec<u8>) -> Self {
        self.base_key = Some(base_key);
        self
    }

    pub fn with_cipher64(mut self, config: CipherConfig) -> Self {
        self.cipher64 = Some(config);
        self
    }

    pub fn with_cipher96(mut self, config: CipherConfig) -> Self {
        self.cipher96 = Some(config);
        self
    }

    pub fn with_cipher128(mut self, config: CipherConfig) -> Self {
        self.cipher128 = Some(config);
        self
    }

    /// Overrides the PBKDF2 iteration count used to derive default keys.
    /// Preserve whichever count a deployment was initialized with; do not
    /// change it across restarts of the same deployment (spec.md §9).
    pub fn with_pbkdf2_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations;
        self
    }
}

/// Immutable per-factory state, shared by `Arc` across every generator call.
pub(crate) struct FactoryState {
    pub(crate) machine_id: u16,
    pub(crate) init_at_ms: u64,
    pub(crate) epoch_ms: i64,
    pub(crate) clock: MonotonicClock,
    pub(crate) counters: [AtomicU64; 2],
    pub(crate) cipher64: Option<CipherContext>,
    pub(crate) cipher96: Option<CipherContext>,
    pub(crate) cipher128: Option<CipherContext>,
}

static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<FactoryState>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Arc<FactoryState>>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Initializes a factory under `opts.name`, replacing any prior state
/// registered under that name. The replacement is atomic with respect to
/// readers: a `nonce()` call concurrent with a re-`init` observes either the
/// old or the new state in full, never a partially constructed one.
pub fn init(opts: FactoryOpts) -> Result<()> {
    if opts.machine_id > MAX_MACHINE_ID {
        return Err(NonceError::MachineIdOutOfRange(opts.machine_id));
    }
    if let Some(base_key) = &opts.base_key {
        if base_key.len() < crate::crypto::MIN_BASE_KEY_LEN {
            return Err(NonceError::BaseKeyTooSmall(base_key.len()));
        }
    }

    let clock = MonotonicClock::new(opts.epoch_ms);
    let init_at_ms = clock.now_ms();

    let remaining_ms = TIMESTAMP_HORIZON_MS.saturating_sub(init_at_ms);
    let remaining_days = remaining_ms / ONE_DAY_MS;
    if remaining_ms == 0 {
        log::error!(
            "factory `{}`: timestamp field would overflow immediately for epoch {}",
            opts.name,
            opts.epoch_ms
        );
        return Err(NonceError::TimestampOverflow);
    }
    if remaining_days <= OVERFLOW_WARNING_DAYS {
        log::warn!(
            "factory `{}`: 42-bit timestamp field will overflow in {} days",
            opts.name,
            remaining_days
        );
    }

    let cipher64 = crypto::init_context(
        opts.cipher64.as_ref(),
        64,
        opts.base_key.as_deref(),
        opts.pbkdf2_iterations,
    )?;
    let cipher96 = crypto::init_context(
        opts.cipher96.as_ref(),
        96,
        opts.base_key.as_deref(),
        opts.pbkdf2_iterations,
    )?;
    let cipher128 = crypto::init_context(
        opts.cipher128.as_ref(),
        128,
        opts.base_key.as_deref(),
        opts.pbkdf2_iterations,
    )?;

    log::info!(
        "factory `{}`: machine_id={} epoch_ms={} cipher64={} cipher96={} cipher128={}",
        opts.name,
        opts.machine_id,
        opts.epoch_ms,
        cipher_label(&opts.cipher64),
        cipher_label(&opts.cipher96),
        cipher_label(&opts.cipher128),
    );

    let state = Arc::new(FactoryState {
        machine_id: opts.machine_id,
        init_at_ms,
        epoch_ms: opts.epoch_ms,
        clock,
        counters: [
            AtomicU64::new(u64::MAX), // I5: first fetch_add(1) yields 0
            AtomicU64::new(init_at_ms << SORTABLE_COUNT_BITS),
        ],
        cipher64,
        cipher96,
        cipher128,
    });

    registry()
        .write()
        .expect("nonce-core registry lock poisoned")
        .insert(opts.name, state);

    Ok(())
}

fn cipher_label(config: &Option<CipherConfig>) -> &'static str {
    match config {
        Some(c) => crate::crypto::choice_name(c.choice),
        None => "none",
    }
}

/// Looks up a factory's state by name, cloning the `Arc`.
pub(crate) fn lookup(name: &str) -> Result<Arc<FactoryState>> {
    registry()
        .read()
        .expect("nonce-core registry lock poisoned")
        .get(name)
        .cloned()
        .ok_or_else(|| NonceError::FactoryNotInitialized(name.to_string()))
}

impl FactoryState {
    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_id_boundaries() {
        assert!(init(FactoryOpts::new(0).with_name("t-mid-0")).is_ok());
        assert!(init(FactoryOpts::new(511).with_name("t-mid-511")).is_ok());
        let err = init(FactoryOpts::new(512).with_name("t-mid-512")).unwrap_err();
        assert_eq!(err, NonceError::MachineIdOutOfRange(512));
    }

    #[test]
    fn reinit_replaces_prior_state() {
        init(FactoryOpts::new(1).with_name("t-reinit")).unwrap();
        let first = lookup("t-reinit").unwrap();
        init(FactoryOpts::new(2).with_name("t-reinit")).unwrap();
        let second = lookup("t-reinit").unwrap();
        assert_eq!(first.machine_id, 1);
        assert_eq!(second.machine_id, 2);
    }

    #[test]
    fn lookup_of_unknown_name_fails() {
        let err = lookup("t-does-not-exist").unwrap_err();
        assert!(matches!(err, NonceError::FactoryNotInitialized(_)));
    }

    #[test]
    fn base_key_too_small_is_rejected() {
        let err = init(
            FactoryOpts::new(3)
                .with_name("t-smallkey")
                .with_base_key(vec![0u8; 4]),
        )
        .unwrap_err();
        assert_eq!(err, NonceError::BaseKeyTooSmall(4));
    }

    #[test]
    fn timestamp_overflow_fails_init() {
        // Epoch so far in the past that the 42-bit horizon has already passed.
        let now_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        let epoch_ms = now_ms - (1i64 << 42) - 1;
        let err = init(FactoryOpts::new(4).with_name("t-overflow").with_epoch_ms(epoch_ms))
            .unwrap_err();
        assert_eq!(err, NonceError::TimestampOverflow);
    }
}
