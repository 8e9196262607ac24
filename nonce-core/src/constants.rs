//! Bit layout, epoch, and counter-index constants shared by every generator.
//!
//! Nothing in this module allocates or touches shared state; it exists so the
//! magic numbers in `generator::*` and `crypto::*` have one documented home.

/// Number of bits reserved for the millisecond timestamp in every nonce width.
pub const TIMESTAMP_BITS: u32 = 42;

/// Number of bits reserved for the machine identifier in every nonce width.
pub const MACHINE_ID_BITS: u32 = 9;

/// Highest value a `machine_id` may hold (511, i.e. 512 nodes).
pub const MAX_MACHINE_ID: u16 = (1 << MACHINE_ID_BITS) - 1;

/// Counter-field width, in bits, for the 64-bit nonce.
pub const COUNTER_BITS_64: u32 = 13;

/// Counter-field width, in bits, for the 96-bit nonce.
pub const COUNTER_BITS_96: u32 = 45;

/// Counter-field width, in bits, for the 128-bit nonce (the full atomic word).
pub const COUNTER_BITS_128: u32 = 64;

/// Width, in bits, of the zero padding inserted between the machine-ID field
/// and the 64-bit counter in a 128-bit nonce (keeps the upper 61 bits of every
/// width sharing the same timestamp|machine_id prefix layout).
pub const PAD_BITS_128: u32 = 13;

/// Width of the packed `(ts: 42 | count: 22)` sortable-nonce atomic slot.
pub const SORTABLE_COUNT_BITS: u32 = 22;

/// Saturation threshold for 64-bit sortable nonces: the per-millisecond rate
/// is capped at `2^COUNTER_BITS_64`, not at the full 22-bit subfield — see
/// the sortable-nonce Open Question in `DESIGN.md`.
pub const SORTABLE_SATURATION_64: u64 = 1 << COUNTER_BITS_64;

/// Default epoch: 2025-01-01T00:00:00Z, in milliseconds since the Unix epoch.
pub const DEFAULT_EPOCH_MS: i64 = 1_735_689_600_000;

/// Index of the counter-nonce atomic slot within `FactoryState::counters`.
pub const COUNTER_SLOT: usize = 0;

/// Index of the sortable-nonce atomic slot within `FactoryState::counters`.
pub const SORTABLE_SLOT: usize = 1;

/// Default registry name used when `FactoryOpts::name` is left unset.
pub const DEFAULT_FACTORY_NAME: &str = "default";

/// One day in milliseconds, used by the timestamp-overflow warning threshold.
pub const ONE_DAY_MS: u64 = 86_400_000;

/// The timestamp field overflows its 42 bits after this many milliseconds.
pub const TIMESTAMP_HORIZON_MS: u64 = 1 << TIMESTAMP_BITS;

/// `init` warns when fewer than this many days remain before the 42-bit
/// timestamp horizon is reached.
pub const OVERFLOW_WARNING_DAYS: u64 = 365;

/// Mask with the low `n` bits set; panics (in debug) for `n >= 64`, which
/// never happens for the counter widths defined above.
#[inline]
pub const fn low_bits_mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_id_range_is_512_nodes() {
        assert_eq!(MAX_MACHINE_ID, 511);
    }

    #[test]
    fn mask_widths_match_spec() {
        assert_eq!(low_bits_mask(COUNTER_BITS_64), 0x1FFF);
        assert_eq!(low_bits_mask(COUNTER_BITS_96), (1u64 << 45) - 1);
    }
}
