//! Sortable-nonce generator (spec.md §4.2).
//!
//! State machine (§4.6): `aligned` (packed.ts == now) / `stale` (packed.ts <
//! now) / `contended` (CAS failed). The loop below walks exactly that
//! transition table; `contended` always re-enters at `stale` or `aligned`
//! on the next iteration, never terminates on its own, and is not capped —
//! Design Notes §9 says retries "must be unbounded in principle."

use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::{low_bits_mask, SORTABLE_COUNT_BITS, SORTABLE_SATURATION_64, SORTABLE_SLOT};
use crate::error::{NonceError, Result};
use crate::generator::to_nonce;
use crate::state::FactoryState;

/// Process-global count of CAS-failure and saturation retries, purely for
/// test/observability use; never consulted by the algorithm itself.
static CAS_RETRIES: AtomicU64 = AtomicU64::new(0);

pub(crate) fn cas_retry_count() -> u64 {
    CAS_RETRIES.load(Ordering::Relaxed)
}

/// Produces one sortable-nonce of `width` bits, whose leading 42 bits equal
/// `now_ms()` at the instant of emission.
pub(crate) fn sortable_nonce(state: &FactoryState, width: u16) -> Result<Vec<u8>> {
    if !matches!(width, 64 | 96 | 128) {
        return Err(NonceError::UnsupportedWidth(width));
    }

    loop {
        let prev = state.counters[SORTABLE_SLOT].fetch_add(1, Ordering::AcqRel);
        let packed = prev.wrapping_add(1);
        let current_ts = packed >> SORTABLE_COUNT_BITS;
        let new_count = packed & low_bits_mask(SORTABLE_COUNT_BITS);
        let now = state.now_ms();

        if now > current_ts {
            let new_packed = now << SORTABLE_COUNT_BITS;
            if state.counters[SORTABLE_SLOT]
                .compare_exchange(packed, new_packed, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return to_nonce(now, state.machine_id, 0, width);
            }
            CAS_RETRIES.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        if width == 64 && new_count >= SORTABLE_SATURATION_64 {
            CAS_RETRIES.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        return to_nonce(current_ts, state.machine_id, new_count, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{init, lookup, FactoryOpts};

    #[test]
    fn leading_bits_track_wall_clock() {
        init(FactoryOpts::new(0).with_name("sortable-wall")).unwrap();
        let state = lookup("sortable-wall").unwrap();
        let before = state.now_ms();
        let n = sortable_nonce(&state, 64).unwrap();
        let after = state.now_ms();
        let value = u64::from_be_bytes(n.try_into().unwrap());
        let ts = value >> 22;
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn same_thread_sequence_is_bytewise_nondecreasing() {
        init(FactoryOpts::new(0).with_name("sortable-order")).unwrap();
        let state = lookup("sortable-order").unwrap();
        let mut prev = sortable_nonce(&state, 64).unwrap();
        for _ in 0..1000 {
            let next = sortable_nonce(&state, 64).unwrap();
            assert!(next >= prev);
            prev = next;
        }
    }
}
