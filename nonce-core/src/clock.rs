//! Monotonic-clock-anchored wall time.
//!
//! Every timestamp embedded in a nonce is `monotonic_ms + mono_epoch_offset_ms`
//! rather than a raw `SystemTime::now()` read. `mono_epoch_offset_ms` is fixed
//! once at `init` from the wall clock; all subsequent reads advance off
//! `Instant`, which the platform guarantees never goes backwards. This is
//! what makes invariant I2(b) — "UTC clock monotonically progresses across
//! restarts" — a precondition on the deployment rather than something this
//! process has to defend against mid-run clock adjustments for.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic anchor paired with the epoch-relative offset computed at the
/// moment it was taken.
#[derive(Debug)]
pub(crate) struct MonotonicClock {
    anchor: Instant,
    /// `wall_clock_ms_at(anchor) - epoch_ms`.
    offset_ms: i64,
}

impl MonotonicClock {
    /// Captures the current instant and computes the offset against `epoch_ms`.
    pub(crate) fn new(epoch_ms: i64) -> Self {
        let anchor = Instant::now();
        let wall_ms = wall_clock_now_ms();
        Self {
            anchor,
            offset_ms: wall_ms - epoch_ms,
        }
    }

    /// Epoch-relative milliseconds right now: `monotonic_ms + mono_epoch_offset_ms`.
    #[inline]
    pub(crate) fn now_ms(&self) -> u64 {
        let monotonic_ms = self.anchor.elapsed().as_millis() as i64;
        (monotonic_ms + self.offset_ms).max(0) as u64
    }

}

/// Current wall-clock time in milliseconds since the Unix epoch.
fn wall_clock_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as i64
}
