//! Bounded counter arithmetic for the queue cursors.
//!
//! Cursors and per-slot sequence numbers are 64-bit counters that wrap at
//! `MAX_SEQ` instead of `u64::MAX`. Keeping every counter strictly below the
//! modulus means the signed distance between any two of them fits in an `i64`
//! and can be computed without overflow, no matter how long the queue runs.

/// Modulus for all cursors and sequence numbers. A power of two, so the wrap
/// is a single mask. Vastly larger than any capacity (2^30 max), which keeps
/// live counters well within half the modulus of each other.
pub(crate) const MAX_SEQ: u64 = 1 << 62;

const SEQ_MASK: u64 = MAX_SEQ - 1;

const HALF_SEQ: i64 = (MAX_SEQ >> 1) as i64;

/// Returns `(v + 1) mod MAX_SEQ`.
///
/// Also accepts transient values above the modulus (the dequeue path calls
/// this on `head + mask`), which the mask folds back into range.
#[inline(always)]
pub(crate) const fn safe_next(v: u64) -> u64 {
    v.wrapping_add(1) & SEQ_MASK
}

/// Signed distance `a - b`, corrected into `(-MAX_SEQ/2, MAX_SEQ/2]`.
///
/// For counters that never drift more than half the modulus apart this is
/// the true signed distance, even when one of them has wrapped.
#[inline(always)]
pub(crate) const fn safe_diff(a: u64, b: u64) -> i64 {
    let d = a as i64 - b as i64;
    if d > HALF_SEQ {
        d - MAX_SEQ as i64
    } else if d <= -HALF_SEQ {
        d + MAX_SEQ as i64
    } else {
        d
    }
}
