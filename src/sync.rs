//! Atomic shim: real atomics normally, loom's checked atomics under
//! `--cfg loom` so the permutation tests model the queue itself.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicU64, Ordering};

/// Busy-wait hint. Under loom this must be a yield so the scheduler can run
/// the thread we are waiting on.
#[inline(always)]
pub(crate) fn spin() {
    #[cfg(loom)]
    loom::thread::yield_now();

    #[cfg(not(loom))]
    core::hint::spin_loop();
}
