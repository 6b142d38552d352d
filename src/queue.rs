//! Bounded lock-free MPMC ring queue with per-slot sequence reservation.

use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;

use crate::seq::{safe_diff, safe_next};
use crate::sync::{spin, AtomicU64, Ordering};

/// Largest accepted capacity. Keeps the index mask within 31 bits and every
/// capacity negligible next to the sequence modulus.
pub const MAX_CAPACITY: usize = 1 << 30;

#[repr(align(64))]
struct CachePadded<T> {
    value: T,
}

impl<T> CachePadded<T> {
    fn new(value: T) -> Self {
        CachePadded { value }
    }
}

struct Slot<T> {
    sequence: AtomicU64,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new(seq: u64) -> Self {
        Slot {
            sequence: AtomicU64::new(seq),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

/// Error returned by [`MpmcQueue::new`] for a capacity of zero or above
/// [`MAX_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    requested: usize,
}

impl CapacityError {
    /// The capacity that was rejected.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid capacity {}: must be between 1 and {}",
            self.requested, MAX_CAPACITY
        )
    }
}

impl std::error::Error for CapacityError {}

pub(crate) fn check_capacity(capacity: usize) -> Result<(), CapacityError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(CapacityError {
            requested: capacity,
        });
    }
    Ok(())
}

/// Error returned by [`MpmcQueue::try_push`] when the queue is full.
/// Hands the rejected value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullError<T>(pub T);

impl<T> FullError<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for FullError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}

impl<T: fmt::Debug> std::error::Error for FullError<T> {}

/// Bounded MPMC queue over a power-of-two ring of slots.
///
/// Each slot carries a sequence number that encodes, relative to the two
/// cursors, whether the slot is free to write, free to read, or mid-transfer.
/// Producers CAS `tail` to reserve a slot, write the payload, then publish
/// the next sequence value with a release store; consumers do the symmetric
/// dance on `head`. The sequence store is the only synchronization edge for
/// the payload, so the payload access sits strictly between the CAS and the
/// publication.
///
/// All operations are fail-fast: `try_push` reports full, `try_pop` reports
/// empty, and internal CAS races are retried without ever parking a thread.
///
/// # Example
///
/// ```
/// use ring_pool::MpmcQueue;
///
/// let q = MpmcQueue::new(4).unwrap();
/// assert!(q.try_push(1).is_ok());
/// assert!(q.try_push(2).is_ok());
/// assert_eq!(q.try_pop(), Some(1));
/// assert_eq!(q.try_pop(), Some(2));
/// assert_eq!(q.try_pop(), None);
/// ```
pub struct MpmcQueue<T> {
    buf: Box<[Slot<T>]>,
    mask: u64,
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
}

unsafe impl<T: Send> Send for MpmcQueue<T> {}
unsafe impl<T: Send> Sync for MpmcQueue<T> {}

impl<T> MpmcQueue<T> {
    /// Creates a queue holding at least `capacity` elements.
    ///
    /// The effective capacity is `capacity` rounded up to the next power of
    /// two, so the ring index reduces to a mask.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or exceeds
    /// [`MAX_CAPACITY`].
    ///
    /// ```
    /// use ring_pool::MpmcQueue;
    ///
    /// let q = MpmcQueue::<u32>::new(3).unwrap();
    /// assert_eq!(q.capacity(), 4);
    ///
    /// assert!(MpmcQueue::<u32>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        check_capacity(capacity)?;

        let n = capacity.next_power_of_two();
        let mut slots = Vec::with_capacity(n);
        for i in 0..n {
            slots.push(Slot::new(i as u64));
        }

        Ok(MpmcQueue {
            buf: slots.into_boxed_slice(),
            mask: (n - 1) as u64,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
        })
    }

    /// Attempts to push a value.
    ///
    /// # Errors
    ///
    /// Returns `Err(FullError(value))` if the queue was full at the time of
    /// the attempt, handing the value back untouched.
    pub fn try_push(&self, value: T) -> Result<(), FullError<T>> {
        let mut tail = self.tail.value.load(Ordering::Acquire);
        loop {
            let slot = &self.buf[(tail & self.mask) as usize];
            let seq = slot.sequence.load(Ordering::Acquire);

            match safe_diff(seq, tail) {
                0 => {
                    // Slot is writable for this tail value; race to claim it.
                    match self.tail.value.compare_exchange_weak(
                        tail,
                        safe_next(tail),
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => {
                            // We own the slot until the sequence store below.
                            unsafe { (*slot.value.get()).write(value) };
                            slot.sequence.store(safe_next(tail), Ordering::Release);
                            return Ok(());
                        }
                        Err(current) => tail = current,
                    }
                }
                d if d < 0 => {
                    // Slot still holds last lap's element. Either the queue
                    // is full, or a consumer has reserved the slot and not
                    // yet republished its sequence.
                    let head = self.head.value.load(Ordering::Acquire);
                    if safe_diff(tail, safe_next(head + self.mask)) >= 0 {
                        return Err(FullError(value));
                    }
                    spin();
                    tail = self.tail.value.load(Ordering::Acquire);
                }
                _ => {
                    // Stale view: another producer already advanced tail.
                    tail = self.tail.value.load(Ordering::Acquire);
                }
            }
        }
    }

    /// Attempts to pop a value. Returns `None` if the queue was empty at the
    /// time of the attempt.
    pub fn try_pop(&self) -> Option<T> {
        let mut head = self.head.value.load(Ordering::Acquire);
        loop {
            let slot = &self.buf[(head & self.mask) as usize];
            let seq = slot.sequence.load(Ordering::Acquire);

            match safe_diff(seq, head) {
                1 => {
                    // Slot is committed for this head value; race to claim it.
                    match self.head.value.compare_exchange_weak(
                        head,
                        safe_next(head),
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => {
                            let value = unsafe { (*slot.value.get()).assume_init_read() };
                            // Mark the slot writable again one lap later.
                            slot.sequence
                                .store(safe_next(head + self.mask), Ordering::Release);
                            return Some(value);
                        }
                        Err(current) => head = current,
                    }
                }
                d if d <= 0 => {
                    // Nothing committed here yet. Either the queue is empty,
                    // or a producer has reserved the slot and not yet
                    // published the payload.
                    let tail = self.tail.value.load(Ordering::Acquire);
                    if safe_diff(head, tail) >= 0 {
                        return None;
                    }
                    spin();
                    head = self.head.value.load(Ordering::Acquire);
                }
                _ => {
                    // Stale view: another consumer already advanced head.
                    head = self.head.value.load(Ordering::Acquire);
                }
            }
        }
    }

    /// Effective (power-of-two) capacity.
    pub fn capacity(&self) -> usize {
        (self.mask + 1) as usize
    }

    /// Number of elements at some recent instant, clamped to
    /// `[0, capacity]`.
    ///
    /// Reads head, then tail, then head again until the two head reads
    /// agree, so the result was true at some point during the call. Under
    /// concurrent pushes and pops it may be stale by the time it returns.
    pub fn len(&self) -> usize {
        loop {
            let head = self.head.value.load(Ordering::Acquire);
            let tail = self.tail.value.load(Ordering::Acquire);
            if self.head.value.load(Ordering::Acquire) == head {
                let n = self.capacity() as i64;
                return safe_diff(tail, head).clamp(0, n) as usize;
            }
        }
    }

    /// Whether the queue held no elements at some recent instant.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue held `capacity()` elements at some recent instant.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

impl<T> Drop for MpmcQueue<T> {
    fn drop(&mut self) {
        // Exclusive access: every slot in [head, tail) holds a live element.
        let tail = self.tail.value.load(Ordering::Relaxed);
        let mut pos = self.head.value.load(Ordering::Relaxed);
        while safe_diff(tail, pos) > 0 {
            let slot = &self.buf[(pos & self.mask) as usize];
            unsafe { (*slot.value.get()).assume_init_drop() };
            pos = safe_next(pos);
        }
    }
}

impl<T> fmt::Debug for MpmcQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpmcQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
