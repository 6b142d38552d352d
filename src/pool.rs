//! Object pools with acquire/release semantics.
//!
//! A pool hands out previously released instances instead of allocating new
//! ones. Both operations are fail-fast: `acquire` on an empty pool returns
//! `None` (the caller allocates fresh), `release` on a full pool returns
//! `false` and lets the instance drop.

use std::cell::RefCell;

use crate::queue::{check_capacity, CapacityError, MpmcQueue};

/// Acquire/release contract shared by the pool implementations.
///
/// No ordering or fairness is promised: `acquire` returns *some* pooled
/// instance if one is available, nothing more.
pub trait Pool<T> {
    /// Takes an instance out of the pool, or `None` if the pool is empty.
    fn acquire(&self) -> Option<T>;

    /// Puts an instance back into the pool. Returns `false` if the pool was
    /// full, in which case the instance is dropped.
    fn release(&self, value: T) -> bool;
}

/// Lock-free pool backed by [`MpmcQueue`]. Safe to share across any number
/// of threads; no call ever blocks.
///
/// # Example
///
/// ```
/// use ring_pool::{ConcurrentPool, Pool};
///
/// let pool = ConcurrentPool::new(16).unwrap();
///
/// // empty pool: caller allocates
/// let buf = pool.acquire().unwrap_or_else(|| Vec::<u8>::with_capacity(4096));
///
/// // done with it: hand it back for reuse
/// assert!(pool.release(buf));
/// assert!(pool.acquire().is_some());
/// ```
pub struct ConcurrentPool<T> {
    queue: MpmcQueue<T>,
}

impl<T> ConcurrentPool<T> {
    /// Creates a pool holding at most `capacity` instances (rounded up to a
    /// power of two).
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or exceeds
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        Ok(ConcurrentPool {
            queue: MpmcQueue::new(capacity)?,
        })
    }

    /// Effective capacity of the pool.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of pooled instances at some recent instant.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the pool held no instances at some recent instant.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Pool<T> for ConcurrentPool<T> {
    fn acquire(&self) -> Option<T> {
        self.queue.try_pop()
    }

    fn release(&self, value: T) -> bool {
        self.queue.try_push(value).is_ok()
    }
}

/// Single-threaded pool over a plain `Vec` free list.
///
/// Cheaper than [`ConcurrentPool`] when no sharing is needed; the `RefCell`
/// keeps it `!Sync`, so misuse across threads is a compile error.
pub struct SimplePool<T> {
    items: RefCell<Vec<T>>,
    capacity: usize,
}

impl<T> SimplePool<T> {
    /// Creates a pool holding at most `capacity` instances.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or exceeds
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        // Same validation as the queue, without the power-of-two rounding.
        check_capacity(capacity)?;
        Ok(SimplePool {
            items: RefCell::new(Vec::with_capacity(capacity)),
            capacity,
        })
    }

    /// Maximum number of pooled instances.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pooled instances.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the pool holds no instances.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T> Pool<T> for SimplePool<T> {
    fn acquire(&self) -> Option<T> {
        self.items.borrow_mut().pop()
    }

    fn release(&self, value: T) -> bool {
        let mut items = self.items.borrow_mut();
        if items.len() < self.capacity {
            items.push(value);
            true
        } else {
            false
        }
    }
}
