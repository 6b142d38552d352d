//! ring_pool - bounded lock-free MPMC ring queue with an object-pool layer
//!
//! The core is [`MpmcQueue`], a fixed-capacity multi-producer/multi-consumer
//! queue that reserves slots through per-slot sequence numbers and CAS on two
//! cache-padded cursors. Push and pop are fail-fast: a full queue reports
//! full, an empty queue reports empty, nothing ever blocks or parks.
//!
//! On top of it sits the [`Pool`] trait with two implementations:
//! [`ConcurrentPool`] (backed by the queue, safe to share across threads) and
//! [`SimplePool`] (a plain single-threaded free list).
//!
//! # Example
//!
//! ```
//! use ring_pool::MpmcQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(MpmcQueue::<u64>::new(128).unwrap());
//!
//! let q = queue.clone();
//! let producer = thread::spawn(move || {
//!     for i in 0..1000 {
//!         let mut v = i;
//!         while let Err(e) = q.try_push(v) {
//!             v = e.into_inner();
//!             std::hint::spin_loop();
//!         }
//!     }
//! });
//!
//! let q = queue.clone();
//! let consumer = thread::spawn(move || {
//!     let mut got = 0;
//!     while got < 1000 {
//!         if q.try_pop().is_some() {
//!             got += 1;
//!         }
//!     }
//! });
//!
//! producer.join().unwrap();
//! consumer.join().unwrap();
//! ```
#![warn(missing_docs)]

mod pool;
mod queue;
mod seq;
mod sync;

pub use pool::{ConcurrentPool, Pool, SimplePool};
pub use queue::{CapacityError, FullError, MpmcQueue, MAX_CAPACITY};
