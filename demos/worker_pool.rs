//! Workers sharing a pool of reusable scratch buffers.
//!
//! Each worker acquires a buffer from the pool (allocating a fresh one only
//! when the pool is empty), fills it, and releases it back for the next
//! worker. With enough churn the allocation count stays far below the number
//! of jobs processed.

use ring_pool::{ConcurrentPool, Pool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const NUM_WORKERS: usize = 4;
const JOBS_PER_WORKER: usize = 5000;

fn main() {
    println!("Worker Pool Example\n");

    let pool = Arc::new(ConcurrentPool::<Vec<u8>>::new(32).unwrap());
    let allocations = Arc::new(AtomicUsize::new(0));

    let mut workers = vec![];
    for worker_id in 0..NUM_WORKERS {
        let pool = pool.clone();
        let allocations = allocations.clone();

        workers.push(thread::spawn(move || {
            for job in 0..JOBS_PER_WORKER {
                let mut buf = pool.acquire().unwrap_or_else(|| {
                    allocations.fetch_add(1, Ordering::Relaxed);
                    Vec::with_capacity(4096)
                });

                // do some work in the buffer
                buf.clear();
                buf.extend_from_slice(format!("worker {} job {}", worker_id, job).as_bytes());

                // hand it back; a full pool just drops the buffer
                let _ = pool.release(buf);
            }
            println!("Worker {} done", worker_id);
        }));
    }

    for w in workers {
        w.join().unwrap();
    }

    let total_jobs = NUM_WORKERS * JOBS_PER_WORKER;
    let allocated = allocations.load(Ordering::Relaxed);
    println!(
        "\nProcessed {} jobs with {} buffer allocations ({} still pooled)",
        total_jobs,
        allocated,
        pool.len()
    );
}
