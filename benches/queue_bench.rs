use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use flume::bounded as flume_bounded;
use ring_pool::MpmcQueue;
use std::sync::mpsc::sync_channel;

const MESSAGES: usize = 1_000_000;
const BUFFER_SIZE: usize = 1024;

fn push_all(q: &MpmcQueue<usize>, from: usize, to: usize) {
    for i in from..to {
        let mut v = black_box(i);
        while let Err(e) = q.try_push(v) {
            v = e.into_inner();
            std::hint::spin_loop();
        }
    }
}

fn pop_n(q: &MpmcQueue<usize>, n: usize) {
    for _ in 0..n {
        while q.try_pop().is_none() {
            std::hint::spin_loop();
        }
    }
}

fn bench_1p_1c(c: &mut Criterion) {
    let mut group = c.benchmark_group("1p_1c");
    group.throughput(Throughput::Elements(MESSAGES as u64));

    group.bench_function("ring_pool", |b| {
        b.iter(|| {
            let queue = Arc::new(MpmcQueue::<usize>::new(BUFFER_SIZE).unwrap());
            let q_push = queue.clone();
            let q_pop = queue.clone();

            let producer = thread::spawn(move || push_all(&q_push, 0, MESSAGES));
            let consumer = thread::spawn(move || pop_n(&q_pop, MESSAGES));

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = bounded::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume_bounded::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("std_mpsc", |b| {
        b.iter(|| {
            let (tx, rx) = sync_channel::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_4p_4c(c: &mut Criterion) {
    let mut group = c.benchmark_group("4p_4c");
    group.throughput(Throughput::Elements(MESSAGES as u64));
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = MESSAGES / PRODUCERS;
    const PER_CONSUMER: usize = MESSAGES / CONSUMERS;

    group.bench_function("ring_pool", |b| {
        b.iter(|| {
            let queue = Arc::new(MpmcQueue::<usize>::new(BUFFER_SIZE).unwrap());
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let q = queue.clone();
                handles.push(thread::spawn(move || {
                    push_all(&q, p * PER_PRODUCER, (p + 1) * PER_PRODUCER)
                }));
            }
            for _ in 0..CONSUMERS {
                let q = queue.clone();
                handles.push(thread::spawn(move || pop_n(&q, PER_CONSUMER)));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        tx.send(black_box(p * PER_PRODUCER + i)).unwrap();
                    }
                }));
            }
            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume_bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        tx.send(black_box(p * PER_PRODUCER + i)).unwrap();
                    }
                }));
            }
            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

fn bench_pool_churn(c: &mut Criterion) {
    use ring_pool::{ConcurrentPool, Pool};

    let mut group = c.benchmark_group("pool_churn");
    group.throughput(Throughput::Elements(MESSAGES as u64));
    const THREADS: usize = 4;
    const PER_THREAD: usize = MESSAGES / THREADS;

    group.bench_function("acquire_release", |b| {
        b.iter(|| {
            let pool = Arc::new(ConcurrentPool::<Vec<u8>>::new(BUFFER_SIZE).unwrap());
            let mut handles = vec![];

            for _ in 0..THREADS {
                let pool = pool.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        let buf = pool
                            .acquire()
                            .unwrap_or_else(|| Vec::with_capacity(256));
                        let _ = pool.release(black_box(buf));
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_1p_1c, bench_4p_4c, bench_pool_churn);
criterion_main!(benches);
