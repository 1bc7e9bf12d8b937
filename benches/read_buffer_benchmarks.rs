//! Read Buffer Benchmarks
//!
//! Measures record and drain throughput on the striped read buffer, from a
//! single thread and under multi-threaded contention. Recorded pointers are
//! synthetic markers; nothing dereferences them.

use cache_compose::read_buffer::{ReadBuffer, READ_BUFFER_COUNT};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;

const OPS_PER_THREAD: usize = 1_000;

fn single_thread_record_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Single-Thread Record/Drain");
    group.throughput(Throughput::Elements(OPS_PER_THREAD as u64));

    group.bench_function("one_stripe", |b| {
        let buffer: ReadBuffer<u64> = ReadBuffer::new();
        b.iter(|| {
            for event in 0..OPS_PER_THREAD {
                black_box(buffer.record(0, (event + 1) as *mut u64));
                if event % 32 == 0 {
                    buffer.drain(|ptr| {
                        black_box(ptr);
                    });
                }
            }
            buffer.drain(|ptr| {
                black_box(ptr);
            });
        });
    });

    group.bench_function("round_robin_stripes", |b| {
        let buffer: ReadBuffer<u64> = ReadBuffer::new();
        b.iter(|| {
            for event in 0..OPS_PER_THREAD {
                black_box(buffer.record(event % READ_BUFFER_COUNT, (event + 1) as *mut u64));
                if event % 512 == 0 {
                    buffer.drain(|ptr| {
                        black_box(ptr);
                    });
                }
            }
            buffer.drain(|ptr| {
                black_box(ptr);
            });
        });
    });
    group.finish();
}

fn contended_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("Contended Record");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(
            BenchmarkId::new("distinct_stripes", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let buffer: Arc<ReadBuffer<u64>> = Arc::new(ReadBuffer::new());
                    let handles: Vec<_> = (0..threads)
                        .map(|id| {
                            let buffer = Arc::clone(&buffer);
                            thread::spawn(move || {
                                for event in 0..OPS_PER_THREAD {
                                    black_box(buffer.record(
                                        id,
                                        (id * OPS_PER_THREAD + event + 1) as *mut u64,
                                    ));
                                    if event % 64 == 0 {
                                        buffer.try_drain(|ptr| {
                                            black_box(ptr);
                                        });
                                    }
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("shared_stripe", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let buffer: Arc<ReadBuffer<u64>> = Arc::new(ReadBuffer::new());
                    let handles: Vec<_> = (0..threads)
                        .map(|id| {
                            let buffer = Arc::clone(&buffer);
                            thread::spawn(move || {
                                for event in 0..OPS_PER_THREAD {
                                    black_box(buffer.record(
                                        0,
                                        (id * OPS_PER_THREAD + event + 1) as *mut u64,
                                    ));
                                    if event % 64 == 0 {
                                        buffer.try_drain(|ptr| {
                                            black_box(ptr);
                                        });
                                    }
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, single_thread_record_drain, contended_record);
criterion_main!(benches);
