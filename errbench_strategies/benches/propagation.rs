//! Per-strategy propagation micro-benchmarks.
//!
//! One benchmark per (workload, strategy, failure rate). Each iteration is a
//! full outer loop of one worker, timed manually so that injecting and
//! restoring the poisoned value stays inside the measured region the same
//! way it does in the harness:
//! - `sqrt/<strategy>/<rate>`: 10000 array-transform calls, 10 passes each
//! - `fib/<strategy>/<rate>`: 10000 fib(15) calls
//!
//! The baseline is only measured at rate 0.
//!
//! Every benchmark runs a single worker. Contention across thread counts is
//! measured by the `errbench` binary's thread sweep, not here.

use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use errbench_common::consts::{
    DEFAULT_FAILURE_RATES, DEFAULT_FIB_DEPTH, DEFAULT_INNER_REPEAT, DEFAULT_POISON_INDEX,
    DEFAULT_REPEAT, DEFAULT_VALUES_LEN,
};
use errbench_common::rng::XorShift64Star;
use errbench_strategies::Strategy;

fn rates(strategy: Strategy) -> &'static [u32] {
    if strategy.is_fail_fast() {
        &DEFAULT_FAILURE_RATES[..1]
    } else {
        &DEFAULT_FAILURE_RATES
    }
}

fn bench_sqrt(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqrt");
    for strategy in Strategy::ALL {
        for &rate in rates(strategy) {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), rate),
                &rate,
                |b, &rate| {
                    b.iter_custom(|iters| {
                        let mut values = [1.0f64; DEFAULT_VALUES_LEN];
                        let mut rng = XorShift64Star::new(0);
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let mut failures = 0u32;
                            let start = Instant::now();
                            for _ in 0..DEFAULT_REPEAT {
                                if rng.chance_permille(rate) {
                                    values[DEFAULT_POISON_INDEX] = -1.0;
                                }
                                failures += strategy.sqrt(&mut values, DEFAULT_INNER_REPEAT);
                                values[DEFAULT_POISON_INDEX] = 1.0;
                            }
                            total += start.elapsed();
                            black_box(failures);
                        }
                        total
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_fib(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib");
    for strategy in Strategy::ALL {
        for &rate in rates(strategy) {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), rate),
                &rate,
                |b, &rate| {
                    b.iter_custom(|iters| {
                        let mut rng = XorShift64Star::new(0);
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let mut sum = 0u32;
                            let start = Instant::now();
                            for _ in 0..DEFAULT_REPEAT {
                                let budget = if rng.chance_permille(rate) {
                                    DEFAULT_FIB_DEPTH - 2
                                } else {
                                    DEFAULT_FIB_DEPTH + 1
                                };
                                sum = sum.wrapping_add(
                                    strategy.fib(black_box(DEFAULT_FIB_DEPTH), budget),
                                );
                            }
                            total += start.elapsed();
                            black_box(sum);
                        }
                        total
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sqrt, bench_fib);
criterion_main!(benches);
