//! Synchronous arithmetic, from trivial to slow

use crate::utils::count_to;
use quickbench::export;
use std::hint::black_box;

#[export]
fn bench_quick_add() {
    let (a, b) = (black_box(1u64), black_box(2u64));
    black_box(a + b);
}

#[export]
fn bench_count_million() {
    black_box(count_to(1_000_000));
}

#[export]
fn bench_count_ten_million() {
    black_box(count_to(10_000_000));
}

/// Not selected: the name lacks the `bench` prefix
#[export]
fn warm_cache() {
    black_box(count_to(1_000));
}
