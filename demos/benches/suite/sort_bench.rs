//! Sort strategies ranked against each other

use crate::utils::scrambled;
use quickbench::prelude::*;
use std::hint::black_box;

const LEN: usize = 2_000;

fn sort_stable() {
    let mut v = scrambled(LEN);
    v.sort();
    black_box(v);
}

fn sort_unstable() {
    let mut v = scrambled(LEN);
    v.sort_unstable();
    black_box(v);
}

fn sort_insertion() {
    let mut v = scrambled(LEN);
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j - 1] > v[j] {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
    black_box(v);
}

#[export]
fn bench_sort_stable() {
    sort_stable();
}

#[export]
fn compare_sorts() -> Vec<BenchmarkUnit> {
    vec![unit!(sort_insertion), unit!(sort_stable), unit!(sort_unstable)]
}
