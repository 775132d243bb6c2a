//! QuickBench demo suite
//!
//! Every `*_bench.rs` module below registers its exports with
//! `#[export]`; `quickbench::run()` finds them through `quickbench.toml`.

mod arith_bench;
mod sleep_bench;
mod sort_bench;
mod utils;

fn main() -> anyhow::Result<()> {
    quickbench::run()
}
