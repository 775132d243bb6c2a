//! QuickBench Demos
//!
//! Runnable benchmark suite for QuickBench. This crate is not published; it
//! exists to host a suite that depends on `quickbench`.
//!
//! Run it with (the bench binary starts in this directory and finds
//! `quickbench.toml` here):
//! ```sh
//! cargo bench -p quickbench-demos
//! cargo bench -p quickbench-demos -- --compare
//! cargo bench -p quickbench-demos -- --json --fixed 2
//! ```
//!
//! ## Modules
//!
//! | File | Shows |
//! |------|-------|
//! | `arith_bench.rs` | Synchronous functions from trivial to slow |
//! | `sleep_bench.rs` | Async functions awaiting timers |
//! | `sort_bench.rs` | A `compare*` group ranking sort strategies |
//! | `utils.rs` | Shared helpers; skipped because its name does not end in `bench` |
