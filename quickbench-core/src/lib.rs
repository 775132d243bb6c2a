#![warn(missing_docs)]
//! QuickBench Core - Execution Engine
//!
//! This crate provides the pieces that actually measure code:
//! - [`BenchmarkUnit`]: uniform sync/async callable
//! - [`Timer`] and [`time_invocation`]: wall-clock latency of one invocation
//! - [`Invoker`]: fixed warm-up followed by N timed invocations
//! - [`Registry`]: modules and exports collected via `inventory`

mod error;
mod invoker;
mod measure;
mod registry;
mod unit;

pub use error::{InvokeError, LoadError};
pub use invoker::{DEFAULT_ITERATIONS, FunctionScore, Invoker, WARMUP_ITERATIONS};
pub use measure::{Timer, as_millis_f64, time_invocation};
pub use registry::{
    ComparisonGroup, Export, ExportDef, ExportFactory, ExportKind, GroupFactory, Module,
    ModuleLoader, REGISTRY_ANCHOR, Registry,
};
pub use unit::{BenchFuture, BenchmarkUnit, Outcome, path_ident};
