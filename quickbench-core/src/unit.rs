//! Benchmark Units
//!
//! A [`BenchmarkUnit`] is a named zero-argument callable. Synchronous and
//! asynchronous functions share one execution contract: every invocation
//! returns a [`BenchFuture`]. Synchronous work runs eagerly inside
//! [`BenchmarkUnit::invoke`] and its outcome is wrapped in a ready future.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future produced by one invocation of a benchmark unit.
///
/// Resolves to `Err(message)` when the benchmarked function reported a failure.
pub type BenchFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

type InvokeFn = dyn Fn() -> BenchFuture + Send + Sync;

/// Return values a benchmark function may produce.
///
/// `()` is always a success; `Result` maps its error through `Display`.
pub trait Outcome {
    /// Collapse the return value into success or a failure message
    fn into_outcome(self) -> Result<(), String>;
}

impl Outcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), String> {
        Ok(())
    }
}

impl<T, E: fmt::Display> Outcome for Result<T, E> {
    #[inline]
    fn into_outcome(self) -> Result<(), String> {
        self.map(drop).map_err(|e| e.to_string())
    }
}

/// A named callable discovered from a module
#[derive(Clone)]
pub struct BenchmarkUnit {
    name: Arc<str>,
    is_async: bool,
    invoke: Arc<InvokeFn>,
}

impl BenchmarkUnit {
    /// Wrap a synchronous function.
    pub fn sync<F, O>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn() -> O + Send + Sync + 'static,
        O: Outcome,
    {
        Self {
            name: name.into(),
            is_async: false,
            invoke: Arc::new(move || -> BenchFuture {
                let outcome = std::hint::black_box(f()).into_outcome();
                Box::pin(std::future::ready(outcome))
            }),
        }
    }

    /// Wrap an asynchronous function.
    ///
    /// The returned future is awaited to completion on every invocation.
    pub fn asynchronous<F, Fut, O>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: Outcome,
    {
        Self {
            name: name.into(),
            is_async: true,
            invoke: Arc::new(move || -> BenchFuture {
                let fut = f();
                Box::pin(async move { std::hint::black_box(fut.await).into_outcome() })
            }),
        }
    }

    /// Display name (the function's identifier)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the wrapped function is asynchronous
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Start one invocation.
    ///
    /// For synchronous units the work has already completed when this returns.
    #[inline]
    pub fn invoke(&self) -> BenchFuture {
        (self.invoke)()
    }
}

impl fmt::Debug for BenchmarkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkUnit")
            .field("name", &self.name)
            .field("is_async", &self.is_async)
            .finish_non_exhaustive()
    }
}

/// Final segment of a stringified path: `sorts :: fast` becomes `fast`.
#[doc(hidden)]
pub fn path_ident(path: &'static str) -> &'static str {
    path.rsplit("::").next().unwrap_or(path).trim()
}

/// Build a [`BenchmarkUnit`] named after the function identifier.
///
/// For a path such as `sorts::fast` the name is the last segment.
///
/// ```ignore
/// fn compare_sorts() -> Vec<BenchmarkUnit> {
///     vec![unit!(sort_std), unit!(sort_insertion), unit!(async sort_remote)]
/// }
/// ```
#[macro_export]
macro_rules! unit {
    (async $f:path) => {
        $crate::BenchmarkUnit::asynchronous($crate::path_ident(stringify!($f)), $f)
    };
    ($f:path) => {
        $crate::BenchmarkUnit::sync($crate::path_ident(stringify!($f)), $f)
    };
}
