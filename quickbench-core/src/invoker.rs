//! Invoker - Warm-up and Measurement Loop
//!
//! Runs one [`BenchmarkUnit`] through a fixed warm-up phase followed by a
//! fixed number of timed invocations. Every invocation is awaited before the
//! next one starts, regardless of whether the unit is sync or async.

use crate::error::InvokeError;
use crate::measure::{complete, time_invocation};
use crate::unit::BenchmarkUnit;
use std::time::Duration;

/// Number of discarded invocations before measurement starts
pub const WARMUP_ITERATIONS: u32 = 3;

/// Default number of measured invocations
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Aggregated result for one benchmark unit
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionScore {
    /// Unit name
    pub name: String,
    /// Sum of all measured samples in milliseconds
    pub total_latency_ms: f64,
    /// `total_latency_ms / iterations`
    pub average_latency_ms: f64,
    /// Number of measured invocations
    pub iterations: u32,
}

/// Runs benchmark units with a fixed iteration count
#[derive(Debug, Clone, Copy)]
pub struct Invoker {
    iterations: u32,
    timeout: Option<Duration>,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl Invoker {
    /// Create an invoker measuring `iterations` invocations per unit.
    ///
    /// Zero iterations would leave the average undefined, so the count is
    /// clamped to one.
    pub fn new(iterations: u32) -> Self {
        if iterations == 0 {
            tracing::warn!("iteration count 0 is not measurable, using 1");
        }
        Self {
            iterations: iterations.max(1),
            timeout: None,
        }
    }

    /// Bound every invocation (warm-up included) by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Measured invocations per unit
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Warm up, then time `iterations` invocations of `unit`.
    ///
    /// The unit is invoked exactly `WARMUP_ITERATIONS + iterations` times.
    /// The first failure aborts the run and is returned as-is.
    pub async fn run(&self, unit: &BenchmarkUnit) -> Result<FunctionScore, InvokeError> {
        for _ in 0..WARMUP_ITERATIONS {
            complete(unit, self.timeout).await?;
        }

        let mut total_latency_ms = 0.0;
        for _ in 0..self.iterations {
            total_latency_ms += time_invocation(unit, self.timeout).await?;
        }

        let average_latency_ms = total_latency_ms / f64::from(self.iterations);
        tracing::debug!(
            unit = unit.name(),
            iterations = self.iterations,
            average_latency_ms,
            "measurement complete"
        );

        Ok(FunctionScore {
            name: unit.name().to_string(),
            total_latency_ms,
            average_latency_ms,
            iterations: self.iterations,
        })
    }
}
