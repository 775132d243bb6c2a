//! Wall-Clock Timing
//!
//! Measures a single invocation with `std::time::Instant`, which is
//! nanosecond-capable on every supported platform. Latencies are reported
//! in fractional milliseconds.

use crate::error::InvokeError;
use crate::unit::BenchmarkUnit;
use std::time::{Duration, Instant};

/// Convert a duration into fractional milliseconds.
///
/// Whole seconds and the sub-second nanosecond part are combined before
/// scaling, so no precision is lost for sub-millisecond latencies.
#[inline]
pub fn as_millis_f64(elapsed: Duration) -> f64 {
    let nanos = elapsed.as_secs() as f64 * 1_000_000_000.0 + f64::from(elapsed.subsec_nanos());
    nanos / 1_000_000.0
}

/// Timer for measuring one invocation
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since `start`, in milliseconds
    #[inline(always)]
    pub fn stop(&self) -> f64 {
        as_millis_f64(self.start.elapsed())
    }
}

/// Time exactly one invocation of `unit`.
///
/// The start timestamp is taken immediately before the call, and the end
/// timestamp only after the returned future resolves, so the wait of an
/// asynchronous benchmark is part of the sample. Failures are returned to the
/// caller untouched.
pub async fn time_invocation(
    unit: &BenchmarkUnit,
    timeout: Option<Duration>,
) -> Result<f64, InvokeError> {
    let timer = Timer::start();
    complete(unit, timeout).await?;
    Ok(timer.stop())
}

/// Invoke `unit` once and wait for it to finish, honouring `timeout`.
pub(crate) async fn complete(
    unit: &BenchmarkUnit,
    timeout: Option<Duration>,
) -> Result<(), InvokeError> {
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, unit.invoke())
            .await
            .map_err(|_| InvokeError::Timeout {
                name: unit.name().to_string(),
                after: limit,
            })?,
        None => unit.invoke().await,
    };

    outcome.map_err(|message| InvokeError::Failed {
        name: unit.name().to_string(),
        message,
    })
}
