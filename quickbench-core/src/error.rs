//! Invocation and Loading Errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error raised while invoking a benchmark unit
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// The benchmarked function returned an error
    #[error("{name} failed: {message}")]
    Failed {
        /// Unit name
        name: String,
        /// Error message reported by the function
        message: String,
    },

    /// An invocation did not finish within the configured timeout
    #[error("{name} timed out after {after:?}")]
    Timeout {
        /// Unit name
        name: String,
        /// Configured limit
        after: Duration,
    },
}

/// Error raised while loading a module's exports
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No module is registered for the path and no such file exists
    #[error("no module found at {}", path.display())]
    NotFound {
        /// Requested path
        path: PathBuf,
    },

    /// A comparison export did not produce a group of units
    #[error("export {name} is not a comparison group")]
    NotAGroup {
        /// Export name
        name: String,
    },
}
