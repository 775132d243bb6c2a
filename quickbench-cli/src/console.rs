//! Console Output
//!
//! Shared handle for everything the harness prints to stdout. Progress lines
//! are written as they happen and only in console mode; the final report is
//! always written.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable stdout handle shared by all module tasks
#[derive(Clone)]
pub struct Console {
    progress: bool,
    out: SharedWriter,
}

impl Console {
    /// Console writing to `writer`
    pub fn with_writer(progress: bool, writer: impl Write + Send + 'static) -> Self {
        Self {
            progress,
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Print one progress line
    pub fn progress(&self, args: fmt::Arguments<'_>) {
        if !self.progress {
            return;
        }
        let mut out = self.lock();
        if let Err(e) = writeln!(out, "{}", args).and_then(|()| out.flush()) {
            tracing::debug!("failed to write progress: {}", e);
        }
    }

    /// Write final output
    pub fn emit(&self, text: &str) -> io::Result<()> {
        let mut out = self.lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

/// In-memory writer for capturing console output
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl Capture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
