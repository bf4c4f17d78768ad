//! Where user-facing notices go.
//!
//! The provider reports a handful of one-line messages ("created new config",
//! "loaded from", and a warning when no user config dir exists). A [`Streams`]
//! implementation decides what happens to them. Without one, they are dropped.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Sink for informational (`out`) and warning (`err_out`) lines.
///
/// Lines are passed without a trailing newline.
pub trait Streams: Send + Sync {
    fn out(&self, line: &str);
    fn err_out(&self, line: &str);
}

impl<S: Streams + ?Sized> Streams for Arc<S> {
    fn out(&self, line: &str) {
        (**self).out(line);
    }

    fn err_out(&self, line: &str) {
        (**self).err_out(line);
    }
}

/// Standard output and standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdStreams;

impl Streams for StdStreams {
    fn out(&self, line: &str) {
        println!("{line}");
    }

    fn err_out(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// Drops every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Streams for Discard {
    fn out(&self, _line: &str) {}

    fn err_out(&self, _line: &str) {}
}

/// Captures lines in memory. Safe to share between threads.
#[derive(Debug, Default)]
pub struct Buffers {
    out: Mutex<String>,
    err: Mutex<String>,
}

impl Buffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `(out, err_out)` contents, one line per notice.
    pub fn contents(&self) -> (String, String) {
        (lock(&self.out).clone(), lock(&self.err).clone())
    }

    pub fn reset(&self) {
        lock(&self.out).clear();
        lock(&self.err).clear();
    }
}

impl Streams for Buffers {
    fn out(&self, line: &str) {
        let mut buf = lock(&self.out);
        buf.push_str(line);
        buf.push('\n');
    }

    fn err_out(&self, line: &str) {
        let mut buf = lock(&self.err);
        buf.push_str(line);
        buf.push('\n');
    }
}

// A poisoned buffer still holds valid text.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

type SharedWriter = Mutex<Box<dyn Write + Send>>;

/// Writes lines to arbitrary writers. Write errors are ignored.
pub struct Writers {
    out: SharedWriter,
    err: SharedWriter,
}

impl Writers {
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }
}

impl Streams for Writers {
    fn out(&self, line: &str) {
        let _ = writeln!(lock(&self.out), "{line}");
    }

    fn err_out(&self, line: &str) {
        let _ = writeln!(lock(&self.err), "{line}");
    }
}

/// Forwards lines to `tracing` as events at the chosen levels.
#[derive(Debug, Clone, Copy)]
pub struct Tracing {
    info: tracing::Level,
    err: tracing::Level,
}

impl Tracing {
    pub fn new(info: tracing::Level, err: tracing::Level) -> Self {
        Self { info, err }
    }
}

impl Default for Tracing {
    fn default() -> Self {
        Self::new(tracing::Level::INFO, tracing::Level::WARN)
    }
}

impl Streams for Tracing {
    fn out(&self, line: &str) {
        emit(self.info, line);
    }

    fn err_out(&self, line: &str) {
        emit(self.err, line);
    }
}

// `tracing` macros need a constant level.
fn emit(level: tracing::Level, line: &str) {
    if level == tracing::Level::ERROR {
        tracing::error!("{line}");
    } else if level == tracing::Level::WARN {
        tracing::warn!("{line}");
    } else if level == tracing::Level::INFO {
        tracing::info!("{line}");
    } else if level == tracing::Level::DEBUG {
        tracing::debug!("{line}");
    } else {
        tracing::trace!("{line}");
    }
}
