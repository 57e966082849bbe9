//! Session instrumentation: timing scopes and an optional debug event log.
//!
//! The event log is a plain text file with one timestamped line per event
//! (`key.decoded`, `callback.merge`, `highlight.show`, ...). It is off until
//! [`set_debug_log_path`] is given a path. Writing to a file keeps the
//! diagnostics off the terminal line being edited.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Environment variable naming a debug log file.
pub const DEBUG_LOG_ENV: &str = "RAWLINE_DEBUG_LOG";

static TIMING: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::closed()));

/// Reports its lifetime when dropped, if timing is enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if timing_enabled() {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        log_event("scope.end", format!("{} elapsed_ms={elapsed_ms:.3}", self.name));
    }
}

#[derive(Debug)]
struct EventLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn closed() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

fn event_log() -> MutexGuard<'static, EventLog> {
    // A panic while holding the lock cannot leave the log inconsistent.
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Print scope timings to stderr.
pub fn set_timing(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn timing_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

/// Start timing a named section; the report happens when the guard drops.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Open (or, with `None`, close) the debug event log.
///
/// # Errors
/// Returns an error if the file cannot be created or the header written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = event_log();
    log.writer = None;
    if let Some(path) = path {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "rawline debug log start")?;
        writer.flush()?;
        log.start = Instant::now();
        log.writer = Some(writer);
    }
    Ok(())
}

pub fn debug_log_enabled() -> bool {
    event_log().writer.is_some()
}

/// Append one event line. A no-op while the log is closed.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = event_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    let Some(writer) = log.writer.as_mut() else {
        return;
    };
    let written = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {}", detail.as_ref())
        .and_then(|()| writer.flush());
    if let Err(err) = written {
        tracing::warn!("debug log write failed: {err}");
    }
}
