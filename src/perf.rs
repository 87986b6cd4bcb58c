//! Lightweight performance instrumentation.
//!
//! Two opt-in channels: coarse [`Scope`] timers printed to stderr with
//! `--perf`, and a timestamped event trace written to a file with
//! `--render-debug-log`. Scope timings also land in the trace, so one
//! file captures a whole session: registry scans, image materialization,
//! watcher activity, and per-frame prep/draw timings.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

static STDERR_TIMERS: AtomicBool = AtomicBool::new(false);
static EVENT_TRACE: Mutex<Option<EventTrace>> = Mutex::new(None);

struct EventTrace {
    started: Instant,
    writer: BufWriter<File>,
}

/// Times a named region; reports on drop.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if is_enabled() {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        log_event(self.name, format!("elapsed_ms={elapsed_ms:.3}"));
    }
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn set_enabled(enabled: bool) {
    STDERR_TIMERS.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    STDERR_TIMERS.load(Ordering::Relaxed)
}

/// Start tracing events to `path`, or stop tracing with `None`.
///
/// # Errors
///
/// Returns an error if the trace file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut slot = EVENT_TRACE.lock().unwrap_or_else(PoisonError::into_inner);
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "reel debug log v{}", env!("CARGO_PKG_VERSION"))?;
            writer.flush()?;
            *slot = Some(EventTrace {
                started: Instant::now(),
                writer,
            });
        }
        None => *slot = None,
    }
    Ok(())
}

/// Append one event to the trace; a no-op when tracing is off.
///
/// Event names are dotted paths grouped by subsystem
/// (`registry.scan`, `image.materialize`, `frame.draw`, `watcher.ready`)
/// so a trace can be filtered with a plain grep.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut slot = EVENT_TRACE.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(trace) = slot.as_mut() else {
        return;
    };
    let at_ms = trace.started.elapsed().as_secs_f64() * 1000.0;
    let _ = writeln!(trace.writer, "{at_ms:>9.3} {name} {}", detail.as_ref());
    let _ = trace.writer.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_stderr_timer_flag_toggles() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_trace_records_events_and_scope_timings() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();

        log_event("registry.scan", "discovered=2 bound=2");
        drop(scope("app.load_deck"));

        set_debug_log_path(None).unwrap();
        // Tracing stopped: this must not reach the file
        log_event("late.event", "ignored");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("reel debug log v"));
        assert!(content.contains("registry.scan discovered=2 bound=2"));
        assert!(content.contains("app.load_deck elapsed_ms="));
        assert!(!content.contains("late.event"));
    }
}
