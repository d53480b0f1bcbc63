//! Thread-safe diagnostic accumulator the emit cache forwards into.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Collects backend diagnostics for the host.
///
/// Each diagnostic is mirrored as a `tracing` event at the level matching its
/// severity. Per-severity counts are kept atomically, so they can be read
/// without taking the lock and survive [`take_all`](Self::take_all).
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    counts: [AtomicUsize; Severity::COUNT],
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            counts: Default::default(),
        }
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => tracing::error!(code = diag.code, "{diag}"),
            Severity::Warning => tracing::warn!(code = diag.code, "{diag}"),
            Severity::Suggestion | Severity::Message => {
                tracing::info!(code = diag.code, "{diag}")
            }
        }
        self.counts[diag.severity.index()].fetch_add(1, Ordering::Relaxed);
        self.diagnostics.lock().unwrap().push(diag);
    }

    /// Records a batch of diagnostics, keeping their order.
    pub fn emit_all(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        diags.into_iter().for_each(|diag| self.emit(diag));
    }

    /// Number of diagnostics of `severity` recorded so far.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.index()].load(Ordering::Relaxed)
    }

    /// Number of error diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Drains the recorded diagnostics. Counts are not reset.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock().unwrap())
    }

    /// Copies the recorded diagnostics without draining them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    /// Copies the recorded diagnostics located in `path`.
    pub fn for_path(&self, path: &Path) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.location.as_ref().is_some_and(|loc| loc.path == path))
            .cloned()
            .collect()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
