//! Append-only diagnostic queue.
//!
//! One queue exists per program run. Diagnostics keep their emission order;
//! nothing is deduplicated, limited or dropped.

use crate::{Diagnostic, ErrorGuaranteed};

/// Collected diagnostics for one run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic of any severity.
    pub fn emit(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
    }

    /// Append an error diagnostic and return proof that it was reported.
    ///
    /// # Panics
    /// Panics in debug builds if `diag` is not an error.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with {:?}", diag.severity);
        self.emit(diag);
        ErrorGuaranteed::new()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take the diagnostics emitted since the last flush.
    ///
    /// The error count is cumulative and survives flushing.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
