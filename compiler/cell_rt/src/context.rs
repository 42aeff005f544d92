//! Per-run state shared by every phase.

use cell_diagnostic::DiagnosticQueue;
use cell_ir::StringInterner;

use crate::SharedPrintHandler;

/// Everything one program run needs besides the cell storage itself.
///
/// Created once per run and dropped when the run ends. The checker, the
/// interpreter and the compiled routine's helpers all report into the same
/// diagnostic queue and print through the same handler.
pub struct RunContext<'a> {
    pub interner: &'a StringInterner,
    pub diagnostics: DiagnosticQueue,
    pub printer: SharedPrintHandler,
}

impl<'a> RunContext<'a> {
    pub fn new(interner: &'a StringInterner, printer: SharedPrintHandler) -> Self {
        RunContext {
            interner,
            diagnostics: DiagnosticQueue::new(),
            printer,
        }
    }

    /// Context that captures table output in memory.
    pub fn capturing(interner: &'a StringInterner) -> Self {
        Self::new(interner, crate::buffer_handler())
    }

    /// Captured table output; empty when printing to stdout.
    pub fn output(&self) -> String {
        self.printer.get_output()
    }
}
