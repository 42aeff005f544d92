//! Check a program, run it on the selected backend, collect the outcome.

use std::fmt;

use cell_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use cell_diagnostic::Diagnostic;
use cell_eval::Interpreter;
use cell_ir::{Program, StringInterner};
use cell_jit::{CodegenError, JitSession};
use cell_rt::{buffer_handler, stdout_handler, CellStore, RunContext};
use cell_types::check_program;
use tracing::{debug, info, warn};

use crate::{Backend, OutputMode, RunOptions};

/// How a run ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunStatus {
    /// The program ran. Runtime diagnostics may still have been reported.
    Success,
    /// Type checking failed in this many statements; nothing executed.
    SemanticErrors(usize),
    /// The compiled backend failed before or during code generation.
    InternalError,
}

impl RunStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::SemanticErrors(_) => 1,
            RunStatus::InternalError => 101,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::SemanticErrors(count) => {
                write!(f, "{count} semantic error(s); execution skipped")
            }
            RunStatus::InternalError => write!(f, "internal code generator error"),
        }
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Final cell store; `None` when the program did not execute.
    pub store: Option<CellStore>,
    /// Captured table output; empty unless output was captured.
    pub output: String,
    /// Every diagnostic reported, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// Generated IR with its slot map (JIT only).
    pub ir_text: Option<String>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Writes each phase's new diagnostics to stderr when enabled.
struct PhaseReporter {
    emitter: Option<TerminalEmitter<std::io::Stderr>>,
    emitted: usize,
}

impl PhaseReporter {
    fn new(enabled: bool) -> Self {
        PhaseReporter {
            emitter: enabled.then(|| TerminalEmitter::stderr(ColorMode::Auto)),
            emitted: 0,
        }
    }

    fn phase_done(&mut self, diagnostics: &[Diagnostic]) {
        if let Some(emitter) = &mut self.emitter {
            emitter.emit_all(&diagnostics[self.emitted..]);
            emitter.flush();
        }
        self.emitted = diagnostics.len();
    }

    fn finish(&mut self, diagnostics: &[Diagnostic], status: RunStatus) {
        self.phase_done(diagnostics);
        let Some(emitter) = &mut self.emitter else {
            return;
        };
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        emitter.emit_summary(errors, diagnostics.len() - errors);
        if let RunStatus::SemanticErrors(_) = status {
            eprintln!("{status}");
        }
        emitter.flush();
    }
}

/// Type-check `program` and, when it is clean, run it with the selected
/// backend.
pub fn run_program(
    program: &Program,
    interner: &StringInterner,
    options: &RunOptions,
) -> RunOutcome {
    let printer = match options.output {
        OutputMode::Stdout => stdout_handler(),
        OutputMode::Capture => buffer_handler(),
    };
    let mut ctx = RunContext::new(interner, printer);
    let mut reporter = PhaseReporter::new(options.emit_diagnostics);

    debug!(statements = program.stmt_count(), "checking program");
    let checked = check_program(program, interner, &mut ctx.diagnostics);
    reporter.phase_done(ctx.diagnostics.diagnostics());

    let (status, store, ir_text) = if let Some(guar) = checked.guarantee() {
        let status = RunStatus::SemanticErrors(checked.error_count);
        debug!(%guar, "type check failed");
        warn!(%status, "not executing");
        (status, None, None)
    } else {
        info!(backend = %options.backend, "executing");
        match options.backend {
            Backend::Interpreter => {
                let store = Interpreter::run(program, &mut ctx);
                (RunStatus::Success, Some(store), None)
            }
            Backend::Jit => {
                let mut ir_text = None;
                match run_compiled(program, &mut ctx, options.dump_ir, &mut ir_text) {
                    Ok(store) => (RunStatus::Success, Some(store), ir_text),
                    Err(err) => {
                        warn!(%err, "code generation failed");
                        ctx.diagnostics.emit(err.to_diagnostic());
                        (RunStatus::InternalError, None, ir_text)
                    }
                }
            }
        }
    };

    let diagnostics = ctx.diagnostics.flush();
    reporter.finish(&diagnostics, status);
    debug!(%status, diagnostics = diagnostics.len(), "run finished");

    RunOutcome {
        status,
        store,
        output: ctx.output(),
        diagnostics,
        ir_text,
    }
}

fn run_compiled(
    program: &Program,
    ctx: &mut RunContext<'_>,
    dump_ir: bool,
    ir_text: &mut Option<String>,
) -> Result<CellStore, CodegenError> {
    let mut session = JitSession::new();
    session.initialize()?;
    let generated = session.generate(program, ctx.interner);

    // Available even when verification failed.
    *ir_text = session.ir_text().map(str::to_owned);
    if dump_ir {
        if let Some(ir) = ir_text.as_deref() {
            eprintln!("{ir}");
        }
    }

    generated?;
    session.finalize()?;
    Ok(session.execute(ctx))
}
