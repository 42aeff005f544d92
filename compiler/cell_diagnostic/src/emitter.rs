//! Diagnostic emitters.
//!
//! The driver renders queued diagnostics through a `DiagnosticEmitter` at the
//! end of each phase.

use std::io::{self, Write};

use crate::{Diagnostic, Severity};

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary line of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Human-readable emitter with optional ANSI colors.
///
/// Write errors are ignored: diagnostics are best-effort output.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Consume the emitter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Emitter for stderr, coloring only when stderr is a terminal.
    pub fn stderr(mode: ColorMode) -> Self {
        let is_tty = io::IsTerminal::is_terminal(&io::stderr());
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let rendered = diagnostic.to_string();
        let _ = if self.colors {
            // Color only the `severity[code]` prefix.
            let color = Self::severity_color(diagnostic.severity);
            match rendered.split_once(':') {
                Some((head, tail)) => {
                    writeln!(self.writer, "{color}{head}{}:{tail}", colors::RESET)
                }
                None => writeln!(self.writer, "{color}{rendered}{}", colors::RESET),
            }
        } else {
            writeln!(self.writer, "{rendered}")
        };
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let _ = match (error_count, warning_count) {
            (0, 0) => Ok(()),
            (e, 0) => writeln!(self.writer, "{e} error{} found", plural_s(e)),
            (0, w) => writeln!(self.writer, "{w} warning{} found", plural_s(w)),
            (e, w) => writeln!(
                self.writer,
                "{e} error{} and {w} warning{} found",
                plural_s(e),
                plural_s(w)
            ),
        };
    }
}
