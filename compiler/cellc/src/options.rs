//! Run configuration.
//!
//! Nothing persists between runs: a `RunOptions` value is built per run,
//! optionally overlaid with environment variables.
//!
//! - `CELL_BACKEND`: `interp`, `interpreter` or `jit` (case-insensitive)
//! - `CELL_DUMP_IR`: any non-empty value other than `0` prints the
//!   generated IR to stderr

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Which executor runs a checked program.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Backend {
    #[default]
    Interpreter,
    Jit,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Interpreter, Backend::Jit];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Interpreter => "interp",
            Backend::Jit => "jit",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown backend `{0}` (expected `interp` or `jit`)")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interp" | "interpreter" => Ok(Backend::Interpreter),
            "jit" => Ok(Backend::Jit),
            _ => Err(UnknownBackend(s.to_owned())),
        }
    }
}

/// Where TABLE lines go.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Keep table output in memory; see `RunOutcome::output`.
    Capture,
}

/// Options for one run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunOptions {
    pub backend: Backend,
    pub output: OutputMode,
    /// Render diagnostics to stderr as each phase finishes.
    pub emit_diagnostics: bool,
    /// Print the generated IR to stderr (JIT only).
    pub dump_ir: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            backend: Backend::Interpreter,
            output: OutputMode::Stdout,
            emit_diagnostics: true,
            dump_ir: false,
        }
    }
}

impl RunOptions {
    /// Silent options for embedding and tests: output captured, no stderr.
    pub fn captured(backend: Backend) -> Self {
        RunOptions {
            backend,
            output: OutputMode::Capture,
            emit_diagnostics: false,
            dump_ir: false,
        }
    }

    /// Defaults overlaid with `CELL_BACKEND` and `CELL_DUMP_IR`.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay settings from a variable lookup.
    ///
    /// An unrecognized backend is logged and ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("CELL_BACKEND") {
            match value.parse() {
                Ok(backend) => self.backend = backend,
                Err(err) => warn!(%err, "ignoring CELL_BACKEND"),
            }
        }
        if let Some(value) = lookup("CELL_DUMP_IR") {
            self.dump_ir = !value.is_empty() && value != "0";
        }
        self
    }
}
