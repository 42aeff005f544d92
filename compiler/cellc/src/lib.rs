//! Cell language driver.
//!
//! ```text
//! Program (from the parser, via ProgramBuilder)
//!     │
//!     ▼
//! check_program ──► error count > 0 ──► SemanticErrors, exit 1
//!     │
//!     ▼
//! Interpreter | JitSession ──► RunOutcome (store, output, diagnostics)
//! ```
//!
//! The lexer, the parser and the process entry point live outside this
//! workspace. They build a `Program`, call [`run_program`] and exit with
//! [`RunOutcome::exit_code`].

mod driver;
mod options;
pub mod tracing_setup;

pub use driver::{run_program, RunOutcome, RunStatus};
pub use options::{Backend, OutputMode, RunOptions, UnknownBackend};
