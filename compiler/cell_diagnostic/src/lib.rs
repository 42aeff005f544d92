//! Diagnostic system shared by the checker, the interpreter and the code
//! generator.
//!
//! Every user-facing problem becomes a `Diagnostic` pushed onto a
//! `DiagnosticQueue`, the run's append-only message channel:
//! - Error codes for searchability
//! - A message saying what went wrong
//! - An optional primary span saying where
//! - Notes for context
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was
//! emitted. It can only be obtained from `DiagnosticQueue::emit_error` or
//! from a nonzero error count.

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::DiagnosticQueue;
