//! Tree-walking interpreter for the cell language.
//!
//! Executes a checked program directly against a `CellStore`. Runtime
//! problems are reported to the run's diagnostic queue and evaluate to a
//! defined default; nothing here aborts a run.

mod interpreter;
mod operators;

pub use interpreter::Interpreter;
pub use operators::{evaluate_binary, evaluate_unary};
