//! Type checking for the cell language.
//!
//! A single pass computes a coarse type per expression and rejects text in
//! numeric contexts before anything executes. Violations never short-circuit:
//! every problem in the program is reported, and the statement-level error
//! count gates execution.

mod checker;
mod ty;

pub use checker::{check_program, TypeCheckResult, TypeChecker};
pub use ty::Type;
