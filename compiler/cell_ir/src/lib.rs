//! Cell IR - syntax tree types for the cell language.
//!
//! This crate holds the data handed to the engine by the external parser:
//! - Spans for source locations
//! - Names for interned identifiers (cell ids, function names, text literals)
//! - Expression arena, expressions and statements
//! - The builtin aggregate function table
//! - Cell coordinate parsing used by range expansion
//!
//! The tree is built once and read-only afterwards. Child expressions are
//! referenced by `ExprId` into an `ExprArena`; statement bodies are owned
//! vectors.

mod arena;
pub mod ast;
mod builder;
mod builtins;
mod cell_coord;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
pub use builder::ProgramBuilder;
pub use builtins::Aggregate;
pub use cell_coord::CellCoord;
pub use expr_id::{ExprId, ExprRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
