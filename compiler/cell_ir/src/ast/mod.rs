//! AST node types.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Stmt, StmtKind};

use crate::ExprArena;

/// A parsed program: its expression arena and top-level statements.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Program {
    pub arena: ExprArena,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(arena: ExprArena, body: Vec<Stmt>) -> Self {
        Program { arena, body }
    }

    /// Total statement count, including nested bodies.
    pub fn stmt_count(&self) -> usize {
        fn count(stmts: &[Stmt]) -> usize {
            stmts
                .iter()
                .map(|stmt| match &stmt.kind {
                    StmtKind::If { body, .. } | StmtKind::While { body, .. } => 1 + count(body),
                    _ => 1,
                })
                .sum()
        }
        count(&self.body)
    }
}
