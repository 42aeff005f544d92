//! Statement nodes.

use crate::{ExprId, Name, Span};

/// Statement node.
#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
///
/// There is no else branch; `If` either runs its body or does nothing.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `A1 = expr`
    Assign { cell: Name, value: ExprId },

    /// `IF cond { body }`
    If { cond: ExprId, body: Vec<Stmt> },

    /// `WHILE cond { body }`
    While { cond: ExprId, body: Vec<Stmt> },

    /// `TABLE`
    Table,

    /// `EXPORT "path.csv"`
    Export { path: Name },
}
