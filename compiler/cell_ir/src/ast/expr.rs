//! Expression nodes.

use crate::{BinaryOp, ExprId, ExprRange, Name, Span, UnaryOp};

/// Expression node.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
///
/// Closed set; children are arena indices.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),

    /// Float literal: `3.14`
    Float(f64),

    /// Text literal: `"hello"`
    Text(Name),

    /// Cell reference: `A1`
    CellRef(Name),

    /// Unary operation: `NOT x`, `-x`
    Unary { op: UnaryOp, operand: ExprId },

    /// Binary operation: `left op right`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Function call: `SUM(A1:B2, 3)`
    Call { func: Name, args: ExprRange },

    /// Cell range: `A1:B2`. Only meaningful as a call argument.
    Range { start: Name, end: Name },
}
