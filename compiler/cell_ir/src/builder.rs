//! Programmatic construction of cell programs.
//!
//! This is the seam the external parser uses, and the way tests write
//! programs without source text. Every node gets `Span::DUMMY` unless the
//! `*_at` variants are used.

use crate::ast::{Expr, ExprKind, Program, Stmt, StmtKind};
use crate::{BinaryOp, ExprArena, ExprId, Name, Span, StringInterner, UnaryOp};

/// Builds one `Program`, interning names as it goes.
pub struct ProgramBuilder<'a> {
    interner: &'a StringInterner,
    arena: ExprArena,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        ProgramBuilder {
            interner,
            arena: ExprArena::new(),
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Intern a cell id, function name or text.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn expr_at(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.expr_at(kind, Span::DUMMY)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Float(value))
    }

    pub fn text(&mut self, value: &str) -> ExprId {
        let name = self.name(value);
        self.expr(ExprKind::Text(name))
    }

    pub fn cell(&mut self, id: &str) -> ExprId {
        let name = self.name(id);
        self.expr(ExprKind::CellRef(name))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn neg(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Neg, operand)
    }

    pub fn not(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Not, operand)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn call(&mut self, func: &str, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let func = self.name(func);
        let args = self.arena.alloc_expr_list(args);
        self.expr(ExprKind::Call { func, args })
    }

    pub fn range(&mut self, start: &str, end: &str) -> ExprId {
        let start = self.name(start);
        let end = self.name(end);
        self.expr(ExprKind::Range { start, end })
    }

    pub fn assign(&self, cell: &str, value: ExprId) -> Stmt {
        Stmt::new(
            StmtKind::Assign {
                cell: self.name(cell),
                value,
            },
            Span::DUMMY,
        )
    }

    pub fn if_(&self, cond: ExprId, body: Vec<Stmt>) -> Stmt {
        Stmt::new(StmtKind::If { cond, body }, Span::DUMMY)
    }

    pub fn while_(&self, cond: ExprId, body: Vec<Stmt>) -> Stmt {
        Stmt::new(StmtKind::While { cond, body }, Span::DUMMY)
    }

    pub fn table(&self) -> Stmt {
        Stmt::new(StmtKind::Table, Span::DUMMY)
    }

    pub fn export(&self, path: &str) -> Stmt {
        Stmt::new(
            StmtKind::Export {
                path: self.name(path),
            },
            Span::DUMMY,
        )
    }

    /// Finish with the given top-level statements.
    pub fn finish(self, body: Vec<Stmt>) -> Program {
        Program::new(self.arena, body)
    }
}
