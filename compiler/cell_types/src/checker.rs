//! The type checker.

use cell_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use cell_ir::{
    Aggregate, BinaryOp, ExprArena, ExprId, ExprKind, Program, Span, Stmt, StmtKind,
    StringInterner, UnaryOp,
};
use tracing::{debug, trace};

use crate::Type;

/// Result of checking a whole program.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TypeCheckResult {
    /// Number of statements that failed their checks.
    pub error_count: usize,
}

impl TypeCheckResult {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Proof that errors were reported, when there are any.
    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }
}

/// Check a program, reporting every violation to `diagnostics`.
pub fn check_program(
    program: &Program,
    interner: &StringInterner,
    diagnostics: &mut DiagnosticQueue,
) -> TypeCheckResult {
    let mut checker = TypeChecker::new(&program.arena, interner, diagnostics);
    let error_count = checker.analyze_stmts(&program.body);
    debug!(error_count, "type check finished");
    TypeCheckResult { error_count }
}

/// Expression and statement checker over one arena.
///
/// Every node that turns into `Type::Error` on its own emits exactly one
/// diagnostic. Nodes that are Error only because an operand is Error stay
/// silent, so one mistake is reported once.
pub struct TypeChecker<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    diagnostics: &'a mut DiagnosticQueue,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        diagnostics: &'a mut DiagnosticQueue,
    ) -> Self {
        TypeChecker {
            arena,
            interner,
            diagnostics,
        }
    }

    /// Compute the type of an expression.
    pub fn analyze_expr(&mut self, id: ExprId) -> Type {
        let expr = self.arena.get_expr(id);
        let span = expr.span;
        match expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Text(_) => Type::Text,
            // Cells are loosely typed: whatever they hold is read numerically.
            ExprKind::CellRef(_) => Type::Float,
            ExprKind::Unary { op, operand } => self.analyze_unary(op, operand, span),
            ExprKind::Binary { op, left, right } => self.analyze_binary(op, left, right, span),
            ExprKind::Call { func, args } => {
                let args = self.arena.get_expr_list(args);
                self.analyze_call(self.interner.lookup(func), args, span)
            }
            ExprKind::Range { start, end } => {
                self.report(
                    Diagnostic::error(ErrorCode::E2007)
                        .with_message(format!(
                            "range `{}:{}` can only be used as a function argument",
                            self.interner.lookup(start),
                            self.interner.lookup(end)
                        ))
                        .with_label(span, "range outside a call"),
                );
                Type::Error
            }
        }
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> Type {
        let operand_ty = self.analyze_expr(operand);
        match operand_ty {
            Type::Error => Type::Error,
            Type::Text => {
                self.report(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!("`{}` requires a numeric operand", op.as_symbol()))
                        .with_label(span, "text operand"),
                );
                Type::Error
            }
            Type::Int | Type::Float => match op {
                UnaryOp::Not => Type::Int,
                UnaryOp::Neg => operand_ty,
            },
        }
    }

    fn analyze_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, span: Span) -> Type {
        let left_ty = self.analyze_expr(left);
        let right_ty = self.analyze_expr(right);

        if left_ty == Type::Text || right_ty == Type::Text {
            let (code, what) = if op.is_arithmetic() {
                (ErrorCode::E2001, "arithmetic")
            } else if op.is_comparison() {
                (ErrorCode::E2002, "comparison")
            } else {
                (ErrorCode::E2003, "logical operator")
            };
            self.report(
                Diagnostic::error(code)
                    .with_message(format!(
                        "{what} `{}` requires numeric operands, found {left_ty} and {right_ty}",
                        op.as_symbol()
                    ))
                    .with_label(span, "text operand"),
            );
            return Type::Error;
        }
        if left_ty.is_error() || right_ty.is_error() {
            return Type::Error;
        }

        if op.is_arithmetic() {
            left_ty.promote(right_ty)
        } else {
            Type::Int
        }
    }

    /// Arguments fold with `promote` from the first argument's type, so a
    /// lone Text argument keeps the call Text. AVERAGE is Float regardless.
    fn analyze_call(&mut self, func: &str, args: &[ExprId], span: Span) -> Type {
        let mut folded: Option<Type> = None;
        let mut arg_error = false;
        for &arg in args {
            let arg_ty = match self.arena.get_expr(arg).kind {
                // Ranges are valid here and always numeric.
                ExprKind::Range { .. } => Type::Float,
                _ => self.analyze_expr(arg),
            };
            arg_error |= arg_ty.is_error();
            folded = Some(folded.map_or(arg_ty, |acc| acc.promote(arg_ty)));
        }

        let Some(folded) = folded else {
            self.report(
                Diagnostic::error(ErrorCode::E2005)
                    .with_message(format!("call to `{func}` has no arguments"))
                    .with_label(span, "expected at least one argument"),
            );
            return Type::Error;
        };
        if arg_error {
            return Type::Error;
        }

        let Some(aggregate) = Aggregate::from_name(func) else {
            self.report(
                Diagnostic::error(ErrorCode::E2006)
                    .with_message(format!("unknown function `{func}`"))
                    .with_label(span, "not a builtin")
                    .with_note("available functions are SUM, AVERAGE, MIN and MAX"),
            );
            return Type::Error;
        };

        if aggregate.always_float() {
            Type::Float
        } else if folded.is_error() {
            // No argument was Error, so text met a number in the fold.
            self.report(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!("`{func}` mixes text and numeric arguments"))
                    .with_label(span, "text argument"),
            );
            Type::Error
        } else {
            folded
        }
    }

    /// Check a statement list, returning how many statements failed.
    pub fn analyze_stmts(&mut self, stmts: &[Stmt]) -> usize {
        let mut errors = 0;
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Assign { cell, value } => {
                    let ty = self.analyze_expr(*value);
                    trace!(cell = self.interner.lookup(*cell), %ty, "assign");
                    if ty.is_error() {
                        errors += 1;
                    }
                }
                StmtKind::If { cond, body } => {
                    errors += usize::from(!self.check_condition("IF", *cond, stmt.span));
                    errors += self.analyze_stmts(body);
                }
                StmtKind::While { cond, body } => {
                    errors += usize::from(!self.check_condition("WHILE", *cond, stmt.span));
                    errors += self.analyze_stmts(body);
                }
                StmtKind::Table | StmtKind::Export { .. } => {}
            }
        }
        errors
    }

    /// Returns false when the condition is not numeric.
    fn check_condition(&mut self, keyword: &str, cond: ExprId, span: Span) -> bool {
        let ty = self.analyze_expr(cond);
        if ty.is_numeric() {
            return true;
        }
        if ty == Type::Text {
            self.report(
                Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("{keyword} condition must be numeric"))
                    .with_label(span, "text condition"),
            );
        }
        false
    }

    fn report(&mut self, diag: Diagnostic) {
        trace!(code = %diag.code, "{}", diag.message);
        self.diagnostics.emit_error(diag);
    }
}
