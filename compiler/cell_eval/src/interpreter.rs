//! The interpreter.

use cell_diagnostic::Diagnostic;
use cell_ir::{
    Aggregate, ExprArena, ExprId, ExprKind, ExprRange, Name, Program, Span, Stmt, StmtKind,
};
use cell_rt::{errors, print_table, write_csv, CallOperand, CellStore, RunContext, Value};
use tracing::{debug, trace};

use crate::{evaluate_binary, evaluate_unary};

/// Executes a program against its own `CellStore`.
pub struct Interpreter<'a, 'ctx> {
    arena: &'a ExprArena,
    ctx: &'a mut RunContext<'ctx>,
    store: CellStore,
}

impl<'a, 'ctx> Interpreter<'a, 'ctx> {
    /// Interpreter over `arena` with an empty store.
    pub fn new(arena: &'a ExprArena, ctx: &'a mut RunContext<'ctx>) -> Self {
        Interpreter {
            arena,
            ctx,
            store: CellStore::new(),
        }
    }

    /// Execute a whole program and return the final store.
    pub fn run(program: &Program, ctx: &mut RunContext<'_>) -> CellStore {
        let mut interpreter = Interpreter::new(&program.arena, ctx);
        debug!(statements = program.body.len(), "interpreting program");
        interpreter.execute(&program.body);
        debug!(cells = interpreter.store.len(), "interpreter finished");
        interpreter.into_store()
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn into_store(self) -> CellStore {
        self.store
    }

    /// Evaluate an expression against the current store.
    pub fn eval_expr(&mut self, id: ExprId) -> Value {
        let expr = self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Int(n) => Value::Int(n),
            ExprKind::Float(f) => Value::Float(f),
            ExprKind::Text(text) => Value::Text(text),
            ExprKind::CellRef(cell) => self.store.get(cell),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand);
                evaluate_unary(op, value)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left);
                let right = self.eval_expr(right);
                evaluate_binary(op, left, right)
            }
            ExprKind::Call { func, args } => self.eval_call(func, args, expr.span),
            // Rejected by the checker; evaluates to the default.
            ExprKind::Range { .. } => Value::DEFAULT,
        }
    }

    fn eval_call(&mut self, func: Name, args: ExprRange, span: Span) -> Value {
        let interner = self.ctx.interner;
        let func_name = interner.lookup(func);
        let Some(aggregate) = Aggregate::from_name(func_name) else {
            self.report(errors::unknown_function(func_name, span));
            return Value::DEFAULT;
        };

        let args = self.arena.get_expr_list(args);
        let values = cell_rt::expand_call_args(self.arena, args, interner, |operand| match operand {
            CallOperand::Cell(cell) => self.store.get(cell),
            CallOperand::Unset => Value::default(),
            CallOperand::Expr(expr) => self.eval_expr(expr),
        });

        match cell_rt::aggregate(aggregate, &values) {
            Some(result) => Value::Float(result),
            None => {
                self.report(errors::empty_aggregate(func_name, span));
                Value::DEFAULT
            }
        }
    }

    /// Execute statements in order.
    pub fn execute(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.execute_stmt(stmt);
        }
    }

    fn execute_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { cell, value } => {
                let value = self.eval_expr(*value);
                trace!(cell = self.ctx.interner.lookup(*cell), ?value, "assign");
                self.store.set(*cell, value);
            }
            StmtKind::If { cond, body } => {
                if self.eval_expr(*cond).is_truthy() {
                    self.execute(body);
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval_expr(*cond).is_truthy() {
                    self.execute(body);
                }
            }
            StmtKind::Table => {
                print_table(self.store.iter(), self.ctx.interner, &self.ctx.printer);
            }
            StmtKind::Export { path } => {
                let path = self.ctx.interner.lookup(*path);
                if let Err(err) = write_csv(path, self.store.iter(), self.ctx.interner) {
                    debug!(%err, "export failed");
                    self.report(errors::export_failed(&err, stmt.span));
                }
            }
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        self.ctx.diagnostics.emit(diag);
    }
}
