//! Expression lowering.

use cell_diagnostic::Diagnostic;
use cell_ir::{Aggregate, BinaryOp, ExprId, ExprKind, ExprRange, Name, Span, UnaryOp};
use cell_rt::{errors, plan_call_args, CallOperand};
use cranelift_codegen::ir::{
    self,
    condcodes::{FloatCC, IntCC},
    types, InstBuilder, MemFlags,
};
use tracing::trace;

use super::FunctionTranslator;
use crate::runtime::CallSite;
use crate::slots::{CellSlot, KIND_FLOAT, KIND_INT, KIND_TEXT};
use crate::CodegenError;

/// A lowered value, laid out like a `CellSlot` without its order.
///
/// `num` is the numeric view: 0.0 for text. `payload` is the exact Int,
/// the raw text name, or 0 for floats.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Lowered {
    pub kind: ir::Value,
    pub num: ir::Value,
    pub payload: ir::Value,
}

const OPERAND_BYTES: usize = 8;

impl FunctionTranslator<'_, '_> {
    pub(super) fn lower_expr(&mut self, id: ExprId) -> Result<Lowered, CodegenError> {
        let expr = *self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Int(n) => Ok(self.constant(KIND_INT, n as f64, n)),
            ExprKind::Float(f) => Ok(self.constant(KIND_FLOAT, f, 0)),
            ExprKind::Text(text) => Ok(self.constant(KIND_TEXT, 0.0, i64::from(text.raw()))),
            ExprKind::CellRef(cell) => self.load_cell(cell),
            ExprKind::Unary { op, operand } => {
                let operand = self.lower_expr(operand)?;
                Ok(self.lower_unary(op, operand))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.lower_expr(left)?;
                let right = self.lower_expr(right)?;
                Ok(self.lower_binary(op, left, right))
            }
            ExprKind::Call { func, args } => self.lower_call(func, args, expr.span),
            ExprKind::Range { .. } => Ok(self.default_value()),
        }
    }

    /// Truthiness of a numeric view as an `i8` flag.
    pub(super) fn truthy(&mut self, num: ir::Value) -> ir::Value {
        let zero = self.builder.ins().f64const(0.0);
        self.builder.ins().fcmp(FloatCC::NotEqual, num, zero)
    }

    fn constant(&mut self, kind: i64, num: f64, payload: i64) -> Lowered {
        Lowered {
            kind: self.builder.ins().iconst(types::I64, kind),
            num: self.builder.ins().f64const(num),
            payload: self.builder.ins().iconst(types::I64, payload),
        }
    }

    fn default_value(&mut self) -> Lowered {
        self.constant(KIND_INT, 0.0, 0)
    }

    fn load_cell(&mut self, cell: Name) -> Result<Lowered, CodegenError> {
        let slot = self.tables.slots.slot_for(cell);
        Ok(Lowered {
            kind: self.load_field(types::I64, slot, CellSlot::KIND_OFFSET)?,
            num: self.load_field(types::F64, slot, CellSlot::NUM_OFFSET)?,
            payload: self.load_field(types::I64, slot, CellSlot::PAYLOAD_OFFSET)?,
        })
    }

    /// Int 0/1 from an `i8` flag.
    fn flag(&mut self, flag: ir::Value) -> Lowered {
        let one = self.builder.ins().f64const(1.0);
        let zero = self.builder.ins().f64const(0.0);
        Lowered {
            kind: self.builder.ins().iconst(types::I64, KIND_INT),
            num: self.builder.ins().select(flag, one, zero),
            payload: self.builder.ins().uextend(types::I64, flag),
        }
    }

    fn float(&mut self, num: ir::Value) -> Lowered {
        Lowered {
            kind: self.builder.ins().iconst(types::I64, KIND_FLOAT),
            num,
            payload: self.builder.ins().iconst(types::I64, 0),
        }
    }

    fn lower_unary(&mut self, op: UnaryOp, operand: Lowered) -> Lowered {
        match op {
            // Keeps the operand's kind; text becomes Int 0. Ints negate
            // their exact payload with wraparound.
            UnaryOp::Neg => {
                let is_text = self
                    .builder
                    .ins()
                    .icmp_imm(IntCC::Equal, operand.kind, KIND_TEXT);
                let is_int = self
                    .builder
                    .ins()
                    .icmp_imm(IntCC::Equal, operand.kind, KIND_INT);
                let is_float = self
                    .builder
                    .ins()
                    .icmp_imm(IntCC::Equal, operand.kind, KIND_FLOAT);
                let int_kind = self.builder.ins().iconst(types::I64, KIND_INT);
                let zero = self.builder.ins().iconst(types::I64, 0);
                let negated = self.builder.ins().ineg(operand.payload);
                let payload = self.builder.ins().select(is_int, negated, zero);
                let int_num = self.builder.ins().fcvt_from_sint(types::F64, payload);
                let float_num = self.builder.ins().fneg(operand.num);
                Lowered {
                    kind: self.builder.ins().select(is_text, int_kind, operand.kind),
                    num: self.builder.ins().select(is_float, float_num, int_num),
                    payload,
                }
            }
            UnaryOp::Not => {
                let zero = self.builder.ins().f64const(0.0);
                let falsy = self.builder.ins().fcmp(FloatCC::Equal, operand.num, zero);
                self.flag(falsy)
            }
        }
    }

    fn lower_binary(&mut self, op: BinaryOp, left: Lowered, right: Lowered) -> Lowered {
        let (l, r) = (left.num, right.num);
        match op {
            BinaryOp::Add => {
                let num = self.builder.ins().fadd(l, r);
                self.float(num)
            }
            BinaryOp::Sub => {
                let num = self.builder.ins().fsub(l, r);
                self.float(num)
            }
            BinaryOp::Mul => {
                let num = self.builder.ins().fmul(l, r);
                self.float(num)
            }
            BinaryOp::Div => {
                let num = self.builder.ins().fdiv(l, r);
                self.float(num)
            }
            BinaryOp::Gt
            | BinaryOp::Lt
            | BinaryOp::GtEq
            | BinaryOp::LtEq
            | BinaryOp::Eq
            | BinaryOp::NotEq => {
                let flag = self.builder.ins().fcmp(float_cc(op), l, r);
                self.flag(flag)
            }
            // Both sides are already evaluated: no short-circuit.
            BinaryOp::And => {
                let (a, b) = (self.truthy(l), self.truthy(r));
                let flag = self.builder.ins().band(a, b);
                self.flag(flag)
            }
            BinaryOp::Or => {
                let (a, b) = (self.truthy(l), self.truthy(r));
                let flag = self.builder.ins().bor(a, b);
                self.flag(flag)
            }
        }
    }

    fn lower_call(
        &mut self,
        func: Name,
        args: ExprRange,
        span: Span,
    ) -> Result<Lowered, CodegenError> {
        let func_name = self.interner.lookup(func);
        let Some(aggregate) = Aggregate::from_name(func_name) else {
            // Arguments are not evaluated.
            self.report(errors::unknown_function(func_name, span))?;
            return Ok(self.default_value());
        };

        let arena = self.arena;
        let operands = plan_call_args(arena, arena.get_expr_list(args), self.interner);
        trace!(func = func_name, operands = operands.len(), "lowering call");
        if operands.is_empty() {
            self.report(errors::empty_aggregate(func_name, span))?;
            return Ok(self.default_value());
        }

        // Range cells are gathered by the runtime; only expression operands
        // are evaluated here, in plan order.
        let mut cells = Vec::new();
        let mut computed = Vec::new();
        for (position, &operand) in operands.iter().enumerate() {
            match operand {
                CallOperand::Cell(cell) => cells.push((position, self.tables.slots.slot_for(cell))),
                CallOperand::Unset => {}
                CallOperand::Expr(expr) => computed.push((position, self.lower_expr(expr)?.num)),
            }
        }

        let site = self.tables.call_sites.len();
        self.tables.call_sites.push(CallSite {
            len: operands.len(),
            cells,
        });
        let site = self.index_const(site)?;
        let gather = self.builder.ins().call(
            self.helpers.operands,
            &[self.rt_ptr, self.slots_ptr, site],
        );
        let values = self.builder.inst_results(gather)[0];
        for (position, num) in computed {
            let offset = position
                .checked_mul(OPERAND_BYTES)
                .and_then(|bytes| i32::try_from(bytes).ok())
                .ok_or(CodegenError::TooLarge("aggregate operands"))?;
            self.builder
                .ins()
                .store(MemFlags::trusted(), num, values, offset);
        }

        let len = self.index_const(operands.len())?;
        let call = self
            .builder
            .ins()
            .call(self.helpers.aggregate(aggregate), &[values, len]);
        let result = self.builder.inst_results(call)[0];
        Ok(self.float(result))
    }

    /// Emit a call that reports `diag` each time it executes.
    fn report(&mut self, diag: Diagnostic) -> Result<(), CodegenError> {
        let index = self.tables.reports.len();
        self.tables.reports.push(diag);
        let index = self.index_const(index)?;
        let args = [self.rt_ptr, index];
        self.builder.ins().call(self.helpers.report, &args);
        Ok(())
    }
}

pub(super) fn float_cc(op: BinaryOp) -> FloatCC {
    match op {
        BinaryOp::Gt => FloatCC::GreaterThan,
        BinaryOp::Lt => FloatCC::LessThan,
        BinaryOp::GtEq => FloatCC::GreaterThanOrEqual,
        BinaryOp::LtEq => FloatCC::LessThanOrEqual,
        BinaryOp::Eq => FloatCC::Equal,
        // `!=` is true for unordered operands, like Rust's.
        _ => FloatCC::NotEqual,
    }
}
