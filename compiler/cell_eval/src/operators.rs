//! Operator semantics for the interpreter.
//!
//! Enum dispatch over a closed operator set. Arithmetic always produces a
//! Float; comparisons and logic produce Int 0/1.

use cell_ir::{BinaryOp, UnaryOp};
use cell_rt::Value;

/// Evaluate a binary operation. Both operands are already evaluated, so
/// AND/OR never short-circuit.
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> Value {
    let (l, r) = (left.as_f64(), right.as_f64());
    match op {
        BinaryOp::Add => Value::Float(l + r),
        BinaryOp::Sub => Value::Float(l - r),
        BinaryOp::Mul => Value::Float(l * r),
        BinaryOp::Div => Value::Float(l / r),
        BinaryOp::Gt => Value::from_bool(l > r),
        BinaryOp::Lt => Value::from_bool(l < r),
        BinaryOp::GtEq => Value::from_bool(l >= r),
        BinaryOp::LtEq => Value::from_bool(l <= r),
        BinaryOp::Eq => Value::from_bool(l == r),
        BinaryOp::NotEq => Value::from_bool(l != r),
        BinaryOp::And => Value::from_bool(left.is_truthy() && right.is_truthy()),
        BinaryOp::Or => Value::from_bool(left.is_truthy() || right.is_truthy()),
    }
}

/// Evaluate a unary operation.
///
/// Negation keeps the operand's kind; text (rejected by the checker) reads
/// as Int 0.
pub fn evaluate_unary(op: UnaryOp, value: Value) -> Value {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => Value::Int(n.wrapping_neg()),
        (UnaryOp::Neg, Value::Float(f)) => Value::Float(-f),
        (UnaryOp::Neg, Value::Text(_)) => Value::Int(0),
        (UnaryOp::Not, v) => Value::from_bool(!v.is_truthy()),
    }
}
