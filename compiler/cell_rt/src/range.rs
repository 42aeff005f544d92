//! Range expansion and call argument planning.

use cell_ir::{CellCoord, ExprArena, ExprId, ExprKind, Name, StringInterner};

use crate::Value;

/// Expand a rectangular range into cell ids.
///
/// Column-major: columns outer, rows inner, both inclusive. Reversed corners
/// produce no cells. Ids the interner has never seen come back as `None`:
/// no statement names them, so they can never hold a value.
pub fn expand_range(start: Name, end: Name, interner: &StringInterner) -> Vec<Option<Name>> {
    let from = CellCoord::parse(interner.lookup(start));
    let to = CellCoord::parse(interner.lookup(end));

    let mut cells = Vec::new();
    for column in from.column..=to.column {
        for row in from.row..=to.row {
            cells.push(interner.get(&CellCoord::new(column, row).to_id()));
        }
    }
    cells
}

/// One operand of an aggregate call after range expansion.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CallOperand {
    /// Read this cell's numeric view.
    Cell(Name),
    /// A range cell no statement names; always 0.
    Unset,
    /// Evaluate this expression once and take its numeric view.
    Expr(ExprId),
}

/// Flatten a call's arguments into operands, in argument order.
///
/// Range arguments contribute their expanded cells; every other argument
/// contributes itself. Both backends walk this plan, so the operand order
/// is identical.
pub fn plan_call_args(
    arena: &ExprArena,
    args: &[ExprId],
    interner: &StringInterner,
) -> Vec<CallOperand> {
    let mut operands = Vec::with_capacity(args.len());
    for &arg in args {
        match arena.get_expr(arg).kind {
            ExprKind::Range { start, end } => operands.extend(
                expand_range(start, end, interner)
                    .into_iter()
                    .map(|cell| cell.map_or(CallOperand::Unset, CallOperand::Cell)),
            ),
            _ => operands.push(CallOperand::Expr(arg)),
        }
    }
    operands
}

/// Numeric operands of a call, in plan order.
///
/// `operand_value` reads a cell or evaluates an argument; each operand is
/// asked for exactly once.
pub fn expand_call_args(
    arena: &ExprArena,
    args: &[ExprId],
    interner: &StringInterner,
    mut operand_value: impl FnMut(CallOperand) -> Value,
) -> Vec<f64> {
    plan_call_args(arena, args, interner)
        .into_iter()
        .map(|operand| operand_value(operand).as_f64())
        .collect()
}
