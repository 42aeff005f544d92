//! Aggregate math.
//!
//! The interpreter calls this directly; compiled routines reach it through
//! exported helper symbols, so both backends produce bit-identical results.

use cell_ir::Aggregate;

/// Apply an aggregate to operands in plan order.
///
/// Returns `None` for an empty operand list.
pub fn aggregate(func: Aggregate, values: &[f64]) -> Option<f64> {
    let (&first, rest) = values.split_first()?;
    let result = match func {
        Aggregate::Sum => sum(values),
        Aggregate::Average => sum(values) / values.len() as f64,
        // Strict comparisons: ties keep the earliest operand.
        Aggregate::Min => rest
            .iter()
            .fold(first, |best, &v| if v < best { v } else { best }),
        Aggregate::Max => rest
            .iter()
            .fold(first, |best, &v| if v > best { v } else { best }),
    };
    Some(result)
}

fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, &v| acc + v)
}
