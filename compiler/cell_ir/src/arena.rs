//! Arena storage for expressions.

use super::ast::Expr;
use super::{ExprId, ExprRange};

/// Contiguous storage for every expression of one program.
///
/// - All expressions are stored in a flat Vec indexed by `ExprId`
/// - Call argument lists are flattened into `expr_lists` and referenced by
///   `ExprRange`
#[derive(Clone, Default, Debug, PartialEq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, return its ID.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX - 1` expressions.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("expression arena overflow"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate an argument list, return its range.
    ///
    /// # Panics
    /// Panics if the flattened list storage exceeds `u32::MAX` entries.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(exprs);
        let to_u32 = |n: usize| {
            u32::try_from(n).unwrap_or_else(|_| panic!("expression list storage overflow"))
        };
        ExprRange::new(to_u32(start), to_u32(self.expr_lists.len() - start))
    }

    /// Get an argument list by range.
    #[inline]
    #[track_caller]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }
}
