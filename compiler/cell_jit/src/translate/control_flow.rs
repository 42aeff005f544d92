//! Control flow lowering: IF and WHILE.

use cell_ir::{ExprId, Stmt};
use cranelift_codegen::ir::{self, InstBuilder};
use tracing::instrument;

use super::FunctionTranslator;
use crate::CodegenError;

impl FunctionTranslator<'_, '_> {
    /// `IF cond { body }`, no else branch.
    #[instrument(skip(self, body), level = "trace")]
    pub(super) fn lower_if(&mut self, cond: ExprId, body: &[Stmt]) -> Result<(), CodegenError> {
        let flag = self.lower_condition(cond)?;
        let then_block = self.builder.create_block();
        let merge_block = self.builder.create_block();
        self.builder
            .ins()
            .brif(flag, then_block, &[], merge_block, &[]);

        self.builder.switch_to_block(then_block);
        self.lower_stmts(body)?;
        self.builder.ins().jump(merge_block, &[]);

        self.builder.switch_to_block(merge_block);
        Ok(())
    }

    /// `WHILE cond { body }`, condition re-evaluated before every iteration.
    #[instrument(skip(self, body), level = "trace")]
    pub(super) fn lower_while(&mut self, cond: ExprId, body: &[Stmt]) -> Result<(), CodegenError> {
        let header = self.builder.create_block();
        let body_block = self.builder.create_block();
        let exit = self.builder.create_block();
        self.builder.ins().jump(header, &[]);

        self.builder.switch_to_block(header);
        let flag = self.lower_condition(cond)?;
        self.builder.ins().brif(flag, body_block, &[], exit, &[]);

        self.builder.switch_to_block(body_block);
        self.lower_stmts(body)?;
        self.builder.ins().jump(header, &[]);

        self.builder.switch_to_block(exit);
        Ok(())
    }

    fn lower_condition(&mut self, cond: ExprId) -> Result<ir::Value, CodegenError> {
        let value = self.lower_expr(cond)?;
        Ok(self.truthy(value.num))
    }
}
