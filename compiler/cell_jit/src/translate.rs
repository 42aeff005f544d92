//! Lowering from the cell AST to Cranelift IR.
//!
//! The whole program becomes one function over the slot array. Every
//! expression lowers to a `(kind, num, payload)` triple mirroring
//! `CellSlot`, so assignment is three stores and reads are three loads.

mod control_flow;
mod expr;

use cell_diagnostic::Diagnostic;
use cell_ir::{ExprArena, Name, Program, Stmt, StmtKind, StringInterner};
use cranelift_codegen::ir::{self, condcodes::IntCC, types, InstBuilder, MemFlags};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::JITModule;
use cranelift_module::Module;
use tracing::{instrument, trace};

use crate::declare::{HelperIds, HelperRefs};
use crate::runtime::{CallSite, ExportTarget, JitRuntime};
use crate::slots::{CellSlot, SlotTable};
use crate::CodegenError;

pub(crate) use expr::Lowered;

/// Side tables produced while translating, read by the helpers at run time.
#[derive(Default, Debug)]
pub(crate) struct Translation {
    pub slots: SlotTable,
    /// Runtime diagnostics, emitted by index through `cell_rt_report`.
    pub reports: Vec<Diagnostic>,
    /// EXPORT destinations, by index.
    pub exports: Vec<ExportTarget>,
    /// Aggregate operand layouts, by call site.
    pub call_sites: Vec<CallSite>,
}

/// Translate `program` into `func`.
#[instrument(skip_all, level = "debug")]
pub(crate) fn translate_program(
    func: &mut ir::Function,
    fctx: &mut FunctionBuilderContext,
    module: &mut JITModule,
    helpers: &HelperIds,
    program: &Program,
    interner: &StringInterner,
) -> Result<Translation, CodegenError> {
    let ptr_ty = module.target_config().pointer_type();
    let mut builder = FunctionBuilder::new(func, fctx);
    let helpers = helpers.import_into(module, builder.func);

    let entry = builder.create_block();
    builder.append_block_params_for_function_params(entry);
    builder.switch_to_block(entry);
    let (slots_ptr, rt_ptr) = {
        let params = builder.block_params(entry);
        (params[0], params[1])
    };

    let mut tables = Translation::default();
    let mut translator = FunctionTranslator {
        builder,
        arena: &program.arena,
        interner,
        helpers,
        tables: &mut tables,
        slots_ptr,
        rt_ptr,
        ptr_ty,
    };
    translator.lower_stmts(&program.body)?;
    translator.builder.ins().return_(&[]);
    translator.builder.seal_all_blocks();
    translator.builder.finalize();

    trace!(
        slots = tables.slots.len(),
        reports = tables.reports.len(),
        exports = tables.exports.len(),
        call_sites = tables.call_sites.len(),
        "translated program"
    );
    Ok(tables)
}

/// Per-function lowering state.
pub(crate) struct FunctionTranslator<'a, 'b> {
    builder: FunctionBuilder<'b>,
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    helpers: HelperRefs,
    tables: &'a mut Translation,
    slots_ptr: ir::Value,
    rt_ptr: ir::Value,
    ptr_ty: ir::Type,
}

impl FunctionTranslator<'_, '_> {
    fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match &stmt.kind {
            StmtKind::Assign { cell, value } => {
                let value = self.lower_expr(*value)?;
                self.assign(*cell, value)
            }
            StmtKind::If { cond, body } => self.lower_if(*cond, body),
            StmtKind::While { cond, body } => self.lower_while(*cond, body),
            StmtKind::Table => {
                let args = [self.rt_ptr, self.slots_ptr];
                self.builder.ins().call(self.helpers.table, &args);
                Ok(())
            }
            StmtKind::Export { path } => {
                let index = self.tables.exports.len();
                self.tables.exports.push(ExportTarget {
                    path: *path,
                    span: stmt.span,
                });
                let index = self.index_const(index)?;
                let args = [self.rt_ptr, self.slots_ptr, index];
                self.builder.ins().call(self.helpers.export, &args);
                Ok(())
            }
        }
    }

    /// Store a value and stamp the slot's order on its first assignment.
    fn assign(&mut self, cell: Name, value: Lowered) -> Result<(), CodegenError> {
        let slot = self.tables.slots.slot_for(cell);
        self.store_field(value.kind, slot, CellSlot::KIND_OFFSET)?;
        self.store_field(value.num, slot, CellSlot::NUM_OFFSET)?;
        self.store_field(value.payload, slot, CellSlot::PAYLOAD_OFFSET)?;

        let clock_offset = to_offset(JitRuntime::CLOCK_OFFSET)?;
        let order = self.load_field(types::I64, slot, CellSlot::ORDER_OFFSET)?;
        let clock =
            self.builder
                .ins()
                .load(types::I64, MemFlags::trusted(), self.rt_ptr, clock_offset);
        let is_new = self.builder.ins().icmp_imm(IntCC::Equal, order, 0);
        let next = self.builder.ins().iadd_imm(clock, 1);
        let order = self.builder.ins().select(is_new, next, order);
        let clock = self.builder.ins().select(is_new, next, clock);
        self.builder
            .ins()
            .store(MemFlags::trusted(), clock, self.rt_ptr, clock_offset);
        self.store_field(order, slot, CellSlot::ORDER_OFFSET)
    }

    fn load_field(
        &mut self,
        ty: ir::Type,
        slot: usize,
        field: usize,
    ) -> Result<ir::Value, CodegenError> {
        let offset = slot_offset(slot, field)?;
        Ok(self
            .builder
            .ins()
            .load(ty, MemFlags::trusted(), self.slots_ptr, offset))
    }

    fn store_field(
        &mut self,
        value: ir::Value,
        slot: usize,
        field: usize,
    ) -> Result<(), CodegenError> {
        let offset = slot_offset(slot, field)?;
        self.builder
            .ins()
            .store(MemFlags::trusted(), value, self.slots_ptr, offset);
        Ok(())
    }

    fn index_const(&mut self, index: usize) -> Result<ir::Value, CodegenError> {
        let index = i64::try_from(index).map_err(|_| CodegenError::TooLarge("table index"))?;
        Ok(self.builder.ins().iconst(self.ptr_ty, index))
    }
}

fn to_offset(bytes: usize) -> Result<i32, CodegenError> {
    i32::try_from(bytes).map_err(|_| CodegenError::TooLarge("cell storage"))
}

fn slot_offset(slot: usize, field: usize) -> Result<i32, CodegenError> {
    slot.checked_mul(CellSlot::SIZE)
        .and_then(|base| base.checked_add(field))
        .ok_or(CodegenError::TooLarge("cell storage"))
        .and_then(to_offset)
}
