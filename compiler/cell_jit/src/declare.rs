//! Declarations shared by every compiled program.
//!
//! Two phases: helpers are declared once per module when the session is
//! initialized, then imported into each function being translated.

use cell_ir::Aggregate;
use cranelift_codegen::ir::{self, types, AbiParam, FuncRef};
use cranelift_jit::JITModule;
use cranelift_module::{FuncId, Linkage, Module};

use crate::runtime::{
    AGGREGATE_HELPERS, EXPORT_HELPER, OPERANDS_HELPER, REPORT_HELPER, TABLE_HELPER,
};
use crate::CodegenError;

/// Module-level ids of the runtime helpers.
#[derive(Copy, Clone, Debug)]
pub(crate) struct HelperIds {
    aggregates: [FuncId; 4],
    operands: FuncId,
    report: FuncId,
    table: FuncId,
    export: FuncId,
}

/// Helper references usable inside one function.
#[derive(Copy, Clone, Debug)]
pub(crate) struct HelperRefs {
    aggregates: [FuncRef; 4],
    pub operands: FuncRef,
    pub report: FuncRef,
    pub table: FuncRef,
    pub export: FuncRef,
}

impl HelperRefs {
    pub fn aggregate(&self, func: Aggregate) -> FuncRef {
        self.aggregates[aggregate_index(func)]
    }
}

fn aggregate_index(func: Aggregate) -> usize {
    match func {
        Aggregate::Sum => 0,
        Aggregate::Average => 1,
        Aggregate::Min => 2,
        Aggregate::Max => 3,
    }
}

impl HelperIds {
    /// Declare every helper as an import of `module`.
    pub fn declare(module: &mut JITModule) -> Result<Self, CodegenError> {
        let ptr = module.target_config().pointer_type();

        // (values: *const f64, len: usize) -> f64
        let mut fold_sig = module.make_signature();
        fold_sig.params.push(AbiParam::new(ptr));
        fold_sig.params.push(AbiParam::new(ptr));
        fold_sig.returns.push(AbiParam::new(types::F64));

        let mut aggregates = Vec::with_capacity(AGGREGATE_HELPERS.len());
        for (func, symbol) in AGGREGATE_HELPERS {
            debug_assert_eq!(aggregate_index(func), aggregates.len());
            aggregates.push(module.declare_function(symbol, Linkage::Import, &fold_sig)?);
        }
        let aggregates: [FuncId; 4] = aggregates
            .try_into()
            .map_err(|_| CodegenError::TooLarge("helper table"))?;

        // (rt, slots, site) -> *mut f64
        let mut operands_sig = module.make_signature();
        operands_sig.params.push(AbiParam::new(ptr));
        operands_sig.params.push(AbiParam::new(ptr));
        operands_sig.params.push(AbiParam::new(ptr));
        operands_sig.returns.push(AbiParam::new(ptr));
        let operands = module.declare_function(OPERANDS_HELPER, Linkage::Import, &operands_sig)?;

        // (rt, index)
        let mut report_sig = module.make_signature();
        report_sig.params.push(AbiParam::new(ptr));
        report_sig.params.push(AbiParam::new(ptr));
        let report = module.declare_function(REPORT_HELPER, Linkage::Import, &report_sig)?;

        // (rt, slots)
        let mut table_sig = module.make_signature();
        table_sig.params.push(AbiParam::new(ptr));
        table_sig.params.push(AbiParam::new(ptr));
        let table = module.declare_function(TABLE_HELPER, Linkage::Import, &table_sig)?;

        // (rt, slots, index)
        let mut export_sig = table_sig.clone();
        export_sig.params.push(AbiParam::new(ptr));
        let export = module.declare_function(EXPORT_HELPER, Linkage::Import, &export_sig)?;

        Ok(HelperIds {
            aggregates,
            operands,
            report,
            table,
            export,
        })
    }

    /// Import every helper into `func`.
    pub fn import_into(&self, module: &mut JITModule, func: &mut ir::Function) -> HelperRefs {
        HelperRefs {
            aggregates: self
                .aggregates
                .map(|id| module.declare_func_in_func(id, func)),
            operands: module.declare_func_in_func(self.operands, func),
            report: module.declare_func_in_func(self.report, func),
            table: module.declare_func_in_func(self.table, func),
            export: module.declare_func_in_func(self.export, func),
        }
    }
}

/// Signature of the program entry: `(slots: *mut CellSlot, rt: *mut JitRuntime)`.
pub(crate) fn entry_signature(module: &JITModule) -> ir::Signature {
    let ptr = module.target_config().pointer_type();
    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(ptr));
    sig.params.push(AbiParam::new(ptr));
    sig
}
