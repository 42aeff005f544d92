//! Runtime helpers called by generated code.
//!
//! Generated code does arithmetic, comparisons and control flow inline.
//! Everything that touches the interner, the printer, the filesystem or the
//! diagnostic queue goes through these helpers, which delegate to `cell_rt`
//! so both backends share one implementation.
//!
//! # Safety
//!
//! The helpers are `extern "C"` entry points for generated code. Their
//! pointer arguments come from the session that owns the slot array and the
//! `JitRuntime`, and stay valid for the whole call.

#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points dereference pointers handed over by generated code"
)]

use std::mem::offset_of;

use cell_diagnostic::{Diagnostic, DiagnosticQueue};
use cell_ir::{Aggregate, Name, Span, StringInterner};
use cell_rt::{errors, print_table, write_csv, PrintHandlerImpl};
use cranelift_jit::JITBuilder;
use tracing::debug;

use crate::slots::{live_cells, CellSlot};

/// An EXPORT statement's destination, resolved at translation time.
#[derive(Copy, Clone, Debug)]
pub struct ExportTarget {
    pub path: Name,
    pub span: Span,
}

/// Operand layout of one aggregate call, resolved at translation time.
///
/// The call's buffer holds `len` operands. Range cells with a slot are
/// gathered by `cell_rt_operands` from `cells` (`(position, slot)` pairs);
/// generated code stores expression operands; the rest stay 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallSite {
    pub len: usize,
    pub cells: Vec<(usize, usize)>,
}

/// State shared between generated code and the helpers for one run.
///
/// Generated code only touches `clock`; everything else is read by the
/// helpers.
#[repr(C)]
pub struct JitRuntime<'a> {
    /// Last first-assignment stamp handed out.
    pub clock: i64,
    names: &'a [Name],
    reports: &'a [Diagnostic],
    exports: &'a [ExportTarget],
    sites: &'a [CallSite],
    /// One heap buffer per call site; never resized after construction.
    operands: Vec<Vec<f64>>,
    interner: &'a StringInterner,
    printer: &'a PrintHandlerImpl,
    diagnostics: &'a mut DiagnosticQueue,
}

impl<'a> JitRuntime<'a> {
    pub const CLOCK_OFFSET: usize = offset_of!(JitRuntime<'static>, clock);

    pub fn new(
        names: &'a [Name],
        reports: &'a [Diagnostic],
        exports: &'a [ExportTarget],
        sites: &'a [CallSite],
        interner: &'a StringInterner,
        printer: &'a PrintHandlerImpl,
        diagnostics: &'a mut DiagnosticQueue,
    ) -> Self {
        let operands = sites.iter().map(|site| vec![0.0; site.len]).collect();
        JitRuntime {
            clock: 0,
            names,
            reports,
            exports,
            sites,
            operands,
            interner,
            printer,
            diagnostics,
        }
    }

    fn slots<'s>(&self, slots: *const CellSlot) -> &'s [CellSlot] {
        if slots.is_null() || self.names.is_empty() {
            return &[];
        }
        // SAFETY: the session allocates exactly one slot per name.
        unsafe { std::slice::from_raw_parts(slots, self.names.len()) }
    }
}

fn values<'v>(values: *const f64, len: usize) -> &'v [f64] {
    if values.is_null() || len == 0 {
        return &[];
    }
    // SAFETY: generated code passes a call site buffer of exactly `len` operands.
    unsafe { std::slice::from_raw_parts(values, len) }
}

fn fold(func: Aggregate, values_ptr: *const f64, len: usize) -> f64 {
    // Empty calls are reported by generated code and never reach here.
    cell_rt::aggregate(func, values(values_ptr, len)).unwrap_or(0.0)
}

#[no_mangle]
pub extern "C" fn cell_rt_sum(values: *const f64, len: usize) -> f64 {
    fold(Aggregate::Sum, values, len)
}

#[no_mangle]
pub extern "C" fn cell_rt_average(values: *const f64, len: usize) -> f64 {
    fold(Aggregate::Average, values, len)
}

#[no_mangle]
pub extern "C" fn cell_rt_min(values: *const f64, len: usize) -> f64 {
    fold(Aggregate::Min, values, len)
}

#[no_mangle]
pub extern "C" fn cell_rt_max(values: *const f64, len: usize) -> f64 {
    fold(Aggregate::Max, values, len)
}

/// Gather a call site's range cells into its buffer and return the buffer.
///
/// Generated code then stores the expression operands and hands the buffer
/// to an aggregate helper.
#[no_mangle]
pub extern "C" fn cell_rt_operands(
    rt: *mut JitRuntime<'_>,
    slots: *const CellSlot,
    site: usize,
) -> *mut f64 {
    // SAFETY: `rt` is the session's runtime for the current call.
    let Some(rt) = (unsafe { rt.as_mut() }) else {
        return std::ptr::null_mut();
    };
    let slots = rt.slots(slots);
    let (Some(layout), Some(buffer)) = (rt.sites.get(site), rt.operands.get_mut(site)) else {
        return std::ptr::null_mut();
    };
    for &(position, slot) in &layout.cells {
        if let (Some(operand), Some(cell)) = (buffer.get_mut(position), slots.get(slot)) {
            *operand = cell.num;
        }
    }
    buffer.as_mut_ptr()
}

/// Emit the runtime diagnostic prepared at translation time.
#[no_mangle]
pub extern "C" fn cell_rt_report(rt: *mut JitRuntime<'_>, index: usize) {
    // SAFETY: `rt` is the session's runtime for the current call.
    let Some(rt) = (unsafe { rt.as_mut() }) else {
        return;
    };
    if let Some(diag) = rt.reports.get(index) {
        rt.diagnostics.emit(diag.clone());
    }
}

/// TABLE: print assigned cells in first-assignment order.
#[no_mangle]
pub extern "C" fn cell_rt_table(rt: *mut JitRuntime<'_>, slots: *const CellSlot) {
    // SAFETY: as above.
    let Some(rt) = (unsafe { rt.as_mut() }) else {
        return;
    };
    let cells = live_cells(rt.slots(slots), rt.names);
    print_table(cells, rt.interner, rt.printer);
}

/// EXPORT: write assigned cells to the statement's CSV file.
#[no_mangle]
pub extern "C" fn cell_rt_export(rt: *mut JitRuntime<'_>, slots: *const CellSlot, index: usize) {
    // SAFETY: as above.
    let Some(rt) = (unsafe { rt.as_mut() }) else {
        return;
    };
    let Some(&target) = rt.exports.get(index) else {
        return;
    };
    let path = rt.interner.lookup(target.path);
    let cells = live_cells(rt.slots(slots), rt.names);
    if let Err(err) = write_csv(path, cells, rt.interner) {
        debug!(%err, "export failed");
        rt.diagnostics.emit(errors::export_failed(&err, target.span));
    }
}

/// Helpers by symbol name.
pub(crate) const AGGREGATE_HELPERS: [(Aggregate, &str); 4] = [
    (Aggregate::Sum, "cell_rt_sum"),
    (Aggregate::Average, "cell_rt_average"),
    (Aggregate::Min, "cell_rt_min"),
    (Aggregate::Max, "cell_rt_max"),
];
pub(crate) const OPERANDS_HELPER: &str = "cell_rt_operands";
pub(crate) const REPORT_HELPER: &str = "cell_rt_report";
pub(crate) const TABLE_HELPER: &str = "cell_rt_table";
pub(crate) const EXPORT_HELPER: &str = "cell_rt_export";

/// Make every helper resolvable from generated code.
pub(crate) fn register_symbols(builder: &mut JITBuilder) {
    builder
        .symbol("cell_rt_sum", cell_rt_sum as *const u8)
        .symbol("cell_rt_average", cell_rt_average as *const u8)
        .symbol("cell_rt_min", cell_rt_min as *const u8)
        .symbol("cell_rt_max", cell_rt_max as *const u8)
        .symbol(OPERANDS_HELPER, cell_rt_operands as *const u8)
        .symbol(REPORT_HELPER, cell_rt_report as *const u8)
        .symbol(TABLE_HELPER, cell_rt_table as *const u8)
        .symbol(EXPORT_HELPER, cell_rt_export as *const u8);
}
