//! Runtime shared by both execution backends.
//!
//! Everything observable about a run lives here so the interpreter and the
//! compiled routine cannot drift apart:
//! - `Value` and its numeric view and truthiness
//! - `CellStore`, the insertion-ordered cell map
//! - Range expansion and the call operand plan
//! - Aggregate math
//! - Value formatting, table lines and CSV export
//! - The per-run context and runtime diagnostics

mod aggregate;
mod context;
pub mod errors;
mod export;
mod format;
mod print_handler;
mod range;
mod store;
mod table;
mod value;

pub use aggregate::aggregate;
pub use context::RunContext;
pub use export::{csv_escape, csv_line, write_csv, ExportError};
pub use format::format_general;
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use range::{expand_call_args, expand_range, plan_call_args, CallOperand};
pub use store::CellStore;
pub use table::{print_table, table_line};
pub use value::Value;
