//! Native backend for the cell language.
//!
//! Compiles a whole program into one Cranelift function over a flat array
//! of cell slots and runs it in-process. Arithmetic, comparisons and
//! control flow are inlined; aggregates, TABLE, EXPORT and runtime
//! diagnostics call back into `cell_rt` through the helpers in `runtime`,
//! so results match the interpreter.
//!
//! # Debugging
//!
//! - `RUST_LOG=cell_jit=debug`: phase transitions and sizes
//! - `RUST_LOG=cell_jit=trace`: per-call lowering
//! - [`JitSession::ir_text`]: the generated function with its slot map

#![allow(
    // Slot fields use i64/f64; interned names and offsets are narrower
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "slot encodings are fixed-width by layout"
)]

mod declare;
mod error;
pub mod runtime;
mod session;
pub mod slots;
mod translate;

pub use error::CodegenError;
pub use runtime::JitRuntime;
pub use session::{JitSession, SessionPhase};
pub use slots::CellSlot;
