//! Code generation failures.

use cell_diagnostic::{Diagnostic, ErrorCode};
use cranelift_codegen::settings::SetError;
use cranelift_module::ModuleError;
use thiserror::Error;

/// Failure to produce or load native code.
///
/// These are internal failures: a checked program never causes them.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("host machine is not supported: {0}")]
    UnsupportedHost(&'static str),

    #[error("invalid code generator setting: {0}")]
    Setting(#[from] SetError),

    #[error("cannot configure the target: {0}")]
    Target(#[from] cranelift_codegen::CodegenError),

    #[error("generated code failed verification:\n{0}")]
    Verification(String),

    #[error("cannot emit native code: {0}")]
    Module(#[from] ModuleError),

    #[error("program exceeds addressable {0}")]
    TooLarge(&'static str),
}

impl CodegenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CodegenError::Verification(_) => ErrorCode::E9001,
            _ => ErrorCode::E9002,
        }
    }

    /// Diagnostic reported for this failure.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_note("this is a bug in the compiled backend; the interpreter is unaffected")
    }
}
