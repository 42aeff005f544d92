//! Runtime diagnostics.
//!
//! Both backends report runtime problems through these constructors so the
//! messages match exactly.

use cell_diagnostic::{Diagnostic, ErrorCode};
use cell_ir::Span;

use crate::ExportError;

/// An aggregate call had no operands after range expansion.
#[cold]
pub fn empty_aggregate(func: &str, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6001)
        .with_message(format!("`{func}` has no values to aggregate"))
        .with_label(span, "every range argument is empty")
        .with_note("the call evaluates to 0")
}

/// A call to an unknown function reached execution.
#[cold]
pub fn unknown_function(func: &str, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6002)
        .with_message(format!("unknown function `{func}`"))
        .with_label(span, "called here")
        .with_note("the call evaluates to 0")
}

/// An EXPORT statement could not write its file.
#[cold]
pub fn export_failed(err: &ExportError, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6003)
        .with_message(err.to_string())
        .with_label(span, "export skipped")
}
