use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Semantic (type) errors, reported before execution
/// - E6xxx: Runtime errors, reported while a backend executes
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Semantic Errors (E2xxx)
    /// Text operand in arithmetic, or text mixed with numbers in an aggregate
    E2001,
    /// Text operand in comparison
    E2002,
    /// Text operand in AND/OR
    E2003,
    /// Text operand of NOT or unary minus
    E2004,
    /// Function call without arguments
    E2005,
    /// Unknown function
    E2006,
    /// Range used outside a function call
    E2007,
    /// Non-numeric IF/WHILE condition
    E2008,

    // Runtime Errors (E6xxx)
    /// Aggregate over an empty operand list
    E6001,
    /// Unknown function reached at runtime
    E6002,
    /// Export file could not be written
    E6003,

    // Internal Errors (E9xxx)
    /// Generated routine failed verification
    E9001,
    /// Code generator backend could not be set up
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-line description, used by `--explain`-style tooling and tests.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "text operand in arithmetic",
            ErrorCode::E2002 => "text operand in comparison",
            ErrorCode::E2003 => "text operand in logical operator",
            ErrorCode::E2004 => "text operand of unary operator",
            ErrorCode::E2005 => "function call without arguments",
            ErrorCode::E2006 => "unknown function",
            ErrorCode::E2007 => "range outside a function call",
            ErrorCode::E2008 => "non-numeric condition",
            ErrorCode::E6001 => "aggregate over no values",
            ErrorCode::E6002 => "unknown function at runtime",
            ErrorCode::E6003 => "export failed",
            ErrorCode::E9001 => "generated code failed verification",
            ErrorCode::E9002 => "code generator unavailable",
        }
    }

    /// Semantic errors gate execution.
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Runtime errors are reported and execution continues.
    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// Internal errors signal an engine defect and abort the run.
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
