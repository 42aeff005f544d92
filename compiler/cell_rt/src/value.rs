//! Runtime values.

use cell_ir::{Name, StringInterner};

use crate::format_general;

/// Dynamically tagged cell value.
///
/// Text is stored as an interned `Name`, which keeps `Value` `Copy` and lets
/// the compiled backend carry text as a plain integer handle.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(Name),
}

impl Value {
    /// Value of a cell that was never assigned.
    pub const DEFAULT: Value = Value::Int(0);

    /// Numeric view: Int widens to f64, Text reads as 0.0.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(n) => n as f64,
            Value::Float(f) => f,
            Value::Text(_) => 0.0,
        }
    }

    /// A value is true when its numeric view is not 0.0. NaN is true.
    #[inline]
    pub fn is_truthy(self) -> bool {
        self.as_f64() != 0.0
    }

    /// Integer 0/1 from a boolean.
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    /// Render for table and export output.
    ///
    /// Int prints as a decimal integer, Float in `%g` form, Text raw.
    pub fn render(self, interner: &StringInterner) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_general(f),
            Value::Text(name) => interner.lookup(name).to_owned(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::DEFAULT
    }
}
