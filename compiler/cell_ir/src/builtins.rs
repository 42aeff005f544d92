//! Builtin aggregate functions.

use std::fmt;

/// Aggregate functions callable from cell expressions.
///
/// Lookup is exact and case-sensitive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Aggregate {
    Sum,
    Average,
    Min,
    Max,
}

impl Aggregate {
    pub const ALL: [Aggregate; 4] = [
        Aggregate::Sum,
        Aggregate::Average,
        Aggregate::Min,
        Aggregate::Max,
    ];

    /// Resolve a function name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUM" => Some(Aggregate::Sum),
            "AVERAGE" => Some(Aggregate::Average),
            "MIN" => Some(Aggregate::Min),
            "MAX" => Some(Aggregate::Max),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Average => "AVERAGE",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }

    /// AVERAGE always produces a float; the others follow their arguments.
    pub const fn always_float(self) -> bool {
        matches!(self, Aggregate::Average)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
