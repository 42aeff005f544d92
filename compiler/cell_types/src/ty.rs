//! Static types.

use std::fmt;

/// Coarse static type of an expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Int,
    Float,
    Text,
    /// The expression is ill-typed; a diagnostic has already been emitted.
    Error,
}

impl Type {
    pub const fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub const fn is_error(self) -> bool {
        matches!(self, Type::Error)
    }

    /// Arithmetic promotion.
    ///
    /// Error if either side is Error or Text, Float if either side is Float,
    /// Int otherwise.
    pub const fn promote(self, other: Type) -> Type {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) | (Type::Text, _) | (_, Type::Text) => Type::Error,
            (Type::Float, _) | (_, Type::Float) => Type::Float,
            (Type::Int, Type::Int) => Type::Int,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Text => write!(f, "text"),
            Type::Error => write!(f, "<error>"),
        }
    }
}
