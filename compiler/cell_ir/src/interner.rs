//! String interner for cell ids, function names and text literals.
//!
//! Interned strings are leaked and live for the rest of the process, so a
//! `Name` stays resolvable for as long as any compiled routine may hold it.
//! Only the parser and program builder add strings, so the table grows with
//! the program text; range expansion looks ids up without interning them.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Aggregate, Name};

#[derive(Default)]
struct Table {
    index: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Interning ran out of 32-bit handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternError {
    pub count: usize,
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "string interner is full ({} strings)", self.count)
    }
}

impl std::error::Error for InternError {}

/// Maps strings to `Name`s and back.
///
/// Takes `&self` everywhere so the checker, both backends and the compiled
/// routine's helpers can share one interner by reference.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// An interner holding the empty string and the builtin function names.
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(Table::default()),
        };
        interner.intern("");
        for builtin in Aggregate::ALL {
            interner.intern(builtin.name());
        }
        interner
    }

    /// Intern `s`, failing only when every handle is taken.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().index.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        // Another caller may have won the race for the write lock.
        if let Some(&name) = table.index.get(s) {
            return Ok(name);
        }
        let name = u32::try_from(table.strings.len())
            .map(Name::from_raw)
            .map_err(|_| InternError {
                count: table.strings.len(),
            })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.index.insert(leaked, name);
        Ok(name)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics after 2^32 distinct strings.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The handle of `s` if it was already interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().index.get(s).copied()
    }

    /// The string behind `name`; empty for a handle this interner never made.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Distinct strings interned, the empty string included.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is interned up front.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
