//! Insertion-ordered cell storage.

use cell_ir::Name;
use rustc_hash::FxHashMap;

use crate::Value;

/// Cell values keyed by cell id.
///
/// Iteration follows first-insertion order, which is the order Table and
/// Export print in. Reassignment keeps a cell's position and may change its
/// value kind.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct CellStore {
    index: FxHashMap<Name, usize>,
    entries: Vec<(Name, Value)>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a cell; unassigned cells read as Int 0.
    pub fn get(&self, cell: Name) -> Value {
        self.index
            .get(&cell)
            .map_or(Value::DEFAULT, |&slot| self.entries[slot].1)
    }

    /// Insert or overwrite a cell value.
    pub fn set(&mut self, cell: Name, value: Value) {
        if let Some(&slot) = self.index.get(&cell) {
            self.entries[slot].1 = value;
        } else {
            self.index.insert(cell, self.entries.len());
            self.entries.push((cell, value));
        }
    }

    pub fn contains(&self, cell: Name) -> bool {
        self.index.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cells in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, Value)> + '_ {
        self.entries.iter().copied()
    }

    /// Cell ids in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }
}

impl FromIterator<(Name, Value)> for CellStore {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        let mut store = CellStore::new();
        for (name, value) in iter {
            store.set(name, value);
        }
        store
    }
}
