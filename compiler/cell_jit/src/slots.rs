//! Cell storage layout for compiled code.
//!
//! Compiled code addresses cells by slot index instead of by name. Each
//! cell id referenced anywhere in the program gets one slot, numbered in
//! first-reference order during translation.

use std::mem::{offset_of, size_of};

use cell_ir::{Name, StringInterner};
use cell_rt::{CellStore, Value};
use rustc_hash::FxHashMap;

/// Slot holds an `Int`; `payload` is its exact value, `num` its numeric view.
pub const KIND_INT: i64 = 0;
/// Slot holds a `Float`; `num` is its value.
pub const KIND_FLOAT: i64 = 1;
/// Slot holds a `Text`; `payload` is the raw interned name.
pub const KIND_TEXT: i64 = 2;

/// One cell as seen by generated code.
///
/// `order` is 0 until the first assignment, then the run clock value at
/// that assignment. Slots with `order == 0` are not part of the store.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CellSlot {
    pub kind: i64,
    pub num: f64,
    pub payload: i64,
    pub order: i64,
}

impl CellSlot {
    pub const SIZE: usize = size_of::<CellSlot>();
    pub const KIND_OFFSET: usize = offset_of!(CellSlot, kind);
    pub const NUM_OFFSET: usize = offset_of!(CellSlot, num);
    pub const PAYLOAD_OFFSET: usize = offset_of!(CellSlot, payload);
    pub const ORDER_OFFSET: usize = offset_of!(CellSlot, order);

    pub fn is_assigned(&self) -> bool {
        self.order > 0
    }

    /// The runtime value this slot encodes.
    pub fn to_value(&self) -> Value {
        match self.kind {
            KIND_FLOAT => Value::Float(self.num),
            KIND_TEXT => Value::Text(Name::from_raw(self.payload as u32)),
            _ => Value::Int(self.payload),
        }
    }
}

/// Assigns slot indices to cell ids.
#[derive(Default, Debug)]
pub struct SlotTable {
    index: FxHashMap<Name, usize>,
    names: Vec<Name>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `cell`, allocating the next one on first reference.
    pub fn slot_for(&mut self, cell: Name) -> usize {
        if let Some(&slot) = self.index.get(&cell) {
            return slot;
        }
        let slot = self.names.len();
        self.index.insert(cell, slot);
        self.names.push(cell);
        slot
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Cell id of each slot, by slot index.
    pub fn names(&self) -> &[Name] {
        &self.names
    }
}

/// Assigned cells in first-assignment order.
pub fn live_cells(slots: &[CellSlot], names: &[Name]) -> Vec<(Name, Value)> {
    let mut live: Vec<(&CellSlot, Name)> = slots
        .iter()
        .zip(names.iter().copied())
        .filter(|(slot, _)| slot.is_assigned())
        .collect();
    live.sort_by_key(|(slot, _)| slot.order);
    live.into_iter()
        .map(|(slot, name)| (name, slot.to_value()))
        .collect()
}

/// Build the final store from the slot array.
pub fn collect_store(slots: &[CellSlot], names: &[Name]) -> CellStore {
    live_cells(slots, names).into_iter().collect()
}

/// Debug rendering of the slot map, used by the IR dump.
pub fn describe_slots(names: &[Name], interner: &StringInterner) -> String {
    names
        .iter()
        .enumerate()
        .map(|(slot, &name)| format!("slot{slot} = {}", interner.lookup(name)))
        .collect::<Vec<_>>()
        .join("\n")
}
