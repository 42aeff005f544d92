//! TABLE output.

use cell_ir::{Name, StringInterner};

use crate::{PrintHandlerImpl, Value};

/// One table line: `name<TAB>value`.
pub fn table_line(name: Name, value: Value, interner: &StringInterner) -> String {
    format!("{}\t{}", interner.lookup(name), value.render(interner))
}

/// Print every cell in the given order.
pub fn print_table(
    cells: impl IntoIterator<Item = (Name, Value)>,
    interner: &StringInterner,
    printer: &PrintHandlerImpl,
) {
    for (name, value) in cells {
        printer.println(&table_line(name, value, interner));
    }
}
