//! Cell coordinates for range arithmetic.
//!
//! A cell id is a single column letter followed by a decimal row number.
//! Multi-letter columns are not supported: only the first byte is the
//! column, and the rest is parsed as the row.

/// Column and row of a cell id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CellCoord {
    /// First byte of the cell id.
    pub column: u8,
    /// Row number, parsed like C `atoi`.
    pub row: i64,
}

impl CellCoord {
    pub const fn new(column: u8, row: i64) -> Self {
        CellCoord { column, row }
    }

    /// Parse a cell id.
    ///
    /// Never fails: an empty id is column 0, row 0, and a row without
    /// leading digits is row 0. Overflowing rows saturate.
    pub fn parse(id: &str) -> Self {
        let bytes = id.as_bytes();
        let Some((&column, rest)) = bytes.split_first() else {
            return CellCoord::new(0, 0);
        };
        CellCoord::new(column, parse_row(rest))
    }

    /// Render back into a cell id.
    pub fn to_id(self) -> String {
        let mut id = String::with_capacity(8);
        id.push(char::from(self.column));
        id.push_str(&self.row.to_string());
        id
    }
}

fn parse_row(bytes: &[u8]) -> i64 {
    let mut rest = bytes;
    while let Some((first, tail)) = rest.split_first() {
        if first.is_ascii_whitespace() {
            rest = tail;
        } else {
            break;
        }
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let mut row: i64 = 0;
    for &byte in rest.iter().take_while(|b| b.is_ascii_digit()) {
        row = row
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }
    if negative {
        -row
    } else {
        row
    }
}
