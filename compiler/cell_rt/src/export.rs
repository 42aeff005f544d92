//! CSV export.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use cell_ir::{Name, StringInterner};
use thiserror::Error;
use tracing::debug;

use crate::Value;

/// Failure while exporting cells to a file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot open export file `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot write export file `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Quote text containing a comma, quote or newline, doubling inner quotes.
pub fn csv_escape(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

/// One CSV line without the trailing newline: `name,value`.
pub fn csv_line(name: Name, value: Value, interner: &StringInterner) -> String {
    let rendered = match value {
        Value::Text(text) => csv_escape(interner.lookup(text)).into_owned(),
        Value::Int(_) | Value::Float(_) => value.render(interner),
    };
    format!("{},{rendered}", interner.lookup(name))
}

/// Write cells to `path` as CSV, one line per cell, no header.
///
/// The file handle is closed on every path out of this function. Returns the
/// number of lines written.
pub fn write_csv(
    path: &str,
    cells: impl IntoIterator<Item = (Name, Value)>,
    interner: &StringInterner,
) -> Result<usize, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let write_err = |source| ExportError::Write {
        path: path.to_owned(),
        source,
    };

    let mut lines = 0;
    for (name, value) in cells {
        writeln!(writer, "{}", csv_line(name, value, interner)).map_err(write_err)?;
        lines += 1;
    }
    writer.flush().map_err(write_err)?;
    debug!(path, lines, "exported cells");
    Ok(lines)
}
