//! Shared runners and comparisons.

use std::fs;
use std::path::Path;

use cell_diagnostic::ErrorCode;
use cell_ir::{Program, StringInterner};
use cell_rt::{CellStore, Value};
use cellc::{run_program, Backend, RunOptions, RunOutcome};
use pretty_assertions::assert_eq;

/// Outcomes of one program on each backend.
pub struct BothOutcomes {
    pub interp: RunOutcome,
    pub jit: RunOutcome,
}

impl BothOutcomes {
    /// The interpreter's final store; both stores are already known equal.
    pub fn store(&self) -> &CellStore {
        self.interp.store.as_ref().unwrap()
    }

    pub fn output(&self) -> &str {
        &self.interp.output
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        codes(&self.interp)
    }
}

pub fn codes(outcome: &RunOutcome) -> Vec<ErrorCode> {
    outcome.diagnostics.iter().map(|d| d.code).collect()
}

pub fn run_on(program: &Program, interner: &StringInterner, backend: Backend) -> RunOutcome {
    run_program(program, interner, &RunOptions::captured(backend))
}

/// Run on both backends and assert the outcomes agree.
pub fn run_both(program: &Program, interner: &StringInterner) -> BothOutcomes {
    let interp = run_on(program, interner, Backend::Interpreter);
    let jit = run_on(program, interner, Backend::Jit);
    assert_outcomes_match(&interp, &jit, interner);
    BothOutcomes { interp, jit }
}

/// Export files by name, with their bytes.
pub type ExportedFiles = Vec<(String, Vec<u8>)>;

/// Run on both backends with EXPORT statements writing into `dir`, and
/// assert that both wrote the same files byte for byte.
pub fn run_both_exporting(
    program: &Program,
    interner: &StringInterner,
    dir: &Path,
) -> (BothOutcomes, ExportedFiles) {
    let interp = run_on(program, interner, Backend::Interpreter);
    let interp_files = take_files(dir);
    let jit = run_on(program, interner, Backend::Jit);
    let jit_files = take_files(dir);
    assert_outcomes_match(&interp, &jit, interner);
    assert_eq!(interp_files, jit_files, "export files");
    (BothOutcomes { interp, jit }, interp_files)
}

/// Read and delete every file directly inside `dir`, sorted by name.
fn take_files(dir: &Path) -> ExportedFiles {
    let mut files: ExportedFiles = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .map(|path| {
            let bytes = fs::read(&path).unwrap();
            fs::remove_file(&path).unwrap();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            (name, bytes)
        })
        .collect();
    files.sort();
    files
}

pub fn assert_outcomes_match(interp: &RunOutcome, jit: &RunOutcome, interner: &StringInterner) {
    assert_eq!(interp.status, jit.status, "status");
    assert_eq!(interp.output, jit.output, "table output");
    assert_eq!(codes(interp), codes(jit), "diagnostics");
    match (&interp.store, &jit.store) {
        (Some(a), Some(b)) => assert_stores_match(a, b, interner),
        (None, None) => {}
        _ => panic!("only one backend executed"),
    }
}

/// Same cells in the same order; numbers within tolerance, text identical.
pub fn assert_stores_match(a: &CellStore, b: &CellStore, interner: &StringInterner) {
    let render = |store: &CellStore| -> Vec<&str> {
        store.names().map(|n| interner.lookup(n)).collect()
    };
    assert_eq!(render(a), render(b), "cell order");
    for ((name, left), (_, right)) in a.iter().zip(b.iter()) {
        assert!(
            values_match(left, right),
            "{}: interpreter {left:?}, compiled {right:?}",
            interner.lookup(name)
        );
    }
}

pub fn values_match(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => floats_match(a, b),
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => false,
    }
}

fn floats_match(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}
