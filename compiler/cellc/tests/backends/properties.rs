//! One test per documented behavioral guarantee.

use cell_diagnostic::ErrorCode;
use cell_ir::{Aggregate, BinaryOp, ProgramBuilder, StringInterner};
use cell_rt::{aggregate, expand_range, Value};
use cellc::{Backend, RunStatus};
use pretty_assertions::assert_eq;

use crate::common::{codes, run_both, run_on};

#[test]
fn range_expansion_is_column_major() {
    let interner = StringInterner::new();
    for id in ["A2", "B1"] {
        interner.intern(id);
    }
    let cells = expand_range(interner.intern("A1"), interner.intern("B2"), &interner);
    let ids: Vec<_> = cells.iter().flatten().map(|&c| interner.lookup(c)).collect();
    assert_eq!(ids, vec!["A1", "A2", "B1", "B2"]);
}

#[test]
fn average_and_sum_over_two_cells() {
    // A1 = 2; A2 = 4; B1 = AVERAGE(A1:A2); B2 = SUM(A1:A2)
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let two = b.int(2);
    let s1 = b.assign("A1", two);
    let four = b.int(4);
    let s2 = b.assign("A2", four);
    let range = b.range("A1", "A2");
    let avg = b.call("AVERAGE", [range]);
    let s3 = b.assign("B1", avg);
    let range = b.range("A1", "A2");
    let sum = b.call("SUM", [range]);
    let s4 = b.assign("B2", sum);
    let program = b.finish(vec![s1, s2, s3, s4]);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("B1")), Value::Float(3.0));
    assert_eq!(both.store().get(interner.intern("B2")), Value::Float(6.0));
}

#[test]
fn min_tie_resolves_to_first_occurrence() {
    assert_eq!(aggregate(Aggregate::Min, &[3.0, 1.0, 1.0]), Some(1.0));
    // Signed zeros compare equal, so the earliest one is kept.
    let first = aggregate(Aggregate::Min, &[-0.0, 0.0]).unwrap();
    assert!(first.is_sign_negative());

    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let three = b.int(3);
    let one = b.int(1);
    let one_again = b.int(1);
    let min = b.call("MIN", [three, one, one_again]);
    let s1 = b.assign("A1", min);
    let program = b.finish(vec![s1]);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("A1")), Value::Float(1.0));
}

#[test]
fn text_in_arithmetic_is_a_semantic_error() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let text = b.text("x");
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, text, one);
    let s1 = b.assign("A1", sum);
    let program = b.finish(vec![s1]);

    for backend in Backend::ALL {
        let outcome = run_on(&program, &interner, backend);
        assert_eq!(outcome.status, RunStatus::SemanticErrors(1));
        assert_eq!(codes(&outcome), vec![ErrorCode::E2001]);
    }
}

#[test]
fn unary_operators_reject_text_and_accept_numbers() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let x = b.text("x");
    let not_text = b.not(x);
    let s1 = b.assign("A1", not_text);
    let y = b.text("y");
    let neg_text = b.neg(y);
    let s2 = b.assign("A2", neg_text);
    let rejected = b.finish(vec![s1, s2]);

    let outcome = run_on(&rejected, &interner, Backend::Interpreter);
    assert_eq!(outcome.status, RunStatus::SemanticErrors(2));
    assert_eq!(codes(&outcome), vec![ErrorCode::E2004, ErrorCode::E2004]);

    let mut b = ProgramBuilder::new(&interner);
    let five = b.int(5);
    let not_num = b.not(five);
    let s1 = b.assign("A1", not_num);
    let half = b.float(0.5);
    let neg_num = b.neg(half);
    let s2 = b.assign("A2", neg_num);
    let accepted = b.finish(vec![s1, s2]);

    let both = run_both(&accepted, &interner);
    assert_eq!(both.interp.status, RunStatus::Success);
    assert_eq!(both.store().get(interner.intern("A1")), Value::Int(0));
    assert_eq!(both.store().get(interner.intern("A2")), Value::Float(-0.5));
}

#[test]
fn while_runs_body_exactly_three_times() {
    // A1 = 0; WHILE A1 < 3 { A1 = A1 + 1; N1 = N1 + 1 }
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let zero = b.int(0);
    let init = b.assign("A1", zero);
    let a1 = b.cell("A1");
    let three = b.int(3);
    let cond = b.binary(BinaryOp::Lt, a1, three);
    let a1_again = b.cell("A1");
    let one = b.int(1);
    let inc = b.binary(BinaryOp::Add, a1_again, one);
    let step = b.assign("A1", inc);
    let n1 = b.cell("N1");
    let one_again = b.int(1);
    let count = b.binary(BinaryOp::Add, n1, one_again);
    let counter = b.assign("N1", count);
    let looped = b.while_(cond, vec![step, counter]);
    let program = b.finish(vec![init, looped]);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("A1")), Value::Float(3.0));
    assert_eq!(both.store().get(interner.intern("N1")), Value::Float(3.0));
}

#[test]
fn csv_export_escapes_quotes_and_commas() {
    let interner = StringInterner::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quoted.csv");
    let mut b = ProgramBuilder::new(&interner);
    let text = b.text("He said \"hi\", ok");
    let s1 = b.assign("A1", text);
    let export = b.export(path.to_str().unwrap());
    let program = b.finish(vec![s1, export]);

    for backend in Backend::ALL {
        let outcome = run_on(&program, &interner, backend);
        assert_eq!(outcome.status, RunStatus::Success);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "A1,\"He said \"\"hi\"\", ok\"\n",
            "{backend}"
        );
        std::fs::remove_file(&path).unwrap();
    }
}

#[test]
fn false_if_executes_nothing() {
    // A1 = 1; IF A1 > 5 { A1 = 100; B1 = 1 }
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let one = b.int(1);
    let init = b.assign("A1", one);
    let a1 = b.cell("A1");
    let five = b.int(5);
    let cond = b.binary(BinaryOp::Gt, a1, five);
    let hundred = b.int(100);
    let overwrite = b.assign("A1", hundred);
    let one_again = b.int(1);
    let fresh = b.assign("B1", one_again);
    let guarded = b.if_(cond, vec![overwrite, fresh]);
    let program = b.finish(vec![init, guarded]);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("A1")), Value::Int(1));
    assert!(!both.store().contains(interner.intern("B1")));
}

#[test]
fn unopenable_export_reports_and_continues() {
    // A1 = 7; EXPORT "<missing dir>/x.csv"; A2 = A1 + 1; TABLE
    let interner = StringInterner::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("x.csv");
    let mut b = ProgramBuilder::new(&interner);
    let seven = b.int(7);
    let s1 = b.assign("A1", seven);
    let export = b.export(path.to_str().unwrap());
    let a1 = b.cell("A1");
    let one = b.int(1);
    let next = b.binary(BinaryOp::Add, a1, one);
    let s2 = b.assign("A2", next);
    let table = b.table();
    let program = b.finish(vec![s1, export, s2, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.interp.exit_code(), 0);
    assert_eq!(both.codes(), vec![ErrorCode::E6003]);
    assert_eq!(both.output(), "A1\t7\nA2\t8\n");
    assert!(!path.exists());
}
