//! Hand-written programs, one per feature area.

use cell_diagnostic::ErrorCode;
use cell_ir::{BinaryOp, ProgramBuilder, StringInterner};
use cell_rt::Value;
use pretty_assertions::assert_eq;

use crate::common::{run_both, run_both_exporting};

#[test]
fn grid_with_totals() {
    // A1..A3 and B1..B3 hold numbers; C1 = SUM(A1:B3); C2 = AVERAGE(A1:A3, 6); TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let mut stmts = Vec::new();
    for (cell, value) in [("A1", 1), ("A2", 2), ("A3", 3), ("B1", 10), ("B2", 20), ("B3", 30)] {
        let v = b.int(value);
        stmts.push(b.assign(cell, v));
    }
    let all = b.range("A1", "B3");
    let total = b.call("SUM", [all]);
    stmts.push(b.assign("C1", total));
    let column = b.range("A1", "A3");
    let six = b.int(6);
    let avg = b.call("AVERAGE", [column, six]);
    stmts.push(b.assign("C2", avg));
    stmts.push(b.table());
    let program = b.finish(stmts);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("C1")), Value::Float(66.0));
    assert_eq!(both.store().get(interner.intern("C2")), Value::Float(3.0));
    assert_eq!(
        both.output(),
        "A1\t1\nA2\t2\nA3\t3\nB1\t10\nB2\t20\nB3\t30\nC1\t66\nC2\t3\n"
    );
}

#[test]
fn loop_with_guarded_accumulator() {
    // I1 = 0; WHILE I1 < 6 { IF I1 > 2 { S1 = S1 + I1 }; I1 = I1 + 1 }; TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let zero = b.int(0);
    let init = b.assign("I1", zero);
    let i = b.cell("I1");
    let six = b.int(6);
    let cond = b.binary(BinaryOp::Lt, i, six);
    let i_guard = b.cell("I1");
    let two = b.int(2);
    let guard = b.binary(BinaryOp::Gt, i_guard, two);
    let s = b.cell("S1");
    let i_add = b.cell("I1");
    let acc = b.binary(BinaryOp::Add, s, i_add);
    let accumulate = b.assign("S1", acc);
    let guarded = b.if_(guard, vec![accumulate]);
    let i_step = b.cell("I1");
    let one = b.int(1);
    let next = b.binary(BinaryOp::Add, i_step, one);
    let step = b.assign("I1", next);
    let looped = b.while_(cond, vec![guarded, step]);
    let table = b.table();
    let program = b.finish(vec![init, looped, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.store().get(interner.intern("S1")), Value::Float(12.0));
    assert_eq!(both.output(), "I1\t6\nS1\t12\n");
}

#[test]
fn text_cells_in_table_and_aggregates() {
    // A1 = "total"; A2 = 4; A3 = MAX(A1:A2); TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let label = b.text("total");
    let s1 = b.assign("A1", label);
    let four = b.int(4);
    let s2 = b.assign("A2", four);
    let range = b.range("A1", "A2");
    let max = b.call("MAX", [range]);
    let s3 = b.assign("A3", max);
    let table = b.table();
    let program = b.finish(vec![s1, s2, s3, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.output(), "A1\ttotal\nA2\t4\nA3\t4\n");
}

#[test]
fn reassignment_keeps_position_and_changes_kind() {
    // B1 = 1; A1 = 2; B1 = "x"; A1 = 0.5; TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let one = b.int(1);
    let s1 = b.assign("B1", one);
    let two = b.int(2);
    let s2 = b.assign("A1", two);
    let text = b.text("x");
    let s3 = b.assign("B1", text);
    let half = b.float(0.5);
    let s4 = b.assign("A1", half);
    let table = b.table();
    let program = b.finish(vec![s1, s2, s3, s4, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.output(), "B1\tx\nA1\t0.5\n");
}

#[test]
fn runtime_diagnostics_match() {
    // A1 = SUM(B2:A1); TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let reversed = b.range("B2", "A1");
    let sum = b.call("SUM", [reversed]);
    let s1 = b.assign("A1", sum);
    let table = b.table();
    let program = b.finish(vec![s1, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.codes(), vec![ErrorCode::E6001]);
    assert_eq!(both.output(), "A1\t0\n");
}

#[test]
fn special_float_values_format_alike() {
    // A1 = 1 / 0; A2 = -1 / 0; A3 = 0 / 0; A4 = -0.0; A5 = 1234567 * 1; TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let mut stmts = Vec::new();
    for (cell, numerator, denominator) in [("A1", 1.0, 0.0), ("A2", -1.0, 0.0), ("A3", 0.0, 0.0)] {
        let n = b.float(numerator);
        let d = b.float(denominator);
        let q = b.binary(BinaryOp::Div, n, d);
        stmts.push(b.assign(cell, q));
    }
    let zero = b.float(0.0);
    let neg_zero = b.neg(zero);
    stmts.push(b.assign("A4", neg_zero));
    let big = b.int(1_234_567);
    let one = b.int(1);
    let product = b.binary(BinaryOp::Mul, big, one);
    stmts.push(b.assign("A5", product));
    stmts.push(b.table());
    let program = b.finish(stmts);

    let both = run_both(&program, &interner);
    assert_eq!(
        both.output(),
        "A1\tinf\nA2\t-inf\nA3\tnan\nA4\t-0\nA5\t1.23457e+06\n"
    );
}

#[test]
fn compiled_run_reports_its_ir() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let one = b.int(1);
    let s1 = b.assign("A1", one);
    let program = b.finish(vec![s1]);

    let both = run_both(&program, &interner);
    assert!(both.jit.ir_text.as_deref().unwrap().contains("slot0 = A1"));
    assert!(both.interp.ir_text.is_none());
}

#[test]
fn exports_match_byte_for_byte() {
    // Int, exact big Int, %g floats, inf, -0 and quoted text; then EXPORT twice,
    // once into a directory that does not exist.
    let interner = StringInterner::new();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("cells.csv");
    let bad = dir.path().join("missing").join("cells.csv");
    let mut b = ProgramBuilder::new(&interner);
    let mut stmts = Vec::new();
    let answer = b.int(42);
    stmts.push(b.assign("A1", answer));
    let big = b.int(9_007_199_254_740_993);
    stmts.push(b.assign("A2", big));
    let one = b.float(1.0);
    let three = b.float(3.0);
    let third = b.binary(BinaryOp::Div, one, three);
    stmts.push(b.assign("A3", third));
    let one = b.float(1.0);
    let zero = b.float(0.0);
    let inf = b.binary(BinaryOp::Div, one, zero);
    stmts.push(b.assign("A4", inf));
    let zero = b.float(0.0);
    let neg_zero = b.neg(zero);
    stmts.push(b.assign("A5", neg_zero));
    let quoted = b.text("say \"hi\", ok");
    stmts.push(b.assign("A6", quoted));
    let plain = b.text("plain");
    stmts.push(b.assign("A7", plain));
    stmts.push(b.export(good.to_str().unwrap()));
    stmts.push(b.export(bad.to_str().unwrap()));
    let program = b.finish(stmts);

    let (both, files) = run_both_exporting(&program, &interner, dir.path());
    assert_eq!(both.codes(), vec![ErrorCode::E6003]);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "cells.csv");
    assert_eq!(
        String::from_utf8(files[0].1.clone()).unwrap(),
        "A1,42\nA2,9007199254740993\nA3,0.333333\nA4,inf\nA5,-0\n\
         A6,\"say \"\"hi\"\", ok\"\nA7,plain\n"
    );
}

#[test]
fn huge_range_sums_alike() {
    // A7 = 2; B1 = SUM(A1:A100000); B2 = AVERAGE(A1:A100000); TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let two = b.int(2);
    let s1 = b.assign("A7", two);
    let range = b.range("A1", "A100000");
    let sum = b.call("SUM", [range]);
    let s2 = b.assign("B1", sum);
    let range = b.range("A1", "A100000");
    let avg = b.call("AVERAGE", [range]);
    let s3 = b.assign("B2", avg);
    let table = b.table();
    let program = b.finish(vec![s1, s2, s3, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.output(), "A7\t2\nB1\t2\nB2\t2e-05\n");
}

#[test]
fn text_only_aggregates_run_alike() {
    // A1 = SUM("x"); B1 = AVERAGE("x", 2); C1 = MAX("x")
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let x = b.text("x");
    let sum = b.call("SUM", [x]);
    let s1 = b.assign("A1", sum);
    let x = b.text("x");
    let two = b.int(2);
    let avg = b.call("AVERAGE", [x, two]);
    let s2 = b.assign("B1", avg);
    let x = b.text("x");
    let max = b.call("MAX", [x]);
    let s3 = b.assign("C1", max);
    let program = b.finish(vec![s1, s2, s3]);

    let both = run_both(&program, &interner);
    assert_eq!(both.interp.status, cellc::RunStatus::Success);
    let store = both.store();
    assert_eq!(store.get(interner.intern("A1")), Value::Float(0.0));
    assert_eq!(store.get(interner.intern("B1")), Value::Float(1.0));
    assert_eq!(store.get(interner.intern("C1")), Value::Float(0.0));
}

#[test]
fn ints_beyond_f64_precision_match() {
    // A1 = 9007199254740993; A2 = -A1; TABLE
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let big = b.int(9_007_199_254_740_993);
    let s1 = b.assign("A1", big);
    let a1 = b.cell("A1");
    let neg = b.neg(a1);
    let s2 = b.assign("A2", neg);
    let table = b.table();
    let program = b.finish(vec![s1, s2, table]);

    let both = run_both(&program, &interner);
    assert_eq!(both.output(), "A1\t9007199254740993\nA2\t-9007199254740993\n");
    assert_eq!(
        both.store().get(interner.intern("A2")),
        Value::Int(-9_007_199_254_740_993)
    );
}
