//! Generated programs must behave identically on both backends.
//!
//! Programs are generated as plain data, then built with `ProgramBuilder`.
//! Every generated program type-checks: text only appears as a whole
//! assignment value, ranges only as call arguments, and calls always have
//! arguments. Loops use the bounded template
//!
//! ```text
//! Zn = 0; WHILE Zn < bound { body; Zn = Zn + 1 }
//! ```
//!
//! where `n` is the nesting depth and bodies only assign columns A-D, so
//! every program terminates. EXPORT statements write into a fresh temporary
//! directory, one of their targets being unopenable, and both backends must
//! leave identical files behind.

use std::path::Path;

use cell_ir::{Aggregate, BinaryOp, ExprId, ProgramBuilder, Stmt, StringInterner};
use cellc::RunStatus;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::select;

use crate::common::run_both_exporting;

const COLUMNS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Clone, Debug)]
enum GenExpr {
    Int(i64),
    Float(f64),
    Cell(String),
    Neg(Box<GenExpr>),
    Not(Box<GenExpr>),
    Binary(BinaryOp, Box<GenExpr>, Box<GenExpr>),
    Call(Aggregate, Vec<GenArg>),
}

#[derive(Clone, Debug)]
enum GenArg {
    Expr(GenExpr),
    Range(String, String),
}

#[derive(Clone, Debug)]
enum GenStmt {
    Assign(String, GenExpr),
    AssignText(String, String),
    If(GenExpr, Vec<GenStmt>),
    Loop { bound: i64, body: Vec<GenStmt> },
    Table,
    /// Export target by index; the last one cannot be opened.
    Export(usize),
}

const EXPORT_TARGETS: usize = 3;

fn cell_id() -> impl Strategy<Value = String> {
    (select(COLUMNS.to_vec()), 1..=4i64).prop_map(|(column, row)| format!("{column}{row}"))
}

fn expr() -> impl Strategy<Value = GenExpr> {
    let leaf = prop_oneof![
        (-20i64..20).prop_map(GenExpr::Int),
        (-50.0f64..50.0).prop_map(GenExpr::Float),
        Just(GenExpr::Float(0.0)),
        cell_id().prop_map(GenExpr::Cell),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        let arg = prop_oneof![
            inner.clone().prop_map(GenArg::Expr),
            (cell_id(), cell_id()).prop_map(|(start, end)| GenArg::Range(start, end)),
        ];
        prop_oneof![
            inner.clone().prop_map(|e| GenExpr::Neg(Box::new(e))),
            inner.clone().prop_map(|e| GenExpr::Not(Box::new(e))),
            (select(BinaryOp::ALL.to_vec()), inner.clone(), inner)
                .prop_map(|(op, l, r)| GenExpr::Binary(op, Box::new(l), Box::new(r))),
            (select(Aggregate::ALL.to_vec()), vec(arg, 1..4))
                .prop_map(|(func, args)| GenExpr::Call(func, args)),
        ]
    })
}

fn stmt() -> impl Strategy<Value = GenStmt> {
    let leaf = prop_oneof![
        6 => (cell_id(), expr()).prop_map(|(cell, e)| GenStmt::Assign(cell, e)),
        1 => (cell_id(), "[a-z ,\"]{0,6}").prop_map(|(cell, t)| GenStmt::AssignText(cell, t)),
        1 => Just(GenStmt::Table),
        1 => (0..EXPORT_TARGETS).prop_map(GenStmt::Export),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            (expr(), vec(inner.clone(), 0..4)).prop_map(|(cond, body)| GenStmt::If(cond, body)),
            (0..4i64, vec(inner, 0..4)).prop_map(|(bound, body)| GenStmt::Loop { bound, body }),
        ]
    })
}

fn build_expr(b: &mut ProgramBuilder<'_>, expr: &GenExpr) -> ExprId {
    match expr {
        GenExpr::Int(n) => b.int(*n),
        GenExpr::Float(f) => b.float(*f),
        GenExpr::Cell(id) => b.cell(id),
        GenExpr::Neg(operand) => {
            let operand = build_expr(b, operand);
            b.neg(operand)
        }
        GenExpr::Not(operand) => {
            let operand = build_expr(b, operand);
            b.not(operand)
        }
        GenExpr::Binary(op, left, right) => {
            let left = build_expr(b, left);
            let right = build_expr(b, right);
            b.binary(*op, left, right)
        }
        GenExpr::Call(func, args) => {
            let args: Vec<ExprId> = args
                .iter()
                .map(|arg| match arg {
                    GenArg::Expr(e) => build_expr(b, e),
                    GenArg::Range(start, end) => b.range(start, end),
                })
                .collect();
            b.call(func.name(), args)
        }
    }
}

fn export_path(dir: &Path, target: usize) -> String {
    let path = if target + 1 == EXPORT_TARGETS {
        dir.join("missing").join("out.csv")
    } else {
        dir.join(format!("out{target}.csv"))
    };
    path.to_string_lossy().into_owned()
}

fn build_stmts(
    b: &mut ProgramBuilder<'_>,
    stmts: &[GenStmt],
    depth: usize,
    dir: &Path,
) -> Vec<Stmt> {
    let mut out = Vec::new();
    for stmt in stmts {
        match stmt {
            GenStmt::Assign(cell, e) => {
                let value = build_expr(b, e);
                out.push(b.assign(cell, value));
            }
            GenStmt::AssignText(cell, text) => {
                let value = b.text(text);
                out.push(b.assign(cell, value));
            }
            GenStmt::If(cond, body) => {
                let cond = build_expr(b, cond);
                let body = build_stmts(b, body, depth, dir);
                out.push(b.if_(cond, body));
            }
            GenStmt::Loop { bound, body } => {
                let counter = format!("Z{}", depth + 1);
                let zero = b.int(0);
                out.push(b.assign(&counter, zero));
                let current = b.cell(&counter);
                let limit = b.int(*bound);
                let cond = b.binary(BinaryOp::Lt, current, limit);
                let mut body = build_stmts(b, body, depth + 1, dir);
                let current = b.cell(&counter);
                let one = b.int(1);
                let next = b.binary(BinaryOp::Add, current, one);
                body.push(b.assign(&counter, next));
                out.push(b.while_(cond, body));
            }
            GenStmt::Table => out.push(b.table()),
            GenStmt::Export(target) => out.push(b.export(&export_path(dir, *target))),
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn backends_agree_on_generated_programs(stmts in vec(stmt(), 1..8)) {
        let interner = StringInterner::new();
        let dir = tempfile::tempdir().unwrap();
        let mut b = ProgramBuilder::new(&interner);
        let mut body = build_stmts(&mut b, &stmts, 0, dir.path());
        body.push(b.table());
        body.push(b.export(&export_path(dir.path(), 0)));
        let program = b.finish(body);

        let (both, files) = run_both_exporting(&program, &interner, dir.path());
        prop_assert!(!files.is_empty());
        prop_assert_eq!(both.interp.status, RunStatus::Success);
        prop_assert!(both.jit.ir_text.is_some());
        prop_assert!(both.codes().iter().all(cell_diagnostic::ErrorCode::is_runtime_error));
    }
}
