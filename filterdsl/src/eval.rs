// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Reference in-memory adapter: evaluates a compiled [`Query`] against rows.
//!
//! This is the adapter side of the compiler boundary. The compiler only
//! produces the IR; this module shows one consumer of it and backs the
//! integration tests. A storage-backed adapter would translate the same IR
//! into its own query language instead.
//!
//! Trees reaching this module are catalog-validated by construction, so type
//! mismatches between cells and values simply fail the comparison rather
//! than being re-reported.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::ast::{CompareOp, Expr, Query, SortDirection, Value};

/// One cell of a row. `Null` stands for an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Timestamp(DateTime<FixedOffset>),
    Null,
}

/// A row is a field-name → cell mapping. Fields missing from the map are
/// treated as `Null`.
pub type Row = HashMap<String, Cell>;

/// Filter and sort rows according to the compiled query.
pub fn apply(query: &Query, rows: Vec<Row>) -> Vec<Row> {
    let mut rows: Vec<Row> = match &query.filter {
        Some(expr) => rows.into_iter().filter(|row| matches(expr, row)).collect(),
        None => rows,
    };

    if !query.sort.is_empty() {
        rows.sort_by(|a, b| {
            for term in &query.sort {
                let ca = cell(a, &term.field);
                let cb = cell(b, &term.field);
                let ord = cmp_cells(ca, cb);
                let ord = match term.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    rows
}

/// Evaluate a filter expression against one row.
pub fn matches(expr: &Expr, row: &Row) -> bool {
    match expr {
        Expr::And { left, right } => matches(left, row) && matches(right, row),
        Expr::Or { left, right } => matches(left, row) || matches(right, row),
        Expr::Comparison {
            field,
            op,
            negated,
            value,
        } => {
            let result = compare(cell(row, field), *op, value.as_ref(), row);
            result != *negated
        }
    }
}

fn cell<'a>(row: &'a Row, field: &str) -> &'a Cell {
    row.get(field).unwrap_or(&Cell::Null)
}

fn compare(lhs: &Cell, op: CompareOp, value: Option<&Value>, row: &Row) -> bool {
    if op == CompareOp::IsNull {
        return *lhs == Cell::Null;
    }

    // Resolve a field reference to the other column's cell.
    let rhs = match value {
        Some(Value::Field { name }) => cell(row, name).clone(),
        Some(v) => value_to_cell(v),
        None => return false,
    };

    // Null never satisfies an ordinary comparison, not even `!=`.
    if *lhs == Cell::Null || rhs == Cell::Null {
        return false;
    }

    match op {
        CompareOp::Eq => *lhs == rhs,
        CompareOp::NotEq => *lhs != rhs,
        CompareOp::Lt => cmp_cells(lhs, &rhs) == Ordering::Less,
        CompareOp::Lte => cmp_cells(lhs, &rhs) != Ordering::Greater,
        CompareOp::Gt => cmp_cells(lhs, &rhs) == Ordering::Greater,
        CompareOp::Gte => cmp_cells(lhs, &rhs) != Ordering::Less,
        CompareOp::Contains => with_text(lhs, &rhs, |l, r| l.contains(r)),
        CompareOp::IContains => {
            with_text(lhs, &rhs, |l, r| l.to_lowercase().contains(&r.to_lowercase()))
        }
        CompareOp::StartsWith => with_text(lhs, &rhs, |l, r| l.starts_with(r)),
        CompareOp::IStartsWith => {
            with_text(lhs, &rhs, |l, r| l.to_lowercase().starts_with(&r.to_lowercase()))
        }
        CompareOp::EndsWith => with_text(lhs, &rhs, |l, r| l.ends_with(r)),
        CompareOp::IEndsWith => {
            with_text(lhs, &rhs, |l, r| l.to_lowercase().ends_with(&r.to_lowercase()))
        }
        CompareOp::IsNull => unreachable!("handled above"),
    }
}

fn with_text(lhs: &Cell, rhs: &Cell, f: impl Fn(&str, &str) -> bool) -> bool {
    match (lhs, rhs) {
        (Cell::Str(l), Cell::Str(r)) => f(l, r),
        _ => false,
    }
}

fn value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Int { value } => Cell::Int(*value),
        Value::Float { value } => Cell::Float(*value),
        Value::Str { value } => Cell::Str(value.clone()),
        Value::Bool { value } => Cell::Bool(*value),
        Value::Timestamp { value } => Cell::Timestamp(*value),
        // Field references are resolved by the caller before conversion.
        Value::Field { .. } => Cell::Null,
    }
}

/// Total order over cells for sorting. `Null` sorts before every value;
/// cells of different types compare by type rank so the sort stays total.
fn cmp_cells(a: &Cell, b: &Cell) -> Ordering {
    fn rank(c: &Cell) -> u8 {
        match c {
            Cell::Null => 0,
            Cell::Bool(_) => 1,
            Cell::Int(_) => 2,
            Cell::Float(_) => 3,
            Cell::Str(_) => 4,
            Cell::Timestamp(_) => 5,
        }
    }

    match (a, b) {
        (Cell::Int(x), Cell::Int(y)) => x.cmp(y),
        (Cell::Float(x), Cell::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Cell::Str(x), Cell::Str(y)) => x.cmp(y),
        (Cell::Bool(x), Cell::Bool(y)) => x.cmp(y),
        (Cell::Timestamp(x), Cell::Timestamp(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
