// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! IR types: the filter expression tree, sort sequence, and the fixed
//! operator table.
//!
//! These types are the compiler's only output. They are backend-independent
//! and serializable so the integration layer can ship them as JSON.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Comparison operators supported by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,          // =, eq
    NotEq,       // !=
    Lt,          // <, lt
    Gt,          // >, gt
    Lte,         // <=, lte
    Gte,         // >=, gte
    Contains,    // contains
    IContains,   // icontains
    StartsWith,  // startswith
    IStartsWith, // istartswith
    EndsWith,    // endswith
    IEndsWith,   // iendswith
    IsNull,      // isnull
}

/// One spelling of a comparison operator together with its grammar rules.
///
/// Negatability is a property of the spelling, not the operator: `eq` accepts
/// a leading `not` while the equivalent symbol `=` does not.
#[derive(Debug, Clone, Copy)]
pub struct OpSpelling {
    pub spelling: &'static str,
    pub op: CompareOp,
    /// Whether `not` may precede this spelling.
    pub negatable: bool,
    /// Whether the field must be text-capable.
    pub requires_text: bool,
    /// Whether a right-hand side follows. False only for `isnull`.
    pub takes_rhs: bool,
}

/// Every operator spelling the grammar accepts. Word aliases follow the
/// symbols they alias except for negatability.
pub const OP_TABLE: &[OpSpelling] = &[
    OpSpelling { spelling: "=", op: CompareOp::Eq, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "eq", op: CompareOp::Eq, negatable: true, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "!=", op: CompareOp::NotEq, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "<", op: CompareOp::Lt, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "lt", op: CompareOp::Lt, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: ">", op: CompareOp::Gt, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "gt", op: CompareOp::Gt, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "<=", op: CompareOp::Lte, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "lte", op: CompareOp::Lte, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: ">=", op: CompareOp::Gte, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "gte", op: CompareOp::Gte, negatable: false, requires_text: false, takes_rhs: true },
    OpSpelling { spelling: "contains", op: CompareOp::Contains, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "icontains", op: CompareOp::IContains, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "startswith", op: CompareOp::StartsWith, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "istartswith", op: CompareOp::IStartsWith, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "endswith", op: CompareOp::EndsWith, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "iendswith", op: CompareOp::IEndsWith, negatable: true, requires_text: true, takes_rhs: true },
    OpSpelling { spelling: "isnull", op: CompareOp::IsNull, negatable: true, requires_text: false, takes_rhs: false },
];

/// Look up an operator spelling (symbolic or word alias).
pub fn lookup_op(spelling: &str) -> Option<&'static OpSpelling> {
    OP_TABLE.iter().find(|s| s.spelling == spelling)
}

/// Typed right-hand-side value of a comparison.
///
/// `Field` references another catalog field, letting a comparison match two
/// columns against each other instead of a column against a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Int { value: i64 },
    Float { value: f64 },
    Str { value: String },
    Bool { value: bool },
    Timestamp { value: DateTime<FixedOffset> },
    Field { name: String },
}

/// Expression node in the filter tree.
///
/// Every `Comparison` has been validated against the field catalog before it
/// enters the tree; downstream consumers never re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        field: String,
        op: CompareOp,
        negated: bool,
        /// Absent only for `isnull`.
        value: Option<Value>,
    },
}

impl CompareOp {
    /// Canonical spelling. Symbols are preferred; word aliases only exist
    /// where no symbol does.
    pub fn canonical(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Lte => "<=",
            CompareOp::Gte => ">=",
            CompareOp::Contains => "contains",
            CompareOp::IContains => "icontains",
            CompareOp::StartsWith => "startswith",
            CompareOp::IStartsWith => "istartswith",
            CompareOp::EndsWith => "endswith",
            CompareOp::IEndsWith => "iendswith",
            CompareOp::IsNull => "isnull",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int { value } => write!(f, "{value}"),
            // Debug formatting keeps the decimal point so the text re-lexes
            // as a float literal.
            Value::Float { value } => write!(f, "{value:?}"),
            Value::Str { value } => write!(f, "'{value}'"),
            Value::Bool { value } => write!(f, "{value}"),
            Value::Timestamp { value } => write!(f, "'{}'", value.to_rfc3339()),
            Value::Field { name } => f.write_str(name),
        }
    }
}

impl std::fmt::Display for Expr {
    /// Renders canonical filter text that re-parses to a structurally
    /// identical tree. A negated equality must use the `eq` alias since the
    /// symbol rejects negation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::And { left, right } => write!(f, "{left} and {right}"),
            Expr::Or { left, right } => write!(f, "{left} or {right}"),
            Expr::Comparison {
                field,
                op,
                negated,
                value,
            } => {
                let spelling = if *negated && *op == CompareOp::Eq {
                    "eq"
                } else {
                    op.canonical()
                };
                write!(f, "{field} ")?;
                if *negated {
                    write!(f, "not ")?;
                }
                write!(f, "{spelling}")?;
                if let Some(value) = value {
                    write!(f, " {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Sort direction for one sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `[+|-]field` segment of the sort clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTerm {
    pub field: String,
    pub direction: SortDirection,
}

impl std::fmt::Display for SortTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            SortDirection::Asc => f.write_str(&self.field),
            SortDirection::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// The compiled query artifact handed to an execution adapter.
///
/// Produced fresh per request; owns all of its nodes. The only state shared
/// across compilations is the read-only catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filter: Option<Expr>,
    pub sort: Vec<SortTerm>,
}
