// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for query compilation.
//!
//! Every failure mode is a distinct variant so the integration layer can map
//! kinds to protocol-specific responses. Compilation stops at the first error;
//! malformed input is deterministic and never retried.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::FieldType;

/// Source location of a token or lexing failure, 1-based line/column plus
/// byte offset into the raw query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Compilation error. All variants are caller errors, non-fatal to the
/// process, and surfaced synchronously from the compile attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Unterminated quoted literal or a character outside every token class.
    #[error("{reason} at {position}")]
    Lex { position: Position, reason: String },

    /// Grammar violation: unexpected token, premature end of input, or a
    /// literal with the wrong quoting for its context.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Field name not present in the catalog (filter or sort).
    #[error("unknown field \"{0}\"")]
    UnknownField(String),

    /// `not` applied to an operator spelling that is not negatable.
    #[error("operator \"{0}\" does not support negation")]
    NonNegatableOperator(String),

    /// Operator/field capability mismatch or a right-hand side whose type
    /// disagrees with the field's declared type.
    #[error("type mismatch on field \"{field}\": {reason}")]
    TypeMismatch { field: String, reason: String },

    /// Literal text in the right lexical class but unparseable as the
    /// expected type, e.g. a malformed timestamp.
    #[error("cannot cast \"{raw}\" to {expected} for field \"{field}\"")]
    Cast {
        field: String,
        raw: String,
        expected: FieldType,
    },
}

pub type Result<T> = std::result::Result<T, QueryError>;
