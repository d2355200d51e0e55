// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Parser for the sort clause: comma-separated `[+|-]fieldname` terms.
//!
//! Any catalog field is orderable by its natural comparison, so sort
//! validation only checks that the field exists.

use crate::ast::{SortDirection, SortTerm};
use crate::catalog::Catalog;
use crate::error::{QueryError, Result};

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a raw sort string against the catalog, preserving term order.
///
/// Empty input (and empty segments) yield no terms; an empty sequence means
/// no ordering is applied and any default order is the adapter's concern.
pub fn parse_sort(catalog: &Catalog, input: &str) -> Result<Vec<SortTerm>> {
    let mut terms = Vec::new();

    for segment in input.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (direction, name) = match segment.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (
                SortDirection::Asc,
                segment.strip_prefix('+').unwrap_or(segment),
            ),
        };

        if !is_identifier(name) {
            return Err(QueryError::Syntax(format!(
                "invalid sort term \"{segment}\""
            )));
        }

        if !catalog.contains(name) {
            return Err(QueryError::UnknownField(name.to_string()));
        }

        terms.push(SortTerm {
            field: name.to_string(),
            direction,
        });
    }

    Ok(terms)
}
