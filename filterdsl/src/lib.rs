// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! filterdsl — a filter/sort query DSL compiler for HTTP APIs.
//!
//! Compiles two request-supplied strings (a filter expression and a sort
//! clause) into a typed, backend-independent IR, validated against a
//! read-only field catalog. Executing the IR against a data store is the
//! adapter's job; [`eval`] ships a reference in-memory adapter.
//!
//! # Syntax
//!
//! ```text
//! age = 132
//! name = 'tortoise' and age >= 100
//! name = 'tortoise' or name = 'dog' and age > 1
//! name not eq 'dog'
//! favorite_food isnull
//! created >= '2024-01-15T00:00:00+00:00'
//! ```
//!
//! Sort clause: `-legs,+name` (comma-separated, `-` descending, `+`/none
//! ascending).
//!
//! # Operators
//!
//! | Operator | Alias | Meaning | Negatable |
//! |----------|-------|---------|-----------|
//! | `=` | `eq` | exact match | alias only |
//! | `!=` | | not equal | no |
//! | `<` `<=` `>` `>=` | `lt` `lte` `gt` `gte` | range | no |
//! | `contains` `icontains` | | substring (text fields) | yes |
//! | `startswith` `istartswith` | | prefix (text fields) | yes |
//! | `endswith` `iendswith` | | suffix (text fields) | yes |
//! | `isnull` | | null check (nullable fields), no RHS | yes |
//!
//! `and` binds tighter than `or`; `not` sits between field and operator.
//! String and timestamp literals are single-quoted; numbers and booleans are
//! bare. The right-hand side may also name another field of the same type.
//!
//! # Example
//!
//! ```
//! use filterdsl::{compile, Catalog, FieldDescriptor, FieldType};
//!
//! let catalog = Catalog::new([
//!     FieldDescriptor::new("name", FieldType::String),
//!     FieldDescriptor::new("age", FieldType::Int),
//! ]);
//! let query = compile(&catalog, "name = 'tortoise' and age >= 100", "-age")?;
//! assert!(query.filter.is_some());
//! assert_eq!(query.sort.len(), 1);
//! # Ok::<(), filterdsl::QueryError>(())
//! ```

pub mod ast;
pub mod casts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod sort;

use std::collections::HashMap;

pub use ast::{CompareOp, Expr, Query, SortDirection, SortTerm, Value};
pub use catalog::{Catalog, FieldDescriptor, FieldType};
pub use config::ParamConfig;
pub use error::{Position, QueryError};
pub use parser::parse_filter;
pub use sort::parse_sort;

/// Compile a filter string and a sort string into a [`Query`].
///
/// Compilation is stateless and side-effect-free: it reads only the catalog
/// and allocates a fresh IR per call, so many requests may compile
/// concurrently against one shared catalog.
pub fn compile(catalog: &Catalog, filter: &str, sort: &str) -> Result<Query, QueryError> {
    tracing::debug!(filter, sort, "compiling query");
    Ok(Query {
        filter: parser::parse_filter(catalog, filter)?,
        sort: sort::parse_sort(catalog, sort)?,
    })
}

/// Compile straight from a decoded request parameter map, honoring the
/// configured parameter names. Absent parameters compile to an empty query.
pub fn compile_request(
    catalog: &Catalog,
    config: &ParamConfig,
    params: &HashMap<String, String>,
) -> Result<Query, QueryError> {
    let (filter, sort) = config.extract(params);
    compile(catalog, filter, sort)
}
