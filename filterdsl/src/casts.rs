// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Literal casting: turns literal token text into a typed [`Value`] under the
//! field type resolved from context.
//!
//! Quoting determines the literal's lexical class before any type checking:
//! an unquoted token where a string/timestamp is expected (or the reverse) is
//! a syntax error, while text of the right class that fails to parse as the
//! expected type is a cast error.

use chrono::DateTime;

use crate::ast::Value;
use crate::catalog::{FieldDescriptor, FieldType};
use crate::error::{QueryError, Result};

/// Cast a single-quoted literal against the field's declared type.
pub fn cast_quoted(field: &FieldDescriptor, raw: &str) -> Result<Value> {
    match field.field_type {
        FieldType::String => Ok(Value::Str {
            value: raw.to_string(),
        }),
        FieldType::Timestamp => {
            // ISO-8601 with offset, e.g. '2024-01-15T00:00:00+00:00'.
            let value = DateTime::parse_from_rfc3339(raw).map_err(|_| QueryError::Cast {
                field: field.name.clone(),
                raw: raw.to_string(),
                expected: FieldType::Timestamp,
            })?;
            Ok(Value::Timestamp { value })
        }
        FieldType::Int | FieldType::Float | FieldType::Bool => Err(QueryError::Syntax(format!(
            "field \"{}\" expects an unquoted {} literal, found quoted string",
            field.name, field.field_type
        ))),
    }
}

/// Cast an unquoted numeric literal against the field's declared type.
pub fn cast_number(field: &FieldDescriptor, raw: &str) -> Result<Value> {
    match field.field_type {
        FieldType::Int => {
            let value = raw
                .parse::<i64>()
                .map_err(|_| QueryError::Cast {
                    field: field.name.clone(),
                    raw: raw.to_string(),
                    expected: FieldType::Int,
                })?;
            Ok(Value::Int { value })
        }
        FieldType::Float => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| QueryError::Cast {
                    field: field.name.clone(),
                    raw: raw.to_string(),
                    expected: FieldType::Float,
                })?;
            Ok(Value::Float { value })
        }
        FieldType::String | FieldType::Timestamp => Err(QueryError::Syntax(format!(
            "field \"{}\" expects a quoted {} literal, found number",
            field.name, field.field_type
        ))),
        FieldType::Bool => Err(QueryError::Syntax(format!(
            "field \"{}\" expects a bool literal (true or false), found number",
            field.name
        ))),
    }
}

/// Resolve a bare `true`/`false` identifier. Spellings are case-sensitive;
/// anything else is not a boolean literal.
pub fn cast_bool(raw: &str) -> Option<Value> {
    match raw {
        "true" => Some(Value::Bool { value: true }),
        "false" => Some(Value::Bool { value: false }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, field_type)
    }

    #[test]
    fn test_cast_int() {
        let age = field("age", FieldType::Int);
        assert_eq!(cast_number(&age, "132").expect("casts"), Value::Int { value: 132 });
        assert_eq!(cast_number(&age, "-7").expect("casts"), Value::Int { value: -7 });
    }

    #[test]
    fn test_int_rejects_decimal_point() {
        let age = field("age", FieldType::Int);
        let err = cast_number(&age, "18.5").unwrap_err();
        match err {
            QueryError::Cast { field, raw, expected } => {
                assert_eq!(field, "age");
                assert_eq!(raw, "18.5");
                assert_eq!(expected, FieldType::Int);
            }
            other => panic!("expected Cast error, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_float_accepts_integer_text() {
        let weight = field("weight", FieldType::Float);
        assert_eq!(
            cast_number(&weight, "3.25").expect("casts"),
            Value::Float { value: 3.25 }
        );
        assert_eq!(
            cast_number(&weight, "3").expect("casts"),
            Value::Float { value: 3.0 }
        );
    }

    #[test]
    fn test_cast_string_requires_quotes() {
        let name = field("name", FieldType::String);
        assert_eq!(
            cast_quoted(&name, "tortoise").expect("casts"),
            Value::Str { value: "tortoise".to_string() }
        );
        // Unquoted number where a string is expected: wrong lexical class.
        assert!(matches!(
            cast_number(&name, "5").unwrap_err(),
            QueryError::Syntax(_)
        ));
    }

    #[test]
    fn test_quoted_number_is_syntax_error() {
        let age = field("age", FieldType::Int);
        assert!(matches!(
            cast_quoted(&age, "132").unwrap_err(),
            QueryError::Syntax(_)
        ));
    }

    #[test]
    fn test_cast_timestamp() {
        let created = field("created", FieldType::Timestamp);
        let v = cast_quoted(&created, "2024-01-15T00:00:00+00:00").expect("casts");
        match v {
            Value::Timestamp { value } => assert_eq!(value.timestamp(), 1705276800),
            other => panic!("expected Timestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_timestamp_is_cast_error() {
        let created = field("created", FieldType::Timestamp);
        // Missing offset: ISO-8601 with offset is required.
        let err = cast_quoted(&created, "2024-01-15").unwrap_err();
        assert!(matches!(err, QueryError::Cast { expected: FieldType::Timestamp, .. }));

        // Unquoted where a timestamp is expected: syntax, not cast.
        assert!(matches!(
            cast_number(&created, "1705276800").unwrap_err(),
            QueryError::Syntax(_)
        ));
    }

    #[test]
    fn test_bool_spellings_are_case_sensitive() {
        assert_eq!(cast_bool("true"), Some(Value::Bool { value: true }));
        assert_eq!(cast_bool("false"), Some(Value::Bool { value: false }));
        assert_eq!(cast_bool("True"), None);
        assert_eq!(cast_bool("FALSE"), None);
    }
}
