// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for filter expressions.
//!
//! Grammar, lowest to highest precedence:
//!   expr       = or_expr ;
//!   or_expr    = and_expr { "or" and_expr } ;
//!   and_expr   = comparison { "and" comparison } ;
//!   comparison = field [ "not" ] operator [ rhs ] ;
//!
//! The right-hand side is omitted only for `isnull`. There is no grouping
//! construct; chains of the same connective associate left to right. Every
//! comparison is validated against the field catalog as it is built, so a
//! returned tree is well-typed by construction.

use crate::ast::{lookup_op, Expr, OpSpelling, Value};
use crate::casts;
use crate::catalog::{Catalog, FieldDescriptor};
use crate::error::{QueryError, Result};
use crate::lexer::{Lexer, Token, TokenType};

/// Parse a raw filter string against the catalog.
///
/// Empty or blank input compiles to `None`: no filter is not an error.
pub fn parse_filter(catalog: &Catalog, input: &str) -> Result<Option<Expr>> {
    let tokens = Lexer::new(input).tokenize()?;
    if matches!(tokens[0].token_type, TokenType::Eof) {
        return Ok(None);
    }

    let mut parser = FilterParser {
        catalog,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_or_expr()?;

    if !matches!(parser.current().token_type, TokenType::Eof) {
        return Err(QueryError::Syntax(format!(
            "unexpected token after expression at {}",
            parser.current().position
        )));
    }

    Ok(Some(expr))
}

struct FilterParser<'a> {
    catalog: &'a Catalog,
    tokens: Vec<Token>,
    pos: usize,
}

impl FilterParser<'_> {
    // The token sequence always ends with Eof and advance() never moves past
    // it, so indexing is in bounds.
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if !matches!(self.current().token_type, TokenType::Eof) {
            self.pos += 1;
        }
    }

    fn match_token(&mut self, expected: &TokenType) -> bool {
        if std::mem::discriminant(&self.current().token_type) == std::mem::discriminant(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_and_expr()?;

        while self.match_token(&TokenType::Or) {
            let right = self.parse_and_expr()?;
            left = Expr::Or {
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;

        while self.match_token(&TokenType::And) {
            let right = self.parse_comparison()?;
            left = Expr::And {
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let field_token = self.current().clone();
        let field_name = match &field_token.token_type {
            TokenType::Ident(name) => name.clone(),
            _ => {
                return Err(QueryError::Syntax(format!(
                    "expected field name at {}",
                    field_token.position
                )));
            }
        };
        self.advance();

        let descriptor = self
            .catalog
            .field(&field_name)
            .ok_or_else(|| QueryError::UnknownField(field_name.clone()))?;

        let negated = self.match_token(&TokenType::Not);

        let op_token = self.current().clone();
        let op_spec = match &op_token.token_type {
            TokenType::Op(symbol) => lookup_op(symbol),
            TokenType::Ident(word) => lookup_op(word),
            _ => None,
        }
        .ok_or_else(|| {
            QueryError::Syntax(format!("expected operator at {}", op_token.position))
        })?;
        self.advance();

        // Negatability is per spelling: "eq" accepts "not", "=" does not.
        if negated && !op_spec.negatable {
            return Err(QueryError::NonNegatableOperator(op_spec.spelling.to_string()));
        }

        if op_spec.requires_text && !descriptor.text_capable {
            return Err(QueryError::TypeMismatch {
                field: field_name,
                reason: format!(
                    "operator \"{}\" is only allowed with text fields",
                    op_spec.spelling
                ),
            });
        }

        let value = if op_spec.takes_rhs {
            Some(self.parse_rhs(descriptor, op_spec)?)
        } else {
            // isnull: no right-hand side, field must be nullable.
            if !descriptor.nullable {
                return Err(QueryError::TypeMismatch {
                    field: field_name,
                    reason: "field is not nullable".to_string(),
                });
            }
            None
        };

        Ok(Expr::Comparison {
            field: field_name,
            op: op_spec.op,
            negated,
            value,
        })
    }

    /// Parse and validate the right-hand side of a comparison: a literal cast
    /// to the field's type, or a reference to a same-typed catalog field.
    fn parse_rhs(&mut self, field: &FieldDescriptor, op_spec: &OpSpelling) -> Result<Value> {
        let token = self.current().clone();
        match &token.token_type {
            TokenType::Str(raw) => {
                self.advance();
                casts::cast_quoted(field, raw)
            }
            TokenType::Number(raw) => {
                self.advance();
                casts::cast_number(field, raw)
            }
            TokenType::Ident(word) => {
                self.advance();
                if let Some(value) = casts::cast_bool(word) {
                    if field.field_type != crate::catalog::FieldType::Bool {
                        return Err(QueryError::TypeMismatch {
                            field: field.name.clone(),
                            reason: format!(
                                "expected {} value, found bool literal",
                                field.field_type
                            ),
                        });
                    }
                    return Ok(value);
                }
                // Any other bare identifier is a field reference.
                let rhs = self
                    .catalog
                    .field(word)
                    .ok_or_else(|| QueryError::UnknownField(word.clone()))?;
                if rhs.field_type != field.field_type {
                    return Err(QueryError::TypeMismatch {
                        field: field.name.clone(),
                        reason: format!(
                            "cannot compare {} field with {} field \"{}\"",
                            field.field_type, rhs.field_type, rhs.name
                        ),
                    });
                }
                Ok(Value::Field {
                    name: word.clone(),
                })
            }
            _ => Err(QueryError::Syntax(format!(
                "expected value after operator \"{}\" at {}",
                op_spec.spelling, token.position
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use crate::catalog::{FieldDescriptor, FieldType};

    fn catalog() -> Catalog {
        Catalog::new([
            FieldDescriptor::new("name", FieldType::String),
            FieldDescriptor::new("age", FieldType::Int),
            FieldDescriptor::new("legs", FieldType::Int),
            FieldDescriptor::new("weight", FieldType::Float),
            FieldDescriptor::new("alive", FieldType::Bool),
            FieldDescriptor::new("favorite_food", FieldType::String).nullable(),
            FieldDescriptor::new("created", FieldType::Timestamp),
        ])
    }

    fn parse(input: &str) -> Result<Option<Expr>> {
        parse_filter(&catalog(), input)
    }

    fn parse_one(input: &str) -> Expr {
        parse(input).expect("should parse").expect("non-empty")
    }

    #[test]
    fn test_simple_int_comparison() {
        let expr = parse_one("age = 132");
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "age".to_string(),
                op: CompareOp::Eq,
                negated: false,
                value: Some(Value::Int { value: 132 }),
            }
        );
    }

    #[test]
    fn test_and_expression() {
        let expr = parse_one("name = 'tortoise' and age >= 100");
        match expr {
            Expr::And { left, right } => {
                assert!(matches!(
                    *left,
                    Expr::Comparison { op: CompareOp::Eq, .. }
                ));
                assert!(matches!(
                    *right,
                    Expr::Comparison { op: CompareOp::Gte, .. }
                ));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse_one("name = 'tortoise' or name = 'dog' and age > 1");
        match expr {
            Expr::Or { left, right } => {
                assert!(matches!(*left, Expr::Comparison { .. }));
                assert!(matches!(*right, Expr::And { .. }));
            }
            other => panic!("expected Or at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_same_connective_associates_left() {
        let expr = parse_one("age > 1 and age < 5 and legs = 4");
        match expr {
            Expr::And { left, right } => {
                assert!(matches!(*left, Expr::And { .. }));
                assert!(matches!(*right, Expr::Comparison { .. }));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_word_alias_eq_is_negatable() {
        let expr = parse_one("name not eq 'dog'");
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "name".to_string(),
                op: CompareOp::Eq,
                negated: true,
                value: Some(Value::Str { value: "dog".to_string() }),
            }
        );
    }

    #[test]
    fn test_symbolic_eq_rejects_negation() {
        let err = parse("name not = 'dog'").unwrap_err();
        assert_eq!(err, QueryError::NonNegatableOperator("=".to_string()));
    }

    #[test]
    fn test_comparison_aliases() {
        for (input, op) in [
            ("age lt 5", CompareOp::Lt),
            ("age lte 5", CompareOp::Lte),
            ("age gt 5", CompareOp::Gt),
            ("age gte 5", CompareOp::Gte),
        ] {
            match parse_one(input) {
                Expr::Comparison { op: parsed, negated, .. } => {
                    assert_eq!(parsed, op, "{input}");
                    assert!(!negated);
                }
                other => panic!("expected Comparison, got {other:?}"),
            }
        }
        // Aliases of non-negatable symbols are themselves non-negatable.
        assert_eq!(
            parse("age not gt 5").unwrap_err(),
            QueryError::NonNegatableOperator("gt".to_string())
        );
    }

    #[test]
    fn test_isnull_requires_nullable_field() {
        let expr = parse_one("favorite_food isnull");
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "favorite_food".to_string(),
                op: CompareOp::IsNull,
                negated: false,
                value: None,
            }
        );

        let expr = parse_one("favorite_food not isnull");
        assert!(matches!(
            expr,
            Expr::Comparison { op: CompareOp::IsNull, negated: true, value: None, .. }
        ));

        let err = parse("name isnull").unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_text_operator_on_non_text_field() {
        let err = parse("age contains 5").unwrap_err();
        match err {
            QueryError::TypeMismatch { field, reason } => {
                assert_eq!(field, "age");
                assert!(reason.contains("contains"));
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_text_operators_on_text_field() {
        for (input, op, negated) in [
            ("name contains 'tor'", CompareOp::Contains, false),
            ("name not icontains 'TOR'", CompareOp::IContains, true),
            ("name startswith 'tor'", CompareOp::StartsWith, false),
            ("name istartswith 'Tor'", CompareOp::IStartsWith, false),
            ("name not endswith 'ise'", CompareOp::EndsWith, true),
            ("name iendswith 'ISE'", CompareOp::IEndsWith, false),
        ] {
            match parse_one(input) {
                Expr::Comparison { op: parsed, negated: n, .. } => {
                    assert_eq!(parsed, op, "{input}");
                    assert_eq!(n, negated, "{input}");
                }
                other => panic!("expected Comparison, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            parse("ghost = 1").unwrap_err(),
            QueryError::UnknownField("ghost".to_string())
        );
    }

    #[test]
    fn test_field_reference_rhs() {
        let expr = parse_one("age = legs");
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "age".to_string(),
                op: CompareOp::Eq,
                negated: false,
                value: Some(Value::Field { name: "legs".to_string() }),
            }
        );

        // Referenced field must exist and share the type.
        assert_eq!(
            parse("age = ghost").unwrap_err(),
            QueryError::UnknownField("ghost".to_string())
        );
        assert!(matches!(
            parse("age = name").unwrap_err(),
            QueryError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_bool_literal() {
        let expr = parse_one("alive = true");
        assert!(matches!(
            expr,
            Expr::Comparison { value: Some(Value::Bool { value: true }), .. }
        ));

        // Case-sensitive spellings; "True" falls through to field reference.
        assert_eq!(
            parse("alive = True").unwrap_err(),
            QueryError::UnknownField("True".to_string())
        );

        assert!(matches!(
            parse("age = true").unwrap_err(),
            QueryError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_timestamp_comparison() {
        let expr = parse_one("created >= '2024-01-15T00:00:00+00:00'");
        assert!(matches!(
            expr,
            Expr::Comparison { op: CompareOp::Gte, value: Some(Value::Timestamp { .. }), .. }
        ));

        assert!(matches!(
            parse("created >= 'yesterday'").unwrap_err(),
            QueryError::Cast { .. }
        ));
    }

    #[test]
    fn test_empty_input_compiles_to_none() {
        assert_eq!(parse("").expect("should parse"), None);
        assert_eq!(parse("   ").expect("should parse"), None);
    }

    #[test]
    fn test_syntax_errors() {
        // Missing value.
        assert!(matches!(parse("age = ").unwrap_err(), QueryError::Syntax(_)));
        // Missing operator.
        assert!(matches!(parse("age 132").unwrap_err(), QueryError::Syntax(_)));
        // No grouping construct in the grammar.
        assert!(matches!(
            parse("(age = 1)").unwrap_err(),
            QueryError::Syntax(_)
        ));
        // Trailing tokens.
        assert!(matches!(
            parse("age = 1 name").unwrap_err(),
            QueryError::Syntax(_)
        ));
        // "not" belongs between field and operator, not before the field.
        assert!(matches!(
            parse("not age = 1").unwrap_err(),
            QueryError::Syntax(_)
        ));
        // Dangling connective.
        assert!(matches!(
            parse("age = 1 and").unwrap_err(),
            QueryError::Syntax(_)
        ));
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(matches!(
            parse("name = 'abc").unwrap_err(),
            QueryError::Lex { .. }
        ));
    }
}
