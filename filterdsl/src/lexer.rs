// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Lexer for the filter grammar.
//!
//! Turns raw query text into a token sequence, left to right. Whitespace
//! separates tokens and is otherwise discarded. Lexing is a pure function of
//! the input; the only state is the scan position.

use crate::error::{Position, QueryError, Result};

/// Token classes produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    And,
    Or,
    Not,
    /// Bare identifier: field name, word-alias operator, or boolean literal.
    /// Which one is decided by the parser from context.
    Ident(String),
    /// Symbolic comparison operator, canonical spelling.
    Op(&'static str),
    /// Unquoted numeric literal, raw text preserved for type-directed casting.
    Number(String),
    /// Single-quoted string literal, quotes stripped, content verbatim.
    Str(String),
    LParen,
    RParen,
    Comma,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub position: Position,
}

/// Lexer over a raw filter string.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, ch)| ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scan a single-quoted literal. Content is taken verbatim between the
    /// quotes; there is no escape processing and no nested quoting.
    fn read_string(&mut self) -> Result<Token> {
        let start_pos = self.current_position();
        self.advance(); // consume opening quote
        let content_start = self.pos;

        loop {
            match self.peek() {
                None => {
                    return Err(QueryError::Lex {
                        position: start_pos,
                        reason: "unterminated string literal".to_string(),
                    });
                }
                Some('\'') => {
                    let value = self.input[content_start..self.pos].to_string();
                    self.advance();
                    return Ok(Token {
                        token_type: TokenType::Str(value),
                        position: start_pos,
                    });
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan an optionally signed numeric literal, optional decimal point.
    /// The raw text is preserved; int vs float is decided during casting.
    fn read_number(&mut self) -> Token {
        let start_pos = self.current_position();
        let start = self.pos;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        Token {
            token_type: TokenType::Number(self.input[start..self.pos].to_string()),
            position: start_pos,
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start_pos = self.current_position();
        let start = self.pos;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let value = &self.input[start..self.pos];
        // Connective keywords are exact lowercase spellings.
        let token_type = match value {
            "and" => TokenType::And,
            "or" => TokenType::Or,
            "not" => TokenType::Not,
            _ => TokenType::Ident(value.to_string()),
        };

        Token {
            token_type,
            position: start_pos,
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start_pos = self.current_position();

        match self.peek() {
            None => Ok(Token {
                token_type: TokenType::Eof,
                position: start_pos,
            }),
            Some('\'') => self.read_string(),
            Some(ch) if ch.is_ascii_digit() => Ok(self.read_number()),
            Some('-') | Some('+')
                if self.peek_second().is_some_and(|c| c.is_ascii_digit()) =>
            {
                Ok(self.read_number())
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => Ok(self.read_identifier()),
            Some('(') => {
                self.advance();
                Ok(Token {
                    token_type: TokenType::LParen,
                    position: start_pos,
                })
            }
            Some(')') => {
                self.advance();
                Ok(Token {
                    token_type: TokenType::RParen,
                    position: start_pos,
                })
            }
            Some(',') => {
                self.advance();
                Ok(Token {
                    token_type: TokenType::Comma,
                    position: start_pos,
                })
            }
            Some('=') => {
                self.advance();
                Ok(Token {
                    token_type: TokenType::Op("="),
                    position: start_pos,
                })
            }
            Some('!') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token {
                        token_type: TokenType::Op("!="),
                        position: start_pos,
                    })
                } else {
                    Err(QueryError::Lex {
                        position: start_pos,
                        reason: "expected '=' after '!'".to_string(),
                    })
                }
            }
            // Longest match: two-character spellings win over one-character.
            Some('>') => {
                self.advance();
                let op = if self.peek() == Some('=') {
                    self.advance();
                    ">="
                } else {
                    ">"
                };
                Ok(Token {
                    token_type: TokenType::Op(op),
                    position: start_pos,
                })
            }
            Some('<') => {
                self.advance();
                let op = if self.peek() == Some('=') {
                    self.advance();
                    "<="
                } else {
                    "<"
                };
                Ok(Token {
                    token_type: TokenType::Op(op),
                    position: start_pos,
                })
            }
            Some(ch) => Err(QueryError::Lex {
                position: start_pos,
                reason: format!("unexpected character '{ch}'"),
            }),
        }
    }

    /// Tokenize the whole input. The returned sequence always ends with a
    /// single `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
