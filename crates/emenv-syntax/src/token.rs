//! Token types for lexical analysis
//!
//! Defines the tokens recognized by the reader. Every token keeps the span it
//! was read from so errors can point back into the input.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Payload text: the unescaped body of a string, the name of a symbol,
    /// the name of a keyword without its colon, or the digits of a number
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Integer payload of a `Number` token
    pub fn number(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Number => self.lexeme.parse().ok(),
            _ => None,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// String literal (`"hello"`)
    String,
    /// Decimal integer (`42`, `-4`)
    Number,
    /// `[`
    OpenVector,
    /// `]`
    CloseVector,
    /// `(`
    OpenList,
    /// `)`
    CloseList,
    /// Bare atom that is neither a number nor `nil`
    Symbol,
    /// `:name`
    Keyword,
    /// `.` of a dotted form
    Dot,
    /// `'`
    Quote,
    /// `nil`
    Nil,
    /// End of input
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::OpenVector => "'['",
            TokenKind::CloseVector => "']'",
            TokenKind::OpenList => "'('",
            TokenKind::CloseList => "')'",
            TokenKind::Symbol => "symbol",
            TokenKind::Keyword => "keyword",
            TokenKind::Dot => "'.'",
            TokenKind::Quote => "quote",
            TokenKind::Nil => "nil",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the token back to text the lexer reads as an equivalent token
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write_quoted(f, &self.lexeme),
            TokenKind::Number | TokenKind::Symbol => f.write_str(&self.lexeme),
            TokenKind::Keyword => write!(f, ":{}", self.lexeme),
            TokenKind::OpenVector => f.write_str("["),
            TokenKind::CloseVector => f.write_str("]"),
            TokenKind::OpenList => f.write_str("("),
            TokenKind::CloseList => f.write_str(")"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Quote => f.write_str("'"),
            TokenKind::Nil => f.write_str("nil"),
            TokenKind::Eof => Ok(()),
        }
    }
}

/// Write `value` as a string literal, escaping quotes and backslashes
pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}
