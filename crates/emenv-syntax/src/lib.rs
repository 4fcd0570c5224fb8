//! Emenv Syntax - reader for nested-list data literals
//!
//! This library reads the Lisp-flavoured data syntax shared by emenv
//! manifests, ELPA `archive-contents` indices and the persisted install list:
//! - Tokenization (`lexer`)
//! - Tree building (`parser`)
//! - A single generic node type (`ast`) with canonical rendering
//!
//! Nothing here evaluates code; the reader only materialises data.
//!
//! # Example
//!
//! ```
//! use emenv_syntax::{parse_document, Node};
//!
//! let node = parse_document("(1 (magit . [(3 0) nil \"git\" tar]))").unwrap();
//! assert_eq!(node.as_list().unwrap()[0], Node::Number(1));
//! ```

/// Reader version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::Node;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse_all, Parser};
pub use span::Span;
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Errors raised while reading text into nodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unterminated string starting at byte {}", .span.start)]
    UnterminatedString { span: Span },

    #[error("dangling list: '(' at byte {} is never closed", .span.start)]
    DanglingList { span: Span },

    #[error("dangling vector: '[' at byte {} is never closed", .span.start)]
    DanglingVector { span: Span },

    #[error("stray list close ')' at byte {}", .span.start)]
    StrayListClose { span: Span },

    #[error("stray vector close ']' at byte {}", .span.start)]
    StrayVectorClose { span: Span },

    #[error("trailing tokens after the top-level form at byte {}", .span.start)]
    TrailingTokens { span: Span },

    #[error("unexpected {kind} at byte {}", .span.start)]
    UnknownToken { kind: TokenKind, span: Span },
}

impl SyntaxError {
    /// Location the error refers to
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::UnterminatedString { span }
            | SyntaxError::DanglingList { span }
            | SyntaxError::DanglingVector { span }
            | SyntaxError::StrayListClose { span }
            | SyntaxError::StrayVectorClose { span }
            | SyntaxError::TrailingTokens { span }
            | SyntaxError::UnknownToken { span, .. } => *span,
        }
    }
}

/// Read every top-level form of `source`
pub fn parse_forms(source: &str) -> Result<Vec<Node>, SyntaxError> {
    Parser::new(tokenize(source)?).parse_many()
}

/// Read a document that must consist of exactly one top-level form
pub fn parse_document(source: &str) -> Result<Node, SyntaxError> {
    parse_all(tokenize(source)?)
}
