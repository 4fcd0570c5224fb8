//! Parsing (tokens to tree)
//!
//! Recursive descent with one token of lookahead. Lists and vectors loop over
//! child forms until their close token; every other token is a leaf.

use crate::ast::Node;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::SyntaxError;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Parser state for building trees from tokens
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    /// Where input ends, for errors raised after the last token
    end: Span,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| Span::new(t.span.end, t.span.end))
            .unwrap_or_default();
        Self {
            tokens: tokens.into_iter().peekable(),
            end,
        }
    }

    /// Parse the next top-level form. Returns `None` once only `Eof` remains.
    pub fn parse_one(&mut self) -> Result<Option<Node>, SyntaxError> {
        if self.is_at_end() {
            return Ok(None);
        }
        self.parse_form().map(Some)
    }

    /// Parse every remaining top-level form
    pub fn parse_many(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse_one()? {
            forms.push(form);
        }
        Ok(forms)
    }

    /// True when no tokens other than `Eof` remain
    pub fn is_at_end(&mut self) -> bool {
        matches!(
            self.tokens.peek().map(|t| t.kind),
            None | Some(TokenKind::Eof)
        )
    }

    fn parse_form(&mut self) -> Result<Node, SyntaxError> {
        let token = match self.tokens.next() {
            Some(token) => token,
            None => {
                return Err(SyntaxError::UnknownToken {
                    kind: TokenKind::Eof,
                    span: self.end,
                })
            }
        };

        match token.kind {
            TokenKind::Number => match token.number() {
                Some(n) => Ok(Node::Number(n)),
                None => Err(SyntaxError::UnknownToken {
                    kind: token.kind,
                    span: token.span,
                }),
            },
            TokenKind::Nil => Ok(Node::Nil),
            TokenKind::String => Ok(Node::String(token.lexeme)),
            TokenKind::Symbol => Ok(Node::Symbol(token.lexeme)),
            TokenKind::Keyword => Ok(Node::Keyword(token.lexeme)),
            TokenKind::Dot => Ok(Node::Dot),
            TokenKind::OpenList => self
                .parse_sequence(TokenKind::CloseList, token.span)
                .map(Node::List),
            TokenKind::OpenVector => self
                .parse_sequence(TokenKind::CloseVector, token.span)
                .map(Node::Vector),
            TokenKind::CloseList => Err(SyntaxError::StrayListClose { span: token.span }),
            TokenKind::CloseVector => Err(SyntaxError::StrayVectorClose { span: token.span }),
            // Quoted forms are not part of the data syntax
            TokenKind::Quote | TokenKind::Eof => Err(SyntaxError::UnknownToken {
                kind: token.kind,
                span: token.span,
            }),
        }
    }

    /// Parse children until `close`; `open` is the span of the opener
    fn parse_sequence(&mut self, close: TokenKind, open: Span) -> Result<Vec<Node>, SyntaxError> {
        let mut children = Vec::new();

        loop {
            match self.tokens.peek().map(|t| t.kind) {
                Some(kind) if kind == close => {
                    self.tokens.next();
                    return Ok(children);
                }
                None | Some(TokenKind::Eof) => {
                    return Err(if close == TokenKind::CloseVector {
                        SyntaxError::DanglingVector { span: open }
                    } else {
                        SyntaxError::DanglingList { span: open }
                    });
                }
                Some(_) => children.push(self.parse_form()?),
            }
        }
    }

    /// Consume the parser, requiring that nothing but `Eof` is left
    fn finish(mut self) -> Result<(), SyntaxError> {
        match self.tokens.next() {
            Some(token) if token.kind != TokenKind::Eof => {
                Err(SyntaxError::TrailingTokens { span: token.span })
            }
            _ => Ok(()),
        }
    }
}

/// Parse exactly one top-level form, with nothing after it but `Eof`
pub fn parse_all(tokens: Vec<Token>) -> Result<Node, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let node = match parser.parse_one()? {
        Some(node) => node,
        None => {
            return Err(SyntaxError::UnknownToken {
                kind: TokenKind::Eof,
                span: parser.end,
            })
        }
    };
    parser.finish()?;
    Ok(node)
}
