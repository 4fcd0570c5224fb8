//! Lexical analysis (tokenization)
//!
//! The lexer converts manifest, index and install-list text into a flat
//! stream of tokens. Comments run from `;` to the end of the line and are
//! dropped together with whitespace.

use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::SyntaxError;

/// Lexer state for tokenizing source text
pub struct Lexer {
    /// Characters of the source
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Byte offset of `chars[current]`
    offset: usize,
    /// Byte offset where the current token began
    start_offset: usize,
}

impl Lexer {
    /// Create a new lexer for the given source
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            offset: 0,
            start_offset: 0,
        }
    }

    /// Tokenize the whole source. The result always ends with an `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments();

        self.start_offset = self.offset;

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::Eof, ""));
        }

        let c = self.advance();

        let token = match c {
            '(' => self.make_token(TokenKind::OpenList, "("),
            ')' => self.make_token(TokenKind::CloseList, ")"),
            '[' => self.make_token(TokenKind::OpenVector, "["),
            ']' => self.make_token(TokenKind::CloseVector, "]"),
            '.' => self.make_token(TokenKind::Dot, "."),
            '\'' => self.make_token(TokenKind::Quote, "'"),
            '"' => return self.string(),
            ':' => {
                let name = self.atom_text();
                self.make_token(TokenKind::Keyword, &name)
            }
            c => {
                let mut text = String::from(c);
                text.push_str(&self.atom_text());
                self.atom(text)
            }
        };

        Ok(token)
    }

    /// Skip whitespace and `;` line comments
    fn skip_whitespace_and_comments(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                c if c.is_whitespace() => {
                    self.advance();
                }
                ';' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan a string literal; the opening quote is already consumed
    fn string(&mut self) -> Result<Token, SyntaxError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(self.unterminated_string());
            }

            match self.advance() {
                '"' => break,
                '\\' => {
                    if self.is_at_end() {
                        return Err(self.unterminated_string());
                    }
                    // The escaped character is kept as written
                    value.push(self.advance());
                }
                c => value.push(c),
            }
        }

        Ok(self.make_token(TokenKind::String, &value))
    }

    /// Consume characters up to the next delimiter
    fn atom_text(&mut self) -> String {
        let mut text = String::new();
        while !self.is_at_end() && !is_delimiter(self.peek()) {
            text.push(self.advance());
        }
        text
    }

    /// Classify a bare atom as nil, number or symbol
    fn atom(&self, text: String) -> Token {
        let kind = if text == "nil" {
            TokenKind::Nil
        } else if text.parse::<i64>().is_ok() {
            TokenKind::Number
        } else {
            TokenKind::Symbol
        };
        self.make_token(kind, &text)
    }

    // === Character navigation ===

    /// Advance to next character and return it
    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.offset += c.len_utf8();
        c
    }

    /// Peek at current character without advancing
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Check if we've reached the end of source
    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token creation ===

    fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Span::new(self.start_offset, self.offset))
    }

    fn unterminated_string(&self) -> SyntaxError {
        SyntaxError::UnterminatedString {
            span: Span::new(self.start_offset, self.offset),
        }
    }
}

/// Characters that end a keyword or symbol
pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')' | '.')
}

/// Tokenize `source` in one call
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).tokenize()
}
