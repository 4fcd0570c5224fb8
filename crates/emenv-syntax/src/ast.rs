//! Data-literal tree
//!
//! One node family covers every schema read by emenv: manifests, repository
//! indices and the persisted install list. Schema checks live with the
//! decoders that consume these nodes, not here.

use crate::token::write_quoted;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed data literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// `( ... )`
    List(Vec<Node>),
    /// `[ ... ]`
    Vector(Vec<Node>),
    /// Dot marker inside a dotted form such as `(name . [..])`
    Dot,
    String(String),
    Symbol(String),
    /// Keyword name without the leading colon
    Keyword(String),
    Number(i64),
    Nil,
}

impl Node {
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    /// Name of a symbol node
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Text of a symbol or string node, for places that accept either
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Node::Symbol(text) | Node::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Children of a list node
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(children) => Some(children),
            _ => None,
        }
    }

    /// Children of a vector node
    pub fn as_vector(&self) -> Option<&[Node]> {
        match self {
            Node::Vector(children) => Some(children),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Nil)
    }

    /// Short description used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::List(_) => "list",
            Node::Vector(_) => "vector",
            Node::Dot => "dot",
            Node::String(_) => "string",
            Node::Symbol(_) => "symbol",
            Node::Keyword(_) => "keyword",
            Node::Number(_) => "number",
            Node::Nil => "nil",
        }
    }

    /// Number of list and vector nodes in this tree, including `self`
    pub fn container_count(&self) -> usize {
        match self {
            Node::List(children) | Node::Vector(children) => {
                1 + children.iter().map(Node::container_count).sum::<usize>()
            }
            _ => 0,
        }
    }
}

/// Canonical text that reads back to an equal tree
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::List(children) => write_sequence(f, "(", children, ")"),
            Node::Vector(children) => write_sequence(f, "[", children, "]"),
            Node::Dot => f.write_str("."),
            Node::String(value) => write_quoted(f, value),
            Node::Symbol(name) => f.write_str(name),
            Node::Keyword(name) => write!(f, ":{}", name),
            Node::Number(n) => write!(f, "{}", n),
            Node::Nil => f.write_str("nil"),
        }
    }
}

fn write_sequence(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    children: &[Node],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", child)?;
    }
    f.write_str(close)
}
