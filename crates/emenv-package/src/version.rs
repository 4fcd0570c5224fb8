//! Package versions as published by ELPA archives

use std::fmt;

/// A version such as `(20231012 1530)` or `(3 3 0)`
///
/// `literal` is the dot-joined form and is the only thing compared: two
/// versions are equal iff their literals are equal. No ordering is defined
/// because resolution never picks between versions.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    pub members: Vec<i64>,
    pub literal: String,
}

impl Version {
    pub fn new(members: Vec<i64>) -> Self {
        let literal = members
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Self { members, literal }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
