//! Schema decoders for repository indices
//!
//! An `archive-contents` index reads as
//!
//! ```text
//! (FORMAT
//!  (NAME . [(MAJOR MINOR ...) ((DEP (V ...)) ...) "DESCRIPTION" single|tar EXTRAS...])
//!  ...)
//! ```
//!
//! Every decoder checks the exact shape it expects and reports the first
//! mismatch as [`PackageError::BadSyntax`].

use crate::package::{Package, PackageDef, Repository, StorageKind};
use crate::version::Version;
use crate::{PackageError, Result};
use emenv_syntax::Node;

/// `(1 2 3)` or `[1 2 3]` → version `1.2.3`
pub fn version_from_node(node: &Node) -> Result<Version> {
    let members = node
        .as_list()
        .or_else(|| node.as_vector())
        .ok_or_else(|| PackageError::bad_syntax("a version list"))?;
    if members.is_empty() {
        return Err(PackageError::bad_syntax("a non-empty version list"));
    }

    let numbers = members
        .iter()
        .map(|m| {
            m.as_number()
                .ok_or_else(|| PackageError::bad_syntax("an integer version member"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Version::new(numbers))
}

/// `(NAME (1 2))` → dependency on NAME at 1.2
pub fn dependency_from_node(node: &Node) -> Result<PackageDef> {
    match node.as_list() {
        Some([name, version]) => {
            let name = name
                .as_symbol()
                .ok_or_else(|| PackageError::bad_syntax("a dependency name symbol"))?;
            Ok(PackageDef::dependency(name, version_from_node(version)?))
        }
        _ => Err(PackageError::bad_syntax("a (name version) dependency")),
    }
}

/// Dependency list; `nil` is the empty list
pub fn dependencies_from_node(node: &Node) -> Result<Vec<PackageDef>> {
    if node.is_nil() {
        return Ok(Vec::new());
    }
    node.as_list()
        .ok_or_else(|| PackageError::bad_syntax("a dependency list or nil"))?
        .iter()
        .map(dependency_from_node)
        .collect()
}

/// One `(NAME . [..])` entry of an index
pub fn package_from_node(base_url: &str, node: &Node) -> Result<Package> {
    let (name, details) = match node.as_list() {
        Some([name, Node::Dot, details]) => (name, details),
        _ => return Err(PackageError::bad_syntax("a (name . [details]) entry")),
    };
    let name = name
        .as_symbol()
        .ok_or_else(|| PackageError::bad_syntax("a package name symbol"))?;

    let details = details
        .as_vector()
        .filter(|d| d.len() >= 4)
        .ok_or_else(|| PackageError::bad_syntax("a details vector of at least 4 elements"))?;

    let version = version_from_node(&details[0])?;
    let dependencies = dependencies_from_node(&details[1])?;
    let description = match &details[2] {
        Node::String(text) => text.clone(),
        _ => return Err(PackageError::bad_syntax("a description string")),
    };
    let storage = details[3]
        .as_symbol()
        .and_then(StorageKind::from_symbol)
        .ok_or_else(|| PackageError::bad_syntax("storage kind single or tar"))?;

    let url = format!(
        "{}/{}-{}.{}",
        base_url.trim_end_matches('/'),
        name,
        version,
        storage.extension()
    );

    Ok(Package {
        name: name.to_string(),
        version,
        description,
        storage,
        url,
        dependencies,
    })
}

/// A whole index: format integer followed by at least one entry
pub fn repository_from_node(name: &str, url: &str, node: &Node) -> Result<Repository> {
    let (format, entries) = match node.as_list() {
        Some([format, entries @ ..]) if !entries.is_empty() => (format, entries),
        _ => {
            return Err(PackageError::bad_syntax(
                "an index with a format number and at least one entry",
            ))
        }
    };
    let format = format
        .as_number()
        .ok_or_else(|| PackageError::bad_syntax("an integer index format"))?;

    let packages = entries
        .iter()
        .map(|entry| package_from_node(url, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(Repository {
        name: name.to_string(),
        url: url.to_string(),
        format,
        packages,
    })
}
