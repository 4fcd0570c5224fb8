//! Package data model shared by the decoders, the resolver and the store

use crate::version::Version;
use std::fmt;

/// Why a package ended up in a manifest or in the install tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    /// Synthetic root of an install tree
    Root,
    Standard,
    Theme,
    /// Supplied by the host editor, never fetched
    Provided,
    /// Cross-reference to a winner recorded elsewhere in the tree
    Shadow,
    Dependency,
}

impl PackageKind {
    /// Kinds that correspond to something on disk
    pub fn is_fetchable(self) -> bool {
        matches!(
            self,
            PackageKind::Standard | PackageKind::Theme | PackageKind::Dependency
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageKind::Root => "root",
            PackageKind::Standard => "package",
            PackageKind::Theme => "theme",
            PackageKind::Provided => "provided",
            PackageKind::Shadow => "shadowed",
            PackageKind::Dependency => "dependency",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a package is published in its archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageKind {
    /// One `.el` file
    #[default]
    Single,
    /// A `.tar` containing a `name-version/` directory
    Tar,
}

impl StorageKind {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "single" => Some(StorageKind::Single),
            "tar" => Some(StorageKind::Tar),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            StorageKind::Single => "el",
            StorageKind::Tar => "tar",
        }
    }
}

/// A request for a package, from a manifest or from an index entry's
/// dependency list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDef {
    pub name: String,
    /// Pinned repository, when the manifest names one
    pub repo: Option<String>,
    pub kind: PackageKind,
    /// Minimum version a dependency asks for; informational only
    pub version: Option<Version>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>, kind: PackageKind) -> Self {
        Self {
            name: name.into(),
            repo: None,
            kind,
            version: None,
        }
    }

    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(name, PackageKind::Standard)
    }

    pub fn theme(name: impl Into<String>) -> Self {
        Self::new(name, PackageKind::Theme)
    }

    pub fn dependency(name: impl Into<String>, version: Version) -> Self {
        Self {
            version: Some(version),
            ..Self::new(name, PackageKind::Dependency)
        }
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }
}

/// One entry of a repository index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub description: String,
    pub storage: StorageKind,
    /// `{repository url}/{name}-{version}.{el|tar}`
    pub url: String,
    pub dependencies: Vec<PackageDef>,
}

/// A decoded `archive-contents` index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    /// Leading integer of the index
    pub format: i64,
    pub packages: Vec<Package>,
}

impl Repository {
    /// First entry with this name, in index order
    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

/// A named repository location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Location of the repository index
    pub fn index_url(&self) -> String {
        format!("{}/archive-contents", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetchable_kinds() {
        assert!(PackageKind::Standard.is_fetchable());
        assert!(PackageKind::Theme.is_fetchable());
        assert!(PackageKind::Dependency.is_fetchable());
        assert!(!PackageKind::Root.is_fetchable());
        assert!(!PackageKind::Provided.is_fetchable());
        assert!(!PackageKind::Shadow.is_fetchable());
    }

    #[test]
    fn test_storage_symbols() {
        assert_eq!(StorageKind::from_symbol("single"), Some(StorageKind::Single));
        assert_eq!(StorageKind::from_symbol("tar"), Some(StorageKind::Tar));
        assert_eq!(StorageKind::from_symbol("zip"), None);
        assert_eq!(StorageKind::Tar.extension(), "tar");
    }

    #[test]
    fn test_find_returns_first_match() {
        let package = |description: &str| Package {
            name: "dash".to_string(),
            version: Version::new(vec![2, 19, 1]),
            description: description.to_string(),
            storage: StorageKind::Single,
            url: String::new(),
            dependencies: Vec::new(),
        };
        let repo = Repository {
            name: "melpa".to_string(),
            url: "https://melpa.org/packages".to_string(),
            format: 1,
            packages: vec![package("first"), package("second")],
        };
        assert_eq!(repo.find("dash").unwrap().description, "first");
        assert!(repo.find("s").is_none());
    }

    #[test]
    fn test_index_url() {
        let source = Source::new("gnu", "https://elpa.gnu.org/packages/");
        assert_eq!(
            source.index_url(),
            "https://elpa.gnu.org/packages/archive-contents"
        );
    }

    #[test]
    fn test_builders() {
        let def = PackageDef::theme("zenburn-theme").with_repo("melpa");
        assert_eq!(def.kind, PackageKind::Theme);
        assert_eq!(def.repo.as_deref(), Some("melpa"));
        assert!(def.version.is_none());
    }
}
