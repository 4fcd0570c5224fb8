//! Emenv Package Management
//!
//! Turns a manifest and a set of ELPA repository indices into an install
//! set, compares it against what was installed last time, and applies the
//! difference on disk.
//!
//! The pipeline is:
//! manifest text → [`Manifest`] → [`resolve`] → [`InstallSet`] → [`diff`] →
//! [`DiffSet`] → [`Store::apply`].

pub mod decode;
pub mod diff;
pub mod fetch;
pub mod installed;
pub mod load_file;
pub mod manifest;
pub mod package;
pub mod resolver;
pub mod store;
pub mod version;

pub use diff::{diff, DiffSet, Upgrade};
pub use fetch::{FetchOptions, Fetcher, HttpFetcher};
pub use installed::{InstalledPackage, InstalledSet};
pub use load_file::render_load_file;
pub use manifest::{Manifest, ManifestDefaults};
pub use package::{Package, PackageDef, PackageKind, Repository, Source, StorageKind};
pub use resolver::{
    resolve, InstallDef, InstallNode, InstallSet, InstallTree, NodeId, ResolveContext, Resolver,
};
pub use store::Store;
pub use version::Version;

use std::path::PathBuf;

/// Package management errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] emenv_syntax::SyntaxError),

    #[error("Bad syntax: expected {expected}")]
    BadSyntax { expected: &'static str },

    #[error("Unknown directive: {0}")]
    UnknownDirective(String),

    #[error("Duplicate entry for package {0}")]
    DuplicateEntry(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Package {package} not found in {repo}")]
    PackageNotFoundIn { package: String, repo: String },

    #[error("Package {0} not found in any repository")]
    NoSuchPackage(String),

    #[error("Invalid index for repository {repo}: {source}")]
    InvalidIndex {
        repo: String,
        #[source]
        source: Box<PackageError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP {status} while fetching {url}")]
    Http { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Archive for {package} contains an entry outside its directory: {}", .path.display())]
    UnsafeArchivePath { package: String, path: PathBuf },

    #[error("Unreachable code path: {0}")]
    Unreachable(&'static str),
}

impl PackageError {
    pub(crate) fn bad_syntax(expected: &'static str) -> Self {
        PackageError::BadSyntax { expected }
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
