//! Install-set resolution
//!
//! Resolution walks declared packages in manifest order and their
//! dependencies depth-first in declaration order. There are no version
//! constraints: each name is taken from the first repository that has it
//! (or from its pinned repository), and the shallowest requirement for a
//! name wins. Later or deeper requirements for a decided name become shadow
//! nodes in the provenance tree.

use crate::manifest::Manifest;
use crate::package::{Package, PackageDef, PackageKind, Repository};
use crate::{PackageError, Result};
use std::collections::BTreeMap;
use tracing::debug;

mod tree;

pub use tree::{InstallDef, InstallNode, InstallSet, InstallTree, NodeId};

/// Everything resolution reads
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub repositories: &'a BTreeMap<String, Repository>,
    pub prefer: &'a [String],
    pub provided: &'a [String],
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        repositories: &'a BTreeMap<String, Repository>,
        prefer: &'a [String],
        provided: &'a [String],
    ) -> Self {
        Self {
            repositories,
            prefer,
            provided,
        }
    }

    /// Context using the manifest's preference and provided lists
    pub fn from_manifest(
        manifest: &'a Manifest,
        repositories: &'a BTreeMap<String, Repository>,
    ) -> Self {
        Self::new(repositories, &manifest.prefer, &manifest.provided)
    }

    pub fn is_provided(&self, name: &str) -> bool {
        self.provided.iter().any(|p| p == name)
    }

    /// Look `name` up in one specific repository
    pub fn find_in(&self, repo: &str, name: &str) -> Result<&'a Package> {
        let repository = self
            .repositories
            .get(repo)
            .ok_or_else(|| PackageError::RepositoryNotFound(repo.to_string()))?;
        repository
            .find(name)
            .ok_or_else(|| PackageError::PackageNotFoundIn {
                package: name.to_string(),
                repo: repo.to_string(),
            })
    }

    /// Look `name` up in preference order, skipping repositories that are
    /// not loaded
    pub fn find_preferred(&self, name: &str) -> Result<(&'a str, &'a Package)> {
        self.prefer
            .iter()
            .filter_map(|repo| self.repositories.get_key_value(repo))
            .find_map(|(repo, repository)| repository.find(name).map(|p| (repo.as_str(), p)))
            .ok_or_else(|| PackageError::NoSuchPackage(name.to_string()))
    }
}

/// Depth-first install-set resolver
pub struct Resolver<'a> {
    ctx: ResolveContext<'a>,
    set: InstallSet,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self {
            ctx,
            set: InstallSet::new(),
        }
    }

    /// Resolve declared packages, in order, under the tree root
    pub fn resolve(mut self, packages: &[PackageDef]) -> Result<InstallSet> {
        for def in packages {
            self.add(InstallTree::ROOT, def, 0)?;
        }
        Ok(self.set)
    }

    fn add(&mut self, parent: NodeId, def: &PackageDef, depth: usize) -> Result<()> {
        if self.ctx.is_provided(&def.name) {
            if self.loses_to_existing(parent, &def.name, depth) {
                return Ok(());
            }
            let node = self
                .set
                .tree
                .attach(parent, InstallDef::provided(&def.name, parent));
            self.set.record(InstallDef::provided(&def.name, parent), node);
            return Ok(());
        }

        let (repo, package) = match &def.repo {
            Some(repo) => (repo.as_str(), self.ctx.find_in(repo, &def.name)?),
            None => self.ctx.find_preferred(&def.name)?,
        };

        if self.loses_to_existing(parent, &def.name, depth) {
            return Ok(());
        }

        debug!(
            "resolved {} {} from {} at depth {}",
            package.name, package.version, repo, depth
        );

        let install = InstallDef {
            kind: def.kind,
            name: package.name.clone(),
            version: package.version.literal.clone(),
            repo: repo.to_string(),
            storage: package.storage,
            depth,
            url: package.url.clone(),
            parent: Some(parent),
        };
        let node = self.set.tree.attach(parent, install.clone());
        self.set.record(install, node);

        for dependency in &package.dependencies {
            self.add(node, dependency, depth + 1)?;
        }
        Ok(())
    }

    /// Shadow check against the current winner for `name`
    ///
    /// Returns true when the existing winner stays, after attaching a shadow
    /// under `parent`. A deeper winner is rewritten into a shadow in place
    /// and false is returned so the caller can take over the name.
    fn loses_to_existing(&mut self, parent: NodeId, name: &str, depth: usize) -> bool {
        let Some(existing) = self.set.get(name) else {
            return false;
        };

        if existing.depth > depth {
            debug!(
                "{} moves from depth {} to depth {}",
                name, existing.depth, depth
            );
            if let Some(node) = self.set.node_of(name) {
                self.set.tree.overwrite_with_shadow(node);
            }
            return false;
        }

        self.set
            .tree
            .attach(parent, InstallDef::shadow(name, Some(parent)));
        true
    }
}

/// Resolve `packages` against `ctx`
pub fn resolve(ctx: ResolveContext<'_>, packages: &[PackageDef]) -> Result<InstallSet> {
    Resolver::new(ctx).resolve(packages)
}

impl Manifest {
    /// Resolve this manifest's packages against loaded repositories
    pub fn resolve(&self, repositories: &BTreeMap<String, Repository>) -> Result<InstallSet> {
        resolve(
            ResolveContext::from_manifest(self, repositories),
            &self.packages,
        )
    }
}
