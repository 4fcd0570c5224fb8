//! Install list (`plist.el`): what the last successful run put on disk

use crate::resolver::{InstallDef, InstallSet};
use crate::{PackageError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use emenv_syntax::{parse_document, Node};
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

/// One installed package record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    /// Version literal
    pub version: String,
    pub repo: String,
}

impl InstalledPackage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            repo: repo.into(),
        }
    }

    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    fn from_node(node: &Node) -> Result<Self> {
        match node.as_list() {
            Some([name, Node::String(version), repo]) => {
                let name = name
                    .as_name()
                    .ok_or_else(|| PackageError::bad_syntax("an installed package name"))?;
                let repo = repo
                    .as_name()
                    .ok_or_else(|| PackageError::bad_syntax("an installed package repository"))?;
                Ok(Self::new(name, version.as_str(), repo))
            }
            _ => Err(PackageError::bad_syntax("a (NAME \"VERSION\" REPO) record")),
        }
    }

    fn to_node(&self) -> Node {
        Node::List(vec![
            Node::symbol(self.name.as_str()),
            Node::string(self.version.as_str()),
            Node::symbol(self.repo.as_str()),
        ])
    }
}

impl From<&InstallDef> for InstalledPackage {
    fn from(def: &InstallDef) -> Self {
        Self::new(def.name.as_str(), def.version.as_str(), def.repo.as_str())
    }
}

/// Install list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    pub packages: Vec<InstalledPackage>,
}

impl InstalledSet {
    /// File name inside the state directory
    pub const FILE_NAME: &'static str = "plist.el";

    const HEADER: &'static str = ";; package list file for Emenv";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an install list
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let root = parse_document(content)?;
        let records: &[Node] = match &root {
            Node::Nil => &[],
            Node::List(records) => records,
            _ => return Err(PackageError::bad_syntax("an install list")),
        };

        let packages = records
            .iter()
            .map(InstalledPackage::from_node)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for package in &packages {
            if !seen.insert(package.name.as_str()) {
                return Err(PackageError::DuplicateEntry(package.name.clone()));
            }
        }

        Ok(Self { packages })
    }

    /// Load the install list at `path`; `None` when no previous run left one
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content).map(Some)
    }

    /// Record every fetchable winner of `set`, in name order
    pub fn from_install_set(set: &InstallSet) -> Self {
        Self {
            packages: set.fetchable().map(InstalledPackage::from).collect(),
        }
    }

    /// Record by name
    pub fn get(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// File content stamped with the current time
    pub fn render(&self) -> String {
        self.render_at(Utc::now())
    }

    /// File content stamped with `generated_at`
    pub fn render_at(&self, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(Self::HEADER);
        out.push('\n');
        let _ = writeln!(
            out,
            ";; generated {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        out.push_str("(\n");
        for package in &self.packages {
            let _ = writeln!(out, "{}", package.to_node());
        }
        out.push_str(")\n");
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
