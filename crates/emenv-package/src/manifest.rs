//! Manifest parsing (the `Emenv` file)

use crate::package::{PackageDef, PackageKind, Source};
use crate::{PackageError, Result};
use emenv_syntax::{tokenize, Node, Parser};
use std::collections::BTreeMap;
use std::path::Path;

/// Sources, preference and provided names in effect before the manifest is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDefaults {
    pub sources: Vec<Source>,
    pub prefer: Vec<String>,
    pub provided: Vec<String>,
}

impl ManifestDefaults {
    /// The well-known ELPA archives and the libraries every Emacs ships
    pub fn builtin() -> Self {
        Self {
            sources: vec![
                Source::new("melpa-stable", "https://stable.melpa.org/packages"),
                Source::new("melpa", "https://melpa.org/packages"),
                Source::new("gnu", "https://elpa.gnu.org/packages"),
                Source::new("org", "http://orgmode.org/elpa"),
            ],
            prefer: strings(&["melpa-stable", "org", "gnu", "melpa"]),
            provided: Self::builtin_provided(),
        }
    }

    pub fn builtin_provided() -> Vec<String> {
        strings(&["emacs", "cl-lib", "eieio", "json"])
    }

    /// No sources, no preference; only what the manifest declares
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            prefer: Vec::new(),
            provided: Self::builtin_provided(),
        }
    }

    pub fn with_provided(mut self, provided: Vec<String>) -> Self {
        self.provided = provided;
        self
    }
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Decoded manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub sources: BTreeMap<String, Source>,
    /// Search order for packages without a pinned repository
    pub prefer: Vec<String>,
    pub provided: Vec<String>,
    /// Declared packages and themes, in manifest order
    pub packages: Vec<PackageDef>,
}

impl Manifest {
    /// Parse manifest text on top of `defaults`
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str, defaults: &ManifestDefaults) -> Result<Self> {
        let mut manifest = Self {
            sources: defaults
                .sources
                .iter()
                .map(|s| (s.name.clone(), s.clone()))
                .collect(),
            prefer: defaults.prefer.clone(),
            provided: defaults.provided.clone(),
            packages: Vec::new(),
        };

        let mut parser = Parser::new(tokenize(content)?);
        while let Some(form) = parser.parse_one()? {
            let directive = form
                .as_list()
                .ok_or_else(|| PackageError::bad_syntax("a directive list"))?;
            manifest.apply(directive)?;
        }

        for name in manifest.sources.keys() {
            if !manifest.prefer.contains(name) {
                manifest.prefer.push(name.clone());
            }
        }
        Ok(manifest)
    }

    /// Load manifest from file
    pub fn from_file(path: &Path, defaults: &ManifestDefaults) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content, defaults)
    }

    fn apply(&mut self, directive: &[Node]) -> Result<()> {
        let (head, args) = directive
            .split_first()
            .ok_or_else(|| PackageError::bad_syntax("a non-empty directive"))?;
        let head = head
            .as_symbol()
            .ok_or_else(|| PackageError::bad_syntax("a directive name symbol"))?;

        match head {
            "package" => self.add_package(args, PackageKind::Standard),
            "theme" => self.add_package(args, PackageKind::Theme),
            "source" => self.add_source(args),
            "prefer" => {
                self.prefer = names(args)?;
                Ok(())
            }
            "provided" => {
                self.provided = names(args)?;
                Ok(())
            }
            other => Err(PackageError::UnknownDirective(other.to_string())),
        }
    }

    fn add_package(&mut self, args: &[Node], kind: PackageKind) -> Result<()> {
        let (name, options) = args
            .split_first()
            .ok_or_else(|| PackageError::bad_syntax("a package name"))?;
        let name = name
            .as_name()
            .ok_or_else(|| PackageError::bad_syntax("a package name symbol or string"))?;

        let mut def = PackageDef::new(name, kind);
        for option in options {
            let option = option
                .as_list()
                .ok_or_else(|| PackageError::bad_syntax("a package option list"))?;
            let key = option
                .first()
                .and_then(Node::as_symbol)
                .ok_or_else(|| PackageError::bad_syntax("a package option name"))?;
            match (key, option) {
                ("repo", [_, repo]) => {
                    let repo = repo
                        .as_name()
                        .ok_or_else(|| PackageError::bad_syntax("a repository name"))?;
                    def.repo = Some(repo.to_string());
                }
                ("repo", _) => return Err(PackageError::bad_syntax("(repo NAME)")),
                (other, _) => return Err(PackageError::UnknownDirective(other.to_string())),
            }
        }

        self.packages.push(def);
        Ok(())
    }

    fn add_source(&mut self, args: &[Node]) -> Result<()> {
        match args {
            [Node::Symbol(name), Node::String(url)] => {
                self.sources
                    .insert(name.clone(), Source::new(name.as_str(), url.as_str()));
                Ok(())
            }
            _ => Err(PackageError::bad_syntax("(source NAME \"URL\")")),
        }
    }
}

fn names(args: &[Node]) -> Result<Vec<String>> {
    args.iter()
        .map(|arg| {
            arg.as_name()
                .map(str::to_string)
                .ok_or_else(|| PackageError::bad_syntax("a symbol or string name"))
        })
        .collect()
}
