//! Classification of a new install set against the previous install list

use crate::installed::{InstalledPackage, InstalledSet};
use crate::resolver::{InstallDef, InstallSet};
use std::fmt;

/// A previously installed package replaced by a different version or
/// repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upgrade {
    pub prev: InstalledPackage,
    pub next: InstallDef,
}

/// What has to happen on disk; every name appears in at most one list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSet {
    pub keep: Vec<InstalledPackage>,
    pub upgrade: Vec<Upgrade>,
    pub install: Vec<InstallDef>,
    pub delete: Vec<InstalledPackage>,
}

impl DiffSet {
    /// True when nothing would be fetched or removed
    pub fn is_empty(&self) -> bool {
        self.upgrade.is_empty() && self.install.is_empty() && self.delete.is_empty()
    }

    /// Number of fetch and remove operations
    pub fn operation_count(&self) -> usize {
        self.upgrade.len() + self.install.len() + self.delete.len()
    }
}

/// Human-readable plan, one line per affected package
impl fmt::Display for DiffSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.delete {
            writeln!(f, "delete  {} {} ({})", p.name, p.version, p.repo)?;
        }
        for u in &self.upgrade {
            writeln!(
                f,
                "upgrade {} {} ({}) -> {} ({})",
                u.prev.name, u.prev.version, u.prev.repo, u.next.version, u.next.repo
            )?;
        }
        for d in &self.install {
            writeln!(f, "install {} {} ({})", d.name, d.version, d.repo)?;
        }
        Ok(())
    }
}

/// Compare `set` with the previously installed packages
pub fn diff(set: &InstallSet, previous: &InstalledSet) -> DiffSet {
    let mut result = DiffSet::default();

    for prev in &previous.packages {
        match set.get(&prev.name) {
            Some(next) if next.is_fetchable() => {
                if next.version == prev.version && next.repo == prev.repo {
                    result.keep.push(prev.clone());
                } else {
                    result.upgrade.push(Upgrade {
                        prev: prev.clone(),
                        next: next.clone(),
                    });
                }
            }
            // Absent, or now supplied by the editor
            _ => result.delete.push(prev.clone()),
        }
    }

    result.install = set
        .fetchable()
        .filter(|def| previous.get(&def.name).is_none())
        .cloned()
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diff() {
        let result = diff(&InstallSet::new(), &InstalledSet::new());
        assert!(result.is_empty());
        assert_eq!(result.operation_count(), 0);
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn test_everything_previous_is_deleted_when_nothing_resolves() {
        let previous = InstalledSet {
            packages: vec![InstalledPackage::new("avy", "0.5.0", "gnu")],
        };
        let result = diff(&InstallSet::new(), &previous);
        assert_eq!(result.delete, previous.packages);
        assert_eq!(result.to_string(), "delete  avy 0.5.0 (gnu)\n");
    }
}
