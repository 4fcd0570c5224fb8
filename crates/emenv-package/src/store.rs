//! On-disk state: cached indices, unpacked packages and generated files
//!
//! ```text
//! STATE_DIR/
//!   archives/NAME          cached archive-contents per source
//!   packages/NAME-VERSION/ one directory per installed package
//!   plist.el               install list
//!   load.el                load paths for the editor
//! ```

use crate::decode::repository_from_node;
use crate::diff::{DiffSet, Upgrade};
use crate::fetch::Fetcher;
use crate::installed::{InstalledPackage, InstalledSet};
use crate::load_file::{render_load_file, LOAD_FILE_NAME};
use crate::package::{Repository, Source, StorageKind};
use crate::resolver::{InstallDef, InstallSet};
use crate::{PackageError, Result};
use emenv_syntax::parse_document;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct Store {
    base_dir: PathBuf,
    archive_dir: PathBuf,
    package_dir: PathBuf,
}

impl Store {
    /// Open the state directory, creating its layout if needed
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let archive_dir = base_dir.join("archives");
        let package_dir = base_dir.join("packages");
        fs::create_dir_all(&archive_dir)?;
        fs::create_dir_all(&package_dir)?;
        Ok(Self {
            base_dir,
            archive_dir,
            package_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Cached index location for `source`
    pub fn index_path(&self, source: &Source) -> PathBuf {
        self.archive_dir.join(&source.name)
    }

    pub fn installed_list_path(&self) -> PathBuf {
        self.base_dir.join(InstalledSet::FILE_NAME)
    }

    pub fn load_file_path(&self) -> PathBuf {
        self.base_dir.join(LOAD_FILE_NAME)
    }

    /// Download the index of `source` into the cache
    pub fn sync_source(&self, fetcher: &dyn Fetcher, source: &Source) -> Result<()> {
        let url = source.index_url();
        info!("syncing {} from {}", source.name, url);
        let bytes = fetcher.fetch(&url)?;
        fs::write(self.index_path(source), bytes)?;
        Ok(())
    }

    /// Decode the cached index of `source`, downloading it first when absent
    pub fn load_repository(&self, fetcher: &dyn Fetcher, source: &Source) -> Result<Repository> {
        let path = self.index_path(source);
        if !path.exists() {
            self.sync_source(fetcher, source)?;
        }

        let bytes = fs::read(&path)?;
        let content = String::from_utf8_lossy(&bytes);
        let invalid = |source_err: PackageError| PackageError::InvalidIndex {
            repo: source.name.clone(),
            source: Box::new(source_err),
        };

        let node = parse_document(&content).map_err(|e| invalid(e.into()))?;
        let repository = repository_from_node(&source.name, &source.url, &node).map_err(invalid)?;
        debug!(
            "loaded {} packages from {}",
            repository.packages.len(),
            source.name
        );
        Ok(repository)
    }

    /// Load every source, in name order
    pub fn load_repositories(
        &self,
        fetcher: &dyn Fetcher,
        sources: &BTreeMap<String, Source>,
    ) -> Result<BTreeMap<String, Repository>> {
        sources
            .iter()
            .map(|(name, source)| Ok((name.clone(), self.load_repository(fetcher, source)?)))
            .collect()
    }

    /// Directory of an installed package
    pub fn package_path(&self, dir_name: &str) -> PathBuf {
        self.package_dir.join(dir_name)
    }

    /// Fetch and unpack one resolved package
    pub fn install(&self, fetcher: &dyn Fetcher, def: &InstallDef) -> Result<()> {
        if !def.is_fetchable() {
            return Err(PackageError::Unreachable(
                "install requested for a package that is not fetched",
            ));
        }

        info!("installing {} {} from {}", def.name, def.version, def.repo);
        let bytes = fetcher.fetch(&def.url)?;
        match def.storage {
            StorageKind::Single => {
                let dir = self.package_path(&def.dir_name());
                fs::create_dir_all(&dir)?;
                fs::write(dir.join(format!("{}.el", def.name)), bytes)?;
            }
            StorageKind::Tar => self.unpack(def, &bytes)?,
        }
        Ok(())
    }

    fn unpack(&self, def: &InstallDef, bytes: &[u8]) -> Result<()> {
        let mut archive = tar::Archive::new(Cursor::new(bytes));
        for entry in archive.entries()? {
            let mut entry = entry?;
            let path = entry.path()?.to_path_buf();
            if !entry.unpack_in(&self.package_dir)? {
                return Err(PackageError::UnsafeArchivePath {
                    package: def.name.clone(),
                    path,
                });
            }
        }
        Ok(())
    }

    /// Delete an installed package's directory; missing directories are fine
    pub fn remove(&self, package: &InstalledPackage) -> Result<()> {
        let dir = self.package_path(&package.dir_name());
        if dir.exists() {
            info!("removing {}", dir.display());
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn upgrade(&self, fetcher: &dyn Fetcher, upgrade: &Upgrade) -> Result<()> {
        self.remove(&upgrade.prev)?;
        self.install(fetcher, &upgrade.next)
    }

    /// Deletes, then upgrades, then installs
    pub fn apply(&self, fetcher: &dyn Fetcher, diff: &DiffSet) -> Result<()> {
        for package in &diff.delete {
            self.remove(package)?;
        }
        for upgrade in &diff.upgrade {
            self.upgrade(fetcher, upgrade)?;
        }
        for def in &diff.install {
            self.install(fetcher, def)?;
        }
        Ok(())
    }

    /// Install every fetchable winner; used when there is no install list yet
    pub fn fetch_all(&self, fetcher: &dyn Fetcher, set: &InstallSet) -> Result<usize> {
        let mut count = 0;
        for def in set.fetchable() {
            self.install(fetcher, def)?;
            count += 1;
        }
        Ok(count)
    }

    /// Install list from the previous run, if any
    pub fn load_installed(&self) -> Result<Option<InstalledSet>> {
        InstalledSet::load(&self.installed_list_path())
    }

    /// Write `plist.el` and `load.el` for `set`
    pub fn write_state(&self, set: &InstallSet) -> Result<()> {
        InstalledSet::from_install_set(set).write(&self.installed_list_path())?;
        fs::write(
            self.load_file_path(),
            render_load_file(set, &self.package_dir),
        )?;
        Ok(())
    }
}
