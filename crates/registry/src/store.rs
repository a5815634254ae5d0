use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::reader::{self, RegistryScan};

/// Suffix appended to the full registry path to name the delete backup.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Handle on a registry file. All operations read or rewrite the file at
/// `path`; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.backup`, the single slot written by [`Registry::delete`].
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        backup_path_for(&self.path)
    }

    /// Fresh scan from the start of the file.
    pub fn scan(&self) -> Result<RegistryScan> {
        reader::scan(&self.path)
    }
}

#[must_use]
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
