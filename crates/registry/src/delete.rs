//! Delete by backup-rename-rewrite.
//!
//! The live file is renamed to `<path>.backup`, a fresh file is written at
//! the original path with every line except the first match copied verbatim,
//! and the backup is left on disk. Any failure after the rename moves the
//! backup back over the live path.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};
use crate::reader::RegistryScan;
use crate::store::{backup_path_for, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteState {
    /// Nothing touched yet.
    Live,
    /// Live file renamed to the backup path.
    BackedUp,
    /// Fresh live file open for writing.
    Rewriting,
    Committed,
    /// Backup moved back over the live path after a failure.
    RolledBack,
}

struct DeleteTransaction<'a> {
    live: &'a Path,
    backup: PathBuf,
    state: DeleteState,
}

impl<'a> DeleteTransaction<'a> {
    fn begin(live: &'a Path) -> Self {
        Self {
            live,
            backup: backup_path_for(live),
            state: DeleteState::Live,
        }
    }

    fn back_up(&mut self) -> Result<()> {
        debug_assert_eq!(self.state, DeleteState::Live);
        fs::rename(self.live, &self.backup)
            .map_err(|err| RegistryError::io("back up", self.live, err))?;
        self.state = DeleteState::BackedUp;
        Ok(())
    }

    fn reopen(&mut self) -> Result<(BufReader<File>, BufWriter<File>)> {
        debug_assert_eq!(self.state, DeleteState::BackedUp);
        let reader = match File::open(&self.backup) {
            Ok(file) => BufReader::new(file),
            Err(err) => {
                let cause = RegistryError::io("open", &self.backup, err);
                return Err(self.roll_back(cause));
            }
        };
        let writer = match File::create(self.live) {
            Ok(file) => BufWriter::new(file),
            Err(err) => {
                let cause = RegistryError::io("create", self.live, err);
                return Err(self.roll_back(cause));
            }
        };
        // The rewritten file keeps the backup's mode, not the umask default.
        let permissions = reader
            .get_ref()
            .metadata()
            .and_then(|meta| writer.get_ref().set_permissions(meta.permissions()));
        if let Err(err) = permissions {
            let cause = RegistryError::io("set permissions on", self.live, err);
            drop(writer);
            return Err(self.roll_back(cause));
        }
        self.state = DeleteState::Rewriting;
        Ok((reader, writer))
    }

    /// Copies the backup into the live file, dropping the first line whose
    /// alias equals `alias`. Returns whether a line was dropped.
    fn rewrite(
        &mut self,
        reader: BufReader<File>,
        writer: BufWriter<File>,
        alias: &str,
    ) -> Result<bool> {
        debug_assert_eq!(self.state, DeleteState::Rewriting);
        match copy_without(reader, writer, &self.backup, self.live, alias) {
            Ok(removed) => {
                self.state = DeleteState::Committed;
                Ok(removed)
            }
            Err(err) => Err(self.roll_back(err)),
        }
    }

    /// Restores the backup over the live path and hands back `cause`.
    fn roll_back(&mut self, cause: RegistryError) -> RegistryError {
        log::warn!(
            "Delete in {} failed ({cause}); restoring {}",
            self.live.display(),
            self.backup.display()
        );
        match fs::rename(&self.backup, self.live) {
            Ok(()) => self.state = DeleteState::RolledBack,
            Err(err) => log::error!(
                "Could not restore {} from {}: {err}",
                self.live.display(),
                self.backup.display()
            ),
        }
        cause
    }
}

fn copy_without(
    reader: BufReader<File>,
    mut writer: BufWriter<File>,
    backup: &Path,
    live: &Path,
    alias: &str,
) -> Result<bool> {
    let mut removed = false;
    for line in RegistryScan::new(reader, backup) {
        let line = line?;
        if !removed && matches!(&line.parsed, Ok(record) if record.alias == alias) {
            log::debug!("Dropping line {} of {}", line.number, backup.display());
            removed = true;
            continue;
        }
        writer
            .write_all(&line.raw)
            .map_err(|err| RegistryError::io("write", live, err))?;
    }

    let file = writer
        .into_inner()
        .map_err(|err| RegistryError::io("write", live, err.into_error()))?;
    file.sync_all()
        .map_err(|err| RegistryError::io("sync", live, err))?;
    Ok(removed)
}

impl Registry {
    /// Removes the first record named `alias`.
    ///
    /// The pre-delete content stays at [`Registry::backup_path`], replacing
    /// whatever an earlier delete left there.
    pub fn delete(&self, alias: &str) -> Result<DeleteOutcome> {
        let mut tx = DeleteTransaction::begin(self.path());
        tx.back_up()?;
        let (reader, writer) = tx.reopen()?;
        let removed = tx.rewrite(reader, writer, alias)?;

        if removed {
            log::info!("Deleted '{alias}' from {}", self.path().display());
            Ok(DeleteOutcome::Deleted)
        } else {
            log::debug!("No '{alias}' in {}", self.path().display());
            Ok(DeleteOutcome::NotFound)
        }
    }
}
