use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{MalformedLine, RegistryError, Result};
use crate::record::{self, Record};

/// One physical line of the registry, as read from disk.
#[derive(Debug, Clone)]
pub struct ScannedLine {
    /// 1-based line number.
    pub number: usize,
    /// Raw bytes, line ending included when present.
    pub raw: Vec<u8>,
    pub parsed: std::result::Result<Record, MalformedLine>,
}

/// Lazy, single-pass scan over the lines of a registry file.
pub struct RegistryScan<R = BufReader<File>> {
    reader: R,
    path: PathBuf,
    line_no: usize,
    done: bool,
}

/// Opens `path` for reading and starts a scan from the first line.
pub fn scan(path: &Path) -> Result<RegistryScan> {
    let file = File::open(path).map_err(|err| RegistryError::io("open", path, err))?;
    log::debug!("Scanning registry {}", path.display());
    Ok(RegistryScan::new(BufReader::new(file), path))
}

impl<R: BufRead> RegistryScan<R> {
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line_no: 0,
            done: false,
        }
    }

    /// Well-formed records only; malformed lines are skipped.
    pub fn records(self) -> impl Iterator<Item = Result<Record>> {
        self.filter_map(|line| match line {
            Ok(ScannedLine {
                parsed: Ok(record), ..
            }) => Some(Ok(record)),
            Ok(ScannedLine {
                number,
                parsed: Err(reason),
                ..
            }) => {
                log::debug!("Skipping malformed registry line {number}: {reason}");
                None
            }
            Err(err) => Some(Err(err)),
        })
    }
}

impl<R: BufRead> Iterator for RegistryScan<R> {
    type Item = Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                let parsed = record::parse_bytes(&raw);
                Some(Ok(ScannedLine {
                    number: self.line_no,
                    raw,
                    parsed,
                }))
            }
            Err(err) => {
                self.done = true;
                Some(Err(RegistryError::io("read", &self.path, err)))
            }
        }
    }
}
