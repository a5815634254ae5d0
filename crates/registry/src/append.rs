use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::{RegistryError, Result};
use crate::record::Record;
use crate::store::Registry;

impl Registry {
    /// Validates the fields and appends one line to the registry.
    ///
    /// Validation errors are returned before the file is opened.
    pub fn append(&self, kind: &str, alias: &str, location: &str) -> Result<Record> {
        let record = Record::new(kind, alias, location)?;
        self.append_record(&record)?;
        Ok(record)
    }

    fn append_record(&self, record: &Record) -> Result<()> {
        let path = self.path();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|err| RegistryError::io("open", path, err))?;

        // Each record starts on its own line, even after a torn last line.
        let mut line = String::new();
        if ends_mid_line(&mut file).map_err(|err| RegistryError::io("read", path, err))? {
            log::warn!("{} does not end with a newline; terminating it", path.display());
            line.push('\n');
        }
        line.push_str(&record.to_line());

        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| RegistryError::io("write", path, err))?;

        log::info!(
            "Appended '{}' ({}) to {}",
            record.alias,
            record.kind,
            path.display()
        );
        Ok(())
    }
}

fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
