use crate::error::Result;
use crate::record::Record;
use crate::store::Registry;

impl Registry {
    /// First record whose alias equals `alias` byte for byte, in file order.
    pub fn lookup(&self, alias: &str) -> Result<Option<Record>> {
        for record in self.scan()?.records() {
            let record = record?;
            if record.alias == alias {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Location of the first record named `alias`.
    ///
    /// An unreadable registry is reported as not found.
    pub fn find_by_alias(&self, alias: &str) -> Option<String> {
        match self.lookup(alias) {
            Ok(found) => found.map(|record| record.location),
            Err(err) => {
                log::warn!("Lookup of '{alias}' failed: {err}");
                None
            }
        }
    }
}
