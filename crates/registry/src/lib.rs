//! # qrd registry
//!
//! Storage engine for the `qrd` document catalog: a flat text file with one
//! `type:alias:location;` record per line.
//!
//! ## Features
//!
//! - **Append-only writes** with field validation before the file is touched
//! - **Malformed-line tolerance**: broken lines are skipped, never fatal
//! - **Aligned listing** with an optional case-insensitive type filter
//! - **Recoverable delete** through a `<path>.backup` rename
//!
//! ## Architecture
//!
//! ```text
//! Registry { path }
//!     │
//!     ├──> append ──> Record codec ──> registry file (append mode)
//!     │
//!     ├──> lookup / list ──> RegistryScan ──> Record | MalformedLine
//!     │
//!     └──> delete ──> rename to .backup ──> rewrite ──> Committed | RolledBack
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use qrd_registry::{DeleteOutcome, Registry};
//!
//! fn main() -> qrd_registry::Result<()> {
//!     let registry = Registry::new("/home/me/.config/qrd/registry");
//!     registry.append("pdf", "report", "/docs/report.pdf")?;
//!
//!     print!("{}", registry.list(None)?);
//!
//!     if let Some(location) = registry.find_by_alias("report") {
//!         println!("report -> {location}");
//!     }
//!
//!     assert_eq!(registry.delete("report")?, DeleteOutcome::Deleted);
//!     Ok(())
//! }
//! ```

mod append;
mod delete;
mod error;
mod listing;
mod lookup;
mod paths;
mod reader;
mod record;
mod store;

pub use delete::DeleteOutcome;
pub use error::{MalformedLine, RegistryError, Result};
pub use listing::{Listing, HEADERS};
pub use paths::{
    default_registry_path, ensure_registry, registry_path_for_home, APP_DIR_NAME,
    CONFIG_DIR_NAME, REGISTRY_FILE_NAME,
};
pub use reader::{scan, RegistryScan, ScannedLine};
pub use record::{
    normalize_type, parse, parse_bytes, serialize, Field, Record, FIELD_SEPARATOR,
    MAX_LOCATION_LEN, MAX_NAME_LEN, RECORD_TERMINATOR,
};
pub use store::{backup_path_for, Registry, BACKUP_SUFFIX};
