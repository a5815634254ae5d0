use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::Field;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: Field, reason: String },

    #[error("Cannot {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn validation(field: Field, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Reason a registry line does not follow the `type:alias:location;` layout.
///
/// Readers treat this as a skip signal; it never fails an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedLine {
    #[error("missing ':' after type")]
    MissingTypeDelimiter,

    #[error("missing ':' after alias")]
    MissingAliasDelimiter,

    #[error("missing ';' after location")]
    MissingTerminator,

    #[error("{field} is {len} {} long (max {max})", .field.unit())]
    FieldTooLong { field: Field, len: usize, max: usize },

    #[error("line is not valid UTF-8")]
    NotUtf8,
}
