use std::fmt;

use serde::Serialize;

use crate::error::{MalformedLine, RegistryError, Result};

/// Maximum length of the `type` and `alias` fields, in characters.
pub const MAX_NAME_LEN: usize = 127;
/// Maximum length of the `location` field, in bytes (`PATH_MAX` less the
/// terminator), since the platform path limit is a byte count.
pub const MAX_LOCATION_LEN: usize = 4095;

pub const FIELD_SEPARATOR: char = ':';
pub const RECORD_TERMINATOR: char = ';';

const FORBIDDEN: [char; 2] = [FIELD_SEPARATOR, RECORD_TERMINATOR];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Type,
    Alias,
    Location,
}

impl Field {
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::Type | Self::Alias => MAX_NAME_LEN,
            Self::Location => MAX_LOCATION_LEN,
        }
    }

    /// Length of `value` in this field's unit: characters for names, bytes
    /// for the location.
    #[must_use]
    pub fn measure(self, value: &str) -> usize {
        match self {
            Self::Type | Self::Alias => value.chars().count(),
            Self::Location => value.len(),
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Type | Self::Alias => "characters",
            Self::Location => "bytes",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Alias => "alias",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(type, alias, location)` entry of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: String,
    pub alias: String,
    pub location: String,
}

impl Record {
    /// Builds a record ready to be written, lowercasing the type.
    pub fn new(
        kind: impl AsRef<str>,
        alias: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self> {
        let kind = normalize_type(kind.as_ref())?;
        validate_field(Field::Type, &kind)?;
        let alias = alias.into();
        validate_field(Field::Alias, &alias)?;
        let location = location.into();
        validate_field(Field::Location, &location)?;
        Ok(Self {
            kind,
            alias,
            location,
        })
    }

    /// Line form of the record, newline included.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{RECORD_TERMINATOR}\n",
            self.kind, self.alias, self.location
        )
    }
}

/// Validates the three fields and returns `type:alias:location;\n`.
pub fn serialize(kind: &str, alias: &str, location: &str) -> Result<String> {
    Ok(Record::new(kind, alias, location)?.to_line())
}

/// Lowercases a type name and enforces its length limit.
pub fn normalize_type(kind: &str) -> Result<String> {
    let kind = kind.to_lowercase();
    let len = kind.chars().count();
    if len > MAX_NAME_LEN {
        return Err(RegistryError::validation(
            Field::Type,
            format!("{len} characters long (max {MAX_NAME_LEN})"),
        ));
    }
    Ok(kind)
}

fn validate_field(field: Field, value: &str) -> Result<()> {
    if let Some(ch) = value.chars().find(|ch| FORBIDDEN.contains(ch)) {
        return Err(RegistryError::validation(
            field,
            format!("contains forbidden character '{ch}'"),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(RegistryError::validation(field, "contains a line break"));
    }
    let len = field.measure(value);
    if len > field.max_len() {
        return Err(RegistryError::validation(
            field,
            format!("{len} {} long (max {})", field.unit(), field.max_len()),
        ));
    }
    Ok(())
}

/// Parses one registry line. The trailing line ending is optional and anything
/// after the terminating `;` is ignored.
pub fn parse(line: &str) -> std::result::Result<Record, MalformedLine> {
    let line = line
        .strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l));

    let (kind, rest) = line
        .split_once(FIELD_SEPARATOR)
        .ok_or(MalformedLine::MissingTypeDelimiter)?;
    let (alias, rest) = rest
        .split_once(FIELD_SEPARATOR)
        .ok_or(MalformedLine::MissingAliasDelimiter)?;
    let (location, _) = rest
        .split_once(RECORD_TERMINATOR)
        .ok_or(MalformedLine::MissingTerminator)?;

    check_capacity(Field::Type, kind)?;
    check_capacity(Field::Alias, alias)?;
    check_capacity(Field::Location, location)?;

    Ok(Record {
        kind: kind.to_string(),
        alias: alias.to_string(),
        location: location.to_string(),
    })
}

/// Byte-level entry point used by the reader; non UTF-8 lines are malformed.
pub fn parse_bytes(raw: &[u8]) -> std::result::Result<Record, MalformedLine> {
    let line = std::str::from_utf8(raw).map_err(|_| MalformedLine::NotUtf8)?;
    parse(line)
}

fn check_capacity(field: Field, value: &str) -> std::result::Result<(), MalformedLine> {
    let len = field.measure(value);
    if len > field.max_len() {
        return Err(MalformedLine::FieldTooLong {
            field,
            len,
            max: field.max_len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialize_lowercases_type_and_terminates_line() {
        let line = serialize("PDF", "Report", "/docs/Report.pdf").unwrap();
        assert_eq!(line, "pdf:Report:/docs/Report.pdf;\n");
    }

    #[test]
    fn parse_reads_back_serialized_record() {
        let line = serialize("Img", "logo", "/assets/logo png").unwrap();
        let record = parse(&line).unwrap();
        assert_eq!(record.kind, "img");
        assert_eq!(record.alias, "logo");
        assert_eq!(record.location, "/assets/logo png");
    }

    #[test]
    fn serialize_rejects_delimiters_in_any_field() {
        for (kind, alias, location) in [
            ("p:df", "a", "/x"),
            ("pdf", "a;b", "/x"),
            ("pdf", "a", "https://example.com"),
            ("pdf", "a", "/x;y"),
        ] {
            let err = serialize(kind, alias, location).unwrap_err();
            assert!(err.is_validation(), "{kind}/{alias}/{location}: {err}");
        }
    }

    #[test]
    fn serialize_rejects_line_breaks() {
        assert!(serialize("pdf", "two\nlines", "/x").is_err());
        assert!(serialize("pdf", "a", "/x\r").is_err());
    }

    #[test]
    fn serialize_enforces_name_lengths() {
        let at_limit = "a".repeat(MAX_NAME_LEN);
        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(serialize(&at_limit, &at_limit, "/x").is_ok());

        let err = serialize(&too_long, "a", "/x").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation {
                field: Field::Type,
                ..
            }
        ));
        let err = serialize("pdf", &too_long, "/x").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation {
                field: Field::Alias,
                ..
            }
        ));
    }

    #[test]
    fn location_limit_counts_bytes() {
        // 2048 two-byte characters: short in characters, over the byte limit.
        let wide = "\u{e9}".repeat(2048);
        let err = serialize("pdf", "a", &wide).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation {
                field: Field::Location,
                ..
            }
        ));
        assert!(serialize("pdf", "a", &"\u{e9}".repeat(2047)).is_ok());

        let line = format!("pdf:a:{wide};\n");
        assert_eq!(
            parse(&line),
            Err(MalformedLine::FieldTooLong {
                field: Field::Location,
                len: 4096,
                max: MAX_LOCATION_LEN,
            })
        );
    }

    #[test]
    fn parse_flags_missing_delimiters() {
        assert_eq!(
            parse("no delimiters here\n"),
            Err(MalformedLine::MissingTypeDelimiter)
        );
        assert_eq!(
            parse("pdf:report\n"),
            Err(MalformedLine::MissingAliasDelimiter)
        );
        assert_eq!(
            parse("pdf:report:/docs/report.pdf\n"),
            Err(MalformedLine::MissingTerminator)
        );
        assert_eq!(parse(""), Err(MalformedLine::MissingTypeDelimiter));
    }

    #[test]
    fn parse_copies_fields_verbatim() {
        let record = parse(" PDF : my alias :/a b; trailing\r\n").unwrap();
        assert_eq!(record.kind, " PDF ");
        assert_eq!(record.alias, " my alias ");
        assert_eq!(record.location, "/a b");
    }

    #[test]
    fn parse_refuses_to_truncate_long_fields() {
        let line = format!("pdf:{}:/x;\n", "a".repeat(MAX_NAME_LEN + 1));
        assert_eq!(
            parse(&line),
            Err(MalformedLine::FieldTooLong {
                field: Field::Alias,
                len: MAX_NAME_LEN + 1,
                max: MAX_NAME_LEN,
            })
        );
    }

    #[test]
    fn parse_bytes_rejects_invalid_utf8() {
        assert_eq!(
            parse_bytes(b"pdf:\xff:/x;\n"),
            Err(MalformedLine::NotUtf8)
        );
    }
}
