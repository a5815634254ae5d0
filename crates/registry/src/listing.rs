use std::fmt;

use crate::error::Result;
use crate::record::{normalize_type, Record};
use crate::store::Registry;

pub const HEADERS: [&str; 3] = ["Type", "Alias", "Location"];

/// Result of [`Registry::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Bordered table, one row per matching record.
    Table { rows: usize, rendered: String },
    /// Nothing matched; `filter` is the normalized type filter, if any.
    Empty { filter: Option<String> },
}

impl Listing {
    #[must_use]
    pub const fn rows(&self) -> usize {
        match self {
            Self::Table { rows, .. } => *rows,
            Self::Empty { .. } => 0,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { rendered, .. } => f.write_str(rendered),
            Self::Empty { filter: None } => writeln!(f, "No documents found."),
            Self::Empty {
                filter: Some(kind),
            } => writeln!(f, "No documents of type '{kind}' found."),
        }
    }
}

/// Printed width of each column, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub kind: usize,
    pub alias: usize,
    pub location: usize,
}

impl ColumnWidths {
    fn headers() -> Self {
        Self {
            kind: HEADERS[0].len(),
            alias: HEADERS[1].len(),
            location: HEADERS[2].len(),
        }
    }

    fn widen(&mut self, record: &Record) {
        self.kind = self.kind.max(record.kind.chars().count());
        self.alias = self.alias.max(record.alias.chars().count());
        self.location = self.location.max(record.location.chars().count());
    }

    fn separator(&self) -> String {
        let mut line = String::from("+");
        for width in [self.kind, self.alias, self.location] {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    }

    fn row(&self, cells: [&str; 3]) -> String {
        let widths = [self.kind, self.alias, self.location];
        let mut line = String::new();
        for (cell, width) in cells.into_iter().zip(widths) {
            line.push_str(&format!("| {cell:<width$} "));
        }
        line.push_str("|\n");
        line
    }
}

impl Registry {
    /// Renders the records whose type equals `type_filter` (lowercased), or
    /// all records when no filter is given.
    pub fn list(&self, type_filter: Option<&str>) -> Result<Listing> {
        let filter = type_filter.map(normalize_type).transpose()?;

        let mut widths = ColumnWidths::headers();
        let mut matched = 0usize;
        for record in self.matching(filter.as_deref())? {
            widths.widen(&record?);
            matched += 1;
        }
        if matched == 0 {
            return Ok(Listing::Empty { filter });
        }

        let separator = widths.separator();
        let mut rendered = separator.clone();
        rendered.push_str(&widths.row(HEADERS));
        rendered.push_str(&separator);
        let mut rows = 0usize;
        for record in self.matching(filter.as_deref())? {
            let record = record?;
            rendered.push_str(&widths.row([
                record.kind.as_str(),
                record.alias.as_str(),
                record.location.as_str(),
            ]));
            rows += 1;
        }
        rendered.push_str(&separator);

        log::debug!("Listed {rows} record(s) from {}", self.path().display());
        Ok(Listing::Table { rows, rendered })
    }

    /// Matching records collected in file order.
    pub fn records(&self, type_filter: Option<&str>) -> Result<Vec<Record>> {
        let filter = type_filter.map(normalize_type).transpose()?;
        self.matching(filter.as_deref())?.collect()
    }

    fn matching(
        &self,
        filter: Option<&str>,
    ) -> Result<impl Iterator<Item = Result<Record>>> {
        let filter = filter.map(str::to_owned);
        Ok(self
            .scan()?
            .records()
            .filter(move |record| match (record, &filter) {
                (Ok(record), Some(kind)) => record.kind == *kind,
                _ => true,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn registry_with(content: &str) -> (TempDir, Registry) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry");
        std::fs::write(&path, content).unwrap();
        (dir, Registry::new(path))
    }

    #[test]
    fn renders_bordered_table_in_file_order() {
        let (_dir, registry) =
            registry_with("pdf:report:/docs/report.pdf;\nimg:logo:/assets/logo.png;\n");
        let listing = registry.list(None).unwrap();
        assert_eq!(listing.rows(), 2);
        assert_eq!(
            listing.to_string(),
            "\
+------+--------+------------------+
| Type | Alias  | Location         |
+------+--------+------------------+
| pdf  | report | /docs/report.pdf |
| img  | logo   | /assets/logo.png |
+------+--------+------------------+
"
        );
    }

    #[test]
    fn headers_are_never_truncated() {
        let (_dir, registry) = registry_with("a:b:c;\n");
        assert_eq!(
            registry.list(None).unwrap().to_string(),
            "\
+------+-------+----------+
| Type | Alias | Location |
+------+-------+----------+
| a    | b     | c        |
+------+-------+----------+
"
        );
    }

    #[test]
    fn filter_is_case_insensitive_on_the_query() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::new(dir.path().join("registry"));
        registry.append("pdf", "one", "/1.pdf").unwrap();
        registry.append("PDF", "two", "/2.pdf").unwrap();
        registry.append("txt", "three", "/3.txt").unwrap();

        let records = registry.records(Some("Pdf")).unwrap();
        let aliases: Vec<_> = records.iter().map(|r| r.alias.as_str()).collect();
        assert_eq!(aliases, vec!["one", "two"]);

        let listing = registry.list(Some("pdf")).unwrap();
        assert_eq!(listing.rows(), 2);
        assert!(!listing.to_string().contains("three"));
    }

    #[test]
    fn malformed_lines_do_not_affect_widths_or_rows() {
        let (_dir, registry) =
            registry_with("pdf:a:/a;\nthis line is far longer than any real column\npdf:b\n");
        let Listing::Table { rows, rendered } = registry.list(None).unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(rows, 1);
        assert!(rendered.starts_with("+------+-------+----------+\n"));
    }

    #[test]
    fn empty_results_produce_a_notice() {
        let (_dir, registry) = registry_with("");
        let listing = registry.list(None).unwrap();
        assert_eq!(listing, Listing::Empty { filter: None });
        assert_eq!(listing.to_string(), "No documents found.\n");

        let (_dir, registry) = registry_with("txt:a:/a;\n");
        let listing = registry.list(Some("PDF")).unwrap();
        assert_eq!(listing.to_string(), "No documents of type 'pdf' found.\n");
    }

    #[test]
    fn oversized_filter_is_rejected() {
        let (_dir, registry) = registry_with("");
        let err = registry.list(Some("x".repeat(128).as_str())).unwrap_err();
        assert!(err.is_validation());
    }
}
