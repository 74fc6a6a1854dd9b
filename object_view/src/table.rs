//! Tabular preview parsing
//!
//! Previews are read as comma-delimited text with a header row. Quoting is
//! handled only by dropping literal `"` characters; embedded commas are not
//! supported.

use serde::{Deserialize, Serialize};

/// Header and leading rows of a delimited text preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewTable {
    /// Column names from the first line
    pub headers: Vec<String>,
    /// Up to `max_rows` lines following the header
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    /// Parses preview text
    ///
    /// Returns None when there is no text to show.
    pub fn parse(text: &str, max_rows: usize) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let mut lines = text.split('\n');
        let headers = split_cells(lines.next().unwrap_or_default());
        let rows = lines.take(max_rows).map(split_cells).collect();
        Some(Self { headers, rows })
    }

    /// Number of header columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.replace('"', "")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_rows() {
        let table = PreviewTable::parse("id,name\n1,alice\n2,bob", 10).unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows, vec![vec!["1", "alice"], vec!["2", "bob"]]);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_quotes_are_stripped() {
        let table = PreviewTable::parse("\"id\",\"name\"\n\"1\",\"a\"\"b\"", 10).unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows[0], vec!["1", "ab"]);
    }

    #[test]
    fn test_row_limit() {
        let text: String = std::iter::once("n".to_string())
            .chain((0..25).map(|i| i.to_string()))
            .collect::<Vec<_>>()
            .join("\n");
        let table = PreviewTable::parse(&text, 10).unwrap();
        assert_eq!(table.rows.len(), 10);
        assert_eq!(table.rows[9], vec!["9"]);
    }

    #[test]
    fn test_header_only() {
        let table = PreviewTable::parse("a,b,c", 10).unwrap();
        assert_eq!(table.column_count(), 3);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(PreviewTable::parse("", 10).is_none());
    }

    #[test]
    fn test_embedded_comma_is_not_respected() {
        let table = PreviewTable::parse("a\n\"x,y\"", 10).unwrap();
        assert_eq!(table.rows[0], vec!["x", "y"]);
    }
}
