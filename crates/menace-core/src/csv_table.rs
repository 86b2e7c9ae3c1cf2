// Header-keyed CSV tables.
//
// The source spreadsheets are hand-maintained exports, so parsing is lenient:
// blank lines vanish, short lines pad with empty strings, and nothing here
// ever fails. Consumers decide which rows are usable. Every dataset is read
// the same way, with commas inside double quotes kept as data.

use std::collections::HashMap;

use tracing::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One data line of a table, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// Cell value for `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// Cell value for `column`, `None` when absent or blank.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        let value = self.get(column);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over `(column, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().collect(),
        }
    }
}

/// A parsed table: ordered headers plus one [`Row`] per non-blank data line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse `text` into a [`Table`].
///
/// The first non-blank record is the header row. Each following record
/// becomes a [`Row`] mapping `header[i]` to `value[i]`; missing trailing
/// fields map to `""` and surplus fields are ignored. Commas and line breaks
/// inside double quotes are data, one layer of quotes is stripped, and
/// headers and values are trimmed. Records whose fields are all blank are
/// skipped.
pub fn parse(text: &str) -> Table {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader
        .records()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("skipping unreadable csv record: {e}");
                None
            }
        })
        .filter(|record| record.iter().any(|field| !field.is_empty()));

    let Some(header_record) = records.next() else {
        return Table::default();
    };
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in records {
        if record.len() > headers.len() {
            debug!(
                "row has {} fields for {} headers, ignoring the surplus",
                record.len(),
                headers.len()
            );
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = record.get(i).unwrap_or_default().to_string();
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Table { headers, rows }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
