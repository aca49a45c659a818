//! Row loading with multi-row headers.
//!
//! A CSV file may spread its column names over several leading rows, e.g. a
//! group label row followed by a unit row. [`MultiHeadReader`] folds those rows
//! column-wise into one field name per column and then yields every remaining
//! physical row, blank lines included, as a [`Row`].
//!
//! [`RowSet`] holds the loaded rows prefixed with empty placeholders so that a
//! row's index is the same number the reviewer sees: index 0 is unused,
//! `1..=header` stand for the header rows, data starts at `header + 1`.

use crate::{Error, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// One record as ordered (field name, value) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row by pairing names with cells.
    ///
    /// Pairing stops at whichever side runs out first, so short records leave
    /// trailing fields absent and surplus cells are dropped. A repeated name
    /// keeps its first position and takes the later value.
    pub fn from_cells<'a, N, C>(names: N, cells: C) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        C: IntoIterator<Item = &'a str>,
    {
        let mut row = Row::new();
        for (name, value) in names.into_iter().zip(cells) {
            row.insert(name, value);
        }
        row
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Lazy reader that yields one [`Row`] per physical data row.
///
/// A blank line is a row too: it yields an empty [`Row`] so that row numbers
/// keep matching the line layout of the file. Blank lines inside quoted values
/// belong to their value and are not counted.
pub struct MultiHeadReader {
    reader: csv::Reader<io::Cursor<Vec<u8>>>,
    pending: VecDeque<Physical>,
    content_end: Option<usize>,
    exhausted: bool,
    field_names: Vec<String>,
}

/// One physical row as seen by [`MultiHeadReader`].
enum Physical {
    Blank,
    Record(csv::StringRecord),
}

impl MultiHeadReader {
    /// Read `header` leading rows and combine them into field names.
    ///
    /// Each additional header row is appended to the names column by column
    /// with a single space and the result is trimmed. The names are cut to the
    /// shortest header row, so a blank header row leaves no names at all.
    pub fn new<R: Read>(mut reader: R, header: usize) -> Result<Self> {
        if header == 0 {
            return Err(Error::InvalidHeaderCount(header));
        }

        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let mut this = Self {
            reader: csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(io::Cursor::new(input)),
            pending: VecDeque::new(),
            content_end: None,
            exhausted: false,
            field_names: Vec::new(),
        };

        let mut field_names = this.next_header(header, 0)?;
        for found in 1..header {
            let parts = this.next_header(header, found)?;
            field_names = field_names
                .iter()
                .zip(parts.iter())
                .map(|(name, part)| format!("{} {}", name, part).trim().to_string())
                .collect();
        }
        this.field_names = field_names;

        Ok(this)
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn next_header(&mut self, expected: usize, found: usize) -> Result<Vec<String>> {
        match self.next_physical()? {
            Some(Physical::Blank) => Ok(Vec::new()),
            Some(Physical::Record(record)) => Ok(record.iter().map(str::to_string).collect()),
            None => Err(Error::MissingHeader { expected, found }),
        }
    }

    fn next_physical(&mut self) -> Result<Option<Physical>> {
        if let Some(physical) = self.pending.pop_front() {
            return Ok(Some(physical));
        }
        if self.exhausted {
            return Ok(None);
        }

        let mut record = csv::StringRecord::new();
        let more = self.reader.read_record(&mut record)?;
        let input = self.reader.get_ref().get_ref();

        if !more {
            self.exhausted = true;
            let blanks = blank_lines(input, self.content_end, input.len());
            self.pending.extend((0..blanks).map(|_| Physical::Blank));
            return Ok(self.pending.pop_front());
        }

        let read_from = record.position().map_or(0, |p| p.byte() as usize);
        let start = skip_terminators(input, read_from);
        let end = trim_terminators(input, start, self.reader.position().byte() as usize);
        let blanks = blank_lines(input, self.content_end, start);
        self.content_end = Some(end);

        self.pending.extend((0..blanks).map(|_| Physical::Blank));
        self.pending.push_back(Physical::Record(record));
        Ok(self.pending.pop_front())
    }
}

impl Iterator for MultiHeadReader {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.next_physical() {
            Ok(Some(Physical::Record(record))) => record,
            Ok(Some(Physical::Blank)) => return Some(Ok(Row::new())),
            Ok(None) => return None,
            Err(err) => return Some(Err(err)),
        };

        if record.len() > self.field_names.len() {
            tracing::debug!(
                line = record.position().map(|p| p.line()),
                extra = record.len() - self.field_names.len(),
                "dropping cells beyond the header width"
            );
        }

        Some(Ok(Row::from_cells(
            self.field_names.iter().map(String::as_str),
            record.iter(),
        )))
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// First byte at or after `from` that is not a line terminator.
fn skip_terminators(input: &[u8], from: usize) -> usize {
    let from = from.min(input.len());
    input[from..]
        .iter()
        .position(|&b| !is_terminator(b))
        .map_or(input.len(), |offset| from + offset)
}

/// End of a record's content once its trailing terminators are cut off.
fn trim_terminators(input: &[u8], start: usize, end: usize) -> usize {
    let mut end = end.min(input.len());
    while end > start && is_terminator(input[end - 1]) {
        end -= 1;
    }
    end
}

/// Number of blank lines between the end of the previous record and `start`.
///
/// `\r\n`, a lone `\r` and a lone `\n` each end one line. The first of them
/// ends the previous record itself; before the first record every one of them
/// ends a blank line.
fn blank_lines(input: &[u8], previous_end: Option<usize>, start: usize) -> usize {
    let from = previous_end.unwrap_or(0);
    let gap = &input[from.min(start)..start];

    let mut lines: usize = 0;
    let mut bytes = gap.iter().peekable();
    while let Some(&byte) = bytes.next() {
        match byte {
            b'\r' => {
                bytes.next_if_eq(&&b'\n');
                lines += 1;
            }
            b'\n' => lines += 1,
            _ => {}
        }
    }

    match previous_end {
        Some(_) => lines.saturating_sub(1),
        None => lines,
    }
}

/// Loaded rows, indexed by user-facing row number.
#[derive(Debug, Clone)]
pub struct RowSet {
    header: usize,
    rows: Vec<Row>,
}

impl RowSet {
    /// Wrap data rows, prefixing `header + 1` empty placeholders.
    pub fn new(header: usize, data: Vec<Row>) -> Self {
        let mut rows = vec![Row::new(); header + 1];
        rows.extend(data);
        Self { header, rows }
    }

    pub fn header(&self) -> usize {
        self.header
    }

    pub fn first_data_row(&self) -> usize {
        self.header + 1
    }

    pub fn last_row(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len() - self.first_data_row()
    }

    pub fn is_empty(&self) -> bool {
        self.data_row_count() == 0
    }

    pub fn get(&self, number: usize) -> Option<&Row> {
        self.rows.get(number)
    }

    /// Whether `number` is a valid jump target.
    ///
    /// Everything from 2 upwards is reachable, which includes the placeholder
    /// rows of a multi-row header.
    pub fn is_jumpable(&self, number: i64) -> bool {
        number >= 2 && number <= self.last_row() as i64
    }
}

/// Load every data row from `reader` into a [`RowSet`].
pub fn load_rows<R: Read>(reader: R, header: usize) -> Result<RowSet> {
    let rows = MultiHeadReader::new(reader, header)?.collect::<Result<Vec<_>>>()?;
    tracing::info!(header, rows = rows.len(), "loaded CSV rows");
    Ok(RowSet::new(header, rows))
}

/// Open a CSV source; `-` means standard input.
pub fn open_csv(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin()));
    }
    Ok(Box::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str, header: usize) -> Result<RowSet> {
        load_rows(text.as_bytes(), header)
    }

    #[test]
    fn test_single_header_numbering() -> Result<()> {
        let rows = load("a,b\n1,2\n3,4\n", 1)?;

        assert_eq!(rows.data_row_count(), 2);
        assert_eq!(rows.first_data_row(), 2);
        assert_eq!(rows.last_row(), 3);
        assert!(rows.get(0).unwrap().is_empty());
        assert!(rows.get(1).unwrap().is_empty());
        assert_eq!(rows.get(2).unwrap().get("a"), Some("1"));
        assert_eq!(rows.get(3).unwrap().get("b"), Some("4"));
        assert!(rows.get(4).is_none());
        Ok(())
    }

    #[test]
    fn test_multi_row_header_is_combined_per_column() -> Result<()> {
        let text = "Name,Score,\n,first,second\nann,1,2\nbob,3,4\ncat,5,6\n";
        let reader = MultiHeadReader::new(text.as_bytes(), 2)?;
        assert_eq!(reader.field_names(), ["Name", "Score first", "second"]);

        let rows = load(text, 2)?;
        assert_eq!(rows.data_row_count(), 3);
        assert_eq!(rows.first_data_row(), 3);
        assert_eq!(rows.last_row(), 5);
        assert_eq!(rows.get(5).unwrap().get("Score first"), Some("5"));
        Ok(())
    }

    #[test]
    fn test_header_is_cut_to_shortest_header_row() -> Result<()> {
        let reader = MultiHeadReader::new("a,b,c\nx,y\n".as_bytes(), 2)?;
        assert_eq!(reader.field_names(), ["a x", "b y"]);
        Ok(())
    }

    #[test]
    fn test_short_row_leaves_trailing_fields_absent() -> Result<()> {
        let rows = load("a,b,c\n1\n", 1)?;
        let row = rows.get(2).unwrap();

        assert_eq!(row.len(), 1);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), None);
        Ok(())
    }

    #[test]
    fn test_extra_cells_are_dropped() -> Result<()> {
        let rows = load("a,b\n1,2,3,4\n", 1)?;
        let row = rows.get(2).unwrap();

        let fields: Vec<_> = row.iter().collect();
        assert_eq!(fields, [("a", "1"), ("b", "2")]);
        Ok(())
    }

    #[test]
    fn test_duplicate_names_keep_first_position_and_last_value() -> Result<()> {
        let rows = load("x,y,x\n1,2,3\n", 1)?;
        let fields: Vec<_> = rows.get(2).unwrap().iter().collect();

        assert_eq!(fields, [("x", "3"), ("y", "2")]);
        Ok(())
    }

    #[test]
    fn test_quoted_values_keep_embedded_newlines() -> Result<()> {
        let rows = load("note\n\"line one\nline two\"\n", 1)?;
        assert_eq!(rows.get(2).unwrap().get("note"), Some("line one\nline two"));
        Ok(())
    }

    #[test]
    fn test_blank_line_is_an_empty_row() -> Result<()> {
        let rows = load("a,b\n1,2\n\n3,4\n", 1)?;

        assert_eq!(rows.last_row(), 4);
        assert_eq!(rows.data_row_count(), 3);
        assert!(rows.get(3).unwrap().is_empty());
        assert_eq!(rows.get(4).unwrap().get("a"), Some("3"));
        Ok(())
    }

    #[test]
    fn test_blank_lines_with_crlf_and_at_end() -> Result<()> {
        let rows = load("a\r\n1\r\n\r\n\r\n2\r\n\r\n", 1)?;

        assert_eq!(rows.last_row(), 6);
        assert_eq!(rows.get(2).unwrap().get("a"), Some("1"));
        assert!(rows.get(3).unwrap().is_empty());
        assert!(rows.get(4).unwrap().is_empty());
        assert_eq!(rows.get(5).unwrap().get("a"), Some("2"));
        assert!(rows.get(6).unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_lines_inside_quotes_are_not_rows() -> Result<()> {
        let rows = load("note\n\"one\n\ntwo\"\nnext\n", 1)?;

        assert_eq!(rows.last_row(), 3);
        assert_eq!(rows.get(2).unwrap().get("note"), Some("one\n\ntwo"));
        assert_eq!(rows.get(3).unwrap().get("note"), Some("next"));
        Ok(())
    }

    #[test]
    fn test_leading_blank_line_is_an_empty_header() -> Result<()> {
        let reader = MultiHeadReader::new("\na,b\n1,2\n".as_bytes(), 1)?;
        assert!(reader.field_names().is_empty());

        let rows = load("\na,b\n1,2\n", 1)?;
        assert_eq!(rows.data_row_count(), 2);
        assert!(rows.get(2).unwrap().is_empty());
        assert!(rows.get(3).unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_header_only_file_has_no_data_rows() -> Result<()> {
        let rows = load("a,b\n", 1)?;
        assert!(rows.is_empty());
        assert_eq!(rows.last_row(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_header_rows() {
        let err = load("a,b\n", 3).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingHeader {
                expected: 3,
                found: 1
            }
        ));

        let err = load("", 1).unwrap_err();
        assert!(matches!(err, Error::MissingHeader { found: 0, .. }));
    }

    #[test]
    fn test_zero_header_rows_rejected() {
        let err = load("a\n1\n", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidHeaderCount(0)));
    }

    #[test]
    fn test_invalid_utf8_is_a_csv_error() {
        let err = load_rows(&b"a,b\n\xff,1\n"[..], 1).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_jump_range() -> Result<()> {
        let rows = load("h1\nh2\nh3\n1\n2\n", 3)?;

        assert_eq!(rows.first_data_row(), 4);
        assert!(!rows.is_jumpable(1));
        assert!(rows.is_jumpable(2));
        assert!(rows.is_jumpable(5));
        assert!(!rows.is_jumpable(6));
        assert!(!rows.is_jumpable(-3));
        Ok(())
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = open_csv(&dir.path().join("absent.csv")).err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }
}
