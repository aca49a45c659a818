use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default sidecar file name, relative to the working directory.
pub const COMMENTS_FILE: &str = "comments.csv";

/// Review comments keyed by row number, backed by a two-column CSV file.
///
/// The file is rewritten in full after every change, sorted by row number,
/// so the in-memory map and the file never disagree.
#[derive(Debug, Clone)]
pub struct CommentStore {
    path: PathBuf,
    comments: BTreeMap<usize, String>,
}

impl CommentStore {
    /// Create an empty store that will persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            comments: BTreeMap::new(),
        }
    }

    /// Read comments from `path`. A missing file yields an empty store.
    ///
    /// Blank lines in the file are ignored.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        if !store.path.exists() {
            tracing::debug!(path = %store.path.display(), "no comments file yet");
            return Ok(store);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&store.path)?;

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);

            let key = record.get(0).unwrap_or_default();
            let row = key
                .trim()
                .parse::<usize>()
                .map_err(|_| store.malformed(line, format!("invalid row number '{}'", key)))?;
            let text = record
                .get(1)
                .ok_or_else(|| store.malformed(line, "missing comment text".to_string()))?;

            store.comments.insert(row, text.to_string());
        }

        tracing::debug!(
            path = %store.path.display(),
            count = store.comments.len(),
            "loaded comments"
        );
        Ok(store)
    }

    /// Rewrite the whole file, one `row,text` record per comment.
    pub fn save(&self) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&self.path)?;

        for (row, text) in &self.comments {
            writer.write_record([row.to_string().as_str(), text.as_str()])?;
        }
        writer.flush()?;

        tracing::info!(
            path = %self.path.display(),
            count = self.comments.len(),
            "saved comments"
        );
        Ok(())
    }

    /// Append `text` to the comment on `row` and persist immediately.
    ///
    /// An existing comment comes first, separated by a newline. The combined
    /// text is trimmed before it is stored.
    pub fn add(&mut self, row: usize, text: &str) -> Result<()> {
        let mut comment = self.comments.remove(&row).unwrap_or_default();
        if !comment.is_empty() {
            comment.push('\n');
        }
        comment.push_str(text);

        self.comments.insert(row, comment.trim().to_string());
        self.save()
    }

    /// The comment on `row`, if there is a non-empty one.
    pub fn get(&self, row: usize) -> Option<&str> {
        self.comments
            .get(&row)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.comments.iter().map(|(row, text)| (*row, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, line: u64, reason: String) -> Error {
        Error::MalformedComments {
            path: self.path.clone(),
            line,
            reason,
        }
    }
}
