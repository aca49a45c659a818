//! Assertions on the comments file left behind by a session.

use anyhow::{Context, Result};
use csv_review_core::CommentStore;
use std::path::Path;

/// Assert that the comments file holds exactly `expected`, in row order.
pub fn assert_comments(path: &Path, expected: &[(usize, &str)]) -> Result<()> {
    let store = CommentStore::load(path)
        .with_context(|| format!("Failed to read comments from {}", path.display()))?;
    let actual: Vec<(usize, &str)> = store.iter().collect();

    if actual != expected {
        anyhow::bail!("Expected comments {:?}, got {:?}", expected, actual);
    }

    Ok(())
}

/// Assert that no comments file was written.
pub fn assert_no_comments_file(path: &Path) -> Result<()> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        anyhow::bail!(
            "Expected no comments file at {}, found:\n{}",
            path.display(),
            content
        );
    }
    Ok(())
}
