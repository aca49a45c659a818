//! Core of csv-review: loading rows, persisting comments, reading configuration.
//!
//! The terminal front end lives in the `csv-review` crate; everything here is
//! free of terminal I/O so it can be tested against in-memory readers and
//! temporary files.

pub mod comments;
pub mod config;
pub mod error;
pub mod loader;

pub use comments::{COMMENTS_FILE, CommentStore};
pub use config::{Config, resolve_comments_path};
pub use error::{Error, Result};
pub use loader::{MultiHeadReader, Row, RowSet, load_rows, open_csv};
