//! # Presentation Layer
//!
//! Formatting of rows, comments and the prompt for the review loop.
//!
//! Views implement [`std::fmt::Display`] and take [`FormatOptions`] so the
//! same code produces colored terminal output and plain text for tests.
//! Views never touch the data they display.

pub mod formatters;
pub mod views;

pub use formatters::FormatOptions;
pub use views::{CommentView, RowView};
