use crate::presentation::formatters::FormatOptions;
use crate::presentation::formatters::text::wrap;
use csv_review_core::Row;
use owo_colors::OwoColorize;
use std::fmt;

/// Blank lines printed above the divider so consecutive rows stand apart.
const SEPARATOR_LINES: usize = 8;

/// View for displaying a single row
///
/// Short values render inline as `Label:\tValue`. A value that still spans
/// several lines after wrapping renders as a block with blank lines around it.
/// Empty values are skipped.
pub struct RowView<'a> {
    pub row: &'a Row,
    pub options: &'a FormatOptions,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a Row, options: &'a FormatOptions) -> Self {
        Self { row, options }
    }
}

impl fmt::Display for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "\n".repeat(SEPARATOR_LINES))?;
        let divider = "#".repeat(self.options.wrap_width);
        if self.options.enable_color {
            writeln!(f, "{}", divider.yellow().bold())?;
        } else {
            writeln!(f, "{}", divider)?;
        }

        let mut after_block = false;
        for (label, value) in self.row.iter() {
            let wrapped = wrap(value, self.options.wrap_width);
            let value = wrapped.trim();
            if value.is_empty() {
                continue;
            }

            let is_block = value.contains('\n');
            if after_block || is_block {
                writeln!(f)?;
            }

            let separator = if is_block { "\n" } else { ":\t" };
            if self.options.enable_color {
                writeln!(f, "{}{}{}", label.bold(), separator, value)?;
            } else {
                writeln!(f, "{}{}{}", label, separator, value)?;
            }
            after_block = is_block;
        }

        Ok(())
    }
}

/// View for the comment attached to the row on screen
pub struct CommentView<'a> {
    pub comment: &'a str,
    pub options: &'a FormatOptions,
}

impl<'a> CommentView<'a> {
    pub fn new(comment: &'a str, options: &'a FormatOptions) -> Self {
        Self { comment, options }
    }
}

impl fmt::Display for CommentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        if self.options.enable_color {
            writeln!(f, "{} {}", "Comment:".yellow(), self.comment)?;
        } else {
            writeln!(f, "Comment: {}", self.comment)?;
        }
        writeln!(f)
    }
}
