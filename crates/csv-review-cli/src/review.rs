//! The interactive review loop.
//!
//! A [`ReviewSession`] owns the cursor and the comment store. Each iteration
//! renders the current row if it changed since the last render, prints the
//! prompt, reads one line and applies the parsed [`Command`]. Comments are
//! saved before the next prompt appears.

use crate::presentation::{CommentView, FormatOptions, RowView};
use anyhow::{Context, Result};
use csv_review_core::{CommentStore, RowSet};
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::num::IntErrorKind;

/// One line of reviewer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line, nothing to do
    Empty,
    Quit,
    /// Render the current row again
    Show,
    Next,
    Previous,
    /// Append text to the current row's comment
    Comment(String),
    /// Jump to a row number, not yet range-checked
    Jump(i64),
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input {
            "" => Command::Empty,
            "q" => Command::Quit,
            "s" => Command::Show,
            "n" => Command::Next,
            "p" => Command::Previous,
            _ if input.starts_with('c') => {
                let text = input.split_once(' ').map(|(_, text)| text).unwrap_or("");
                Command::Comment(text.to_string())
            }
            _ => match input.parse::<i64>() {
                Ok(number) => Command::Jump(number),
                Err(err) => match err.kind() {
                    IntErrorKind::PosOverflow => Command::Jump(i64::MAX),
                    IntErrorKind::NegOverflow => Command::Jump(i64::MIN),
                    _ => Command::Unknown(input.to_string()),
                },
            },
        }
    }
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ReviewSession<'a> {
    rows: &'a RowSet,
    comments: CommentStore,
    options: FormatOptions,
    current_row: usize,
    last_shown: Option<usize>,
}

impl<'a> ReviewSession<'a> {
    /// Start on the first data row with nothing rendered yet.
    pub fn new(rows: &'a RowSet, comments: CommentStore, options: FormatOptions) -> Self {
        Self {
            rows,
            comments,
            options,
            current_row: rows.first_data_row(),
            last_shown: None,
        }
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    /// Drive the loop until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<()> {
        let mut line = String::new();
        loop {
            self.render_if_needed(out)?;
            self.prompt(out)?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out, "\nbye")?;
                break;
            }

            if self.apply(Command::parse(&line), out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Render the current row and its comment unless it is already on screen.
    pub fn render_if_needed<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.last_shown == Some(self.current_row) {
            return Ok(());
        }

        if let Some(row) = self.rows.get(self.current_row) {
            write!(out, "{}", RowView::new(row, &self.options))?;
        }
        if let Some(comment) = self.comments.get(self.current_row) {
            write!(out, "{}", CommentView::new(comment, &self.options))?;
        }
        self.last_shown = Some(self.current_row);
        Ok(())
    }

    pub fn prompt<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.options.enable_color {
            write!(out, "{} >> ", self.current_row.bold())?;
        } else {
            write!(out, "{} >> ", self.current_row)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn apply<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        tracing::trace!(?command, row = self.current_row, "applying command");

        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Show => self.last_shown = None,
            Command::Next => {
                if self.current_row >= self.rows.last_row() {
                    writeln!(out, "@end")?;
                } else {
                    self.current_row += 1;
                }
            }
            Command::Previous => {
                if self.current_row <= self.rows.first_data_row() {
                    writeln!(out, "@begin")?;
                } else {
                    self.current_row -= 1;
                }
            }
            Command::Comment(text) => {
                self.comments.add(self.current_row, &text).with_context(|| {
                    format!(
                        "failed to save comment for row {} to {}",
                        self.current_row,
                        self.comments.path().display()
                    )
                })?;
            }
            Command::Jump(number) => {
                if self.rows.is_jumpable(number) {
                    self.current_row = number as usize;
                } else {
                    writeln!(
                        out,
                        "Rows are numbered {}-{}",
                        self.rows.first_data_row(),
                        self.rows.last_row()
                    )?;
                }
            }
            Command::Unknown(input) => writeln!(out, "Didn't understand '{}'", input)?,
        }

        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv_review_core::{COMMENTS_FILE, load_rows};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        rows: RowSet,
        comments_path: std::path::PathBuf,
    }

    impl Fixture {
        fn new(csv: &str, header: usize) -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let comments_path = temp_dir.path().join(COMMENTS_FILE);
            let rows = load_rows(csv.as_bytes(), header).expect("Failed to load rows");
            Self {
                _temp_dir: temp_dir,
                rows,
                comments_path,
            }
        }

        fn session(&self) -> ReviewSession<'_> {
            let comments = CommentStore::load(&self.comments_path).expect("Failed to load comments");
            ReviewSession::new(&self.rows, comments, FormatOptions::plain())
        }
    }

    fn apply(session: &mut ReviewSession<'_>, input: &str) -> String {
        let mut out = Vec::new();
        session
            .apply(Command::parse(input), &mut out)
            .expect("command failed");
        String::from_utf8(out).unwrap()
    }

    fn run(session: &mut ReviewSession<'_>, input: &str) -> String {
        let mut out = Vec::new();
        session
            .run(input.as_bytes(), &mut out)
            .expect("session failed");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  \n"), Command::Empty);
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse("s"), Command::Show);
        assert_eq!(Command::parse(" n "), Command::Next);
        assert_eq!(Command::parse("p"), Command::Previous);
        assert_eq!(Command::parse("42"), Command::Jump(42));
        assert_eq!(Command::parse("-1"), Command::Jump(-1));
        assert_eq!(
            Command::parse("99999999999999999999"),
            Command::Jump(i64::MAX)
        );
        assert_eq!(Command::parse("xyz"), Command::Unknown("xyz".to_string()));
        assert_eq!(Command::parse("quit"), Command::Unknown("quit".to_string()));
    }

    #[test]
    fn test_parse_comment_takes_text_after_first_space() {
        assert_eq!(
            Command::parse("c hello  world \n"),
            Command::Comment("hello  world".to_string())
        );
        assert_eq!(Command::parse("c"), Command::Comment(String::new()));
        assert_eq!(
            Command::parse("cat food"),
            Command::Comment("food".to_string())
        );
    }

    #[test]
    fn test_starts_on_first_data_row() {
        let fixture = Fixture::new("h1\nh2\n1\n2\n", 2);
        let session = fixture.session();
        assert_eq!(session.current_row(), 3);
    }

    #[test]
    fn test_next_stops_at_end() {
        let fixture = Fixture::new("a,b\n1,2\n3,4\n", 1);
        let mut session = fixture.session();

        assert_eq!(apply(&mut session, "n"), "");
        assert_eq!(session.current_row(), 3);
        assert_eq!(apply(&mut session, "n"), "@end\n");
        assert_eq!(session.current_row(), 3);
    }

    #[test]
    fn test_previous_stops_at_first_data_row() {
        let fixture = Fixture::new("h1\nh2\n1\n2\n", 2);
        let mut session = fixture.session();

        assert_eq!(apply(&mut session, "p"), "@begin\n");
        assert_eq!(session.current_row(), 3);

        apply(&mut session, "4");
        assert_eq!(apply(&mut session, "p"), "");
        assert_eq!(session.current_row(), 3);
    }

    #[test]
    fn test_jump_out_of_range_keeps_cursor() {
        let fixture = Fixture::new("a,b\n1,2\n3,4\n", 1);
        let mut session = fixture.session();

        assert_eq!(apply(&mut session, "7"), "Rows are numbered 2-3\n");
        assert_eq!(apply(&mut session, "1"), "Rows are numbered 2-3\n");
        assert_eq!(apply(&mut session, "0"), "Rows are numbered 2-3\n");
        assert_eq!(session.current_row(), 2);

        assert_eq!(apply(&mut session, "3"), "");
        assert_eq!(session.current_row(), 3);
    }

    #[test]
    fn test_unknown_input_is_reported() {
        let fixture = Fixture::new("a\n1\n", 1);
        let mut session = fixture.session();

        assert_eq!(apply(&mut session, "zz"), "Didn't understand 'zz'\n");
        assert_eq!(session.current_row(), 2);
    }

    #[test]
    fn test_comments_accumulate_on_current_row() {
        let fixture = Fixture::new("a,b\n1,2\n3,4\n", 1);
        let mut session = fixture.session();

        apply(&mut session, "3");
        apply(&mut session, "c world");
        apply(&mut session, "c again");

        assert_eq!(session.comments().get(3), Some("world\nagain"));
        let reloaded = CommentStore::load(&fixture.comments_path).unwrap();
        assert_eq!(reloaded.get(3), Some("world\nagain"));
    }

    #[test]
    fn test_run_renders_once_per_row_change() {
        let fixture = Fixture::new("a,b\n1,2\n3,4\n", 1);
        let mut session = fixture.session();

        let output = run(&mut session, "\n\nn\nq\n");

        assert_eq!(output.matches("a:\t1").count(), 1);
        assert_eq!(output.matches("a:\t3").count(), 1);
        assert!(output.contains("2 >> "));
        assert!(output.contains("3 >> "));
        assert!(!output.contains("bye"));
    }

    #[test]
    fn test_show_forces_rerender() {
        let fixture = Fixture::new("a\nx\n", 1);
        let mut session = fixture.session();

        let output = run(&mut session, "s\nq\n");
        assert_eq!(output.matches("a:\tx").count(), 2);
    }

    #[test]
    fn test_end_of_input_says_bye() {
        let fixture = Fixture::new("a\nx\n", 1);
        let mut session = fixture.session();

        let output = run(&mut session, "n\n");
        assert!(output.ends_with("@end\n2 >> \nbye\n"));
    }

    #[test]
    fn test_existing_comment_shown_with_row() {
        let fixture = Fixture::new("a\nx\ny\n", 1);
        std::fs::write(&fixture.comments_path, "3,check this\n").unwrap();
        let mut session = fixture.session();

        let output = run(&mut session, "n\nq\n");
        assert_eq!(output.matches("Comment: check this").count(), 1);
        let comment_at = output.find("Comment: check this").unwrap();
        assert!(comment_at > output.find("a:\ty").unwrap());
    }

    #[test]
    fn test_new_comment_appears_after_rerender() {
        let fixture = Fixture::new("a\nx\n", 1);
        let mut session = fixture.session();

        let output = run(&mut session, "c first pass\ns\nq\n");
        assert_eq!(output.matches("Comment: first pass").count(), 1);
    }
}
