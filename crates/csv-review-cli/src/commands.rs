use crate::args::Cli;
use crate::logging;
use crate::presentation::FormatOptions;
use crate::review::ReviewSession;
use anyhow::{Context, Result};
use csv_review_core::{CommentStore, Config, load_rows, open_csv, resolve_comments_path};
use std::io::{self, Write};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let comments_path = resolve_comments_path(cli.comments.as_deref(), &config);
    tracing::debug!(comments = %comments_path.display(), "resolved comments file");

    let reader = open_csv(&cli.csvfile)
        .with_context(|| format!("failed to open {}", cli.csvfile.display()))?;
    let rows = load_rows(reader, cli.header)
        .with_context(|| format!("failed to read {}", cli.csvfile.display()))?;

    // Stdout is not locked for the whole session so the interrupt handler can still print.
    let mut stdout = io::stdout();
    if rows.is_empty() {
        writeln!(stdout, "No data rows")?;
        return Ok(());
    }
    writeln!(
        stdout,
        "{} rows, numbered {}-{}",
        rows.data_row_count(),
        rows.first_data_row(),
        rows.last_row()
    )?;

    let comments = CommentStore::load(&comments_path).context("failed to load comments")?;

    install_interrupt_handler()?;

    let options = FormatOptions {
        enable_color: cli.color.enabled(),
        wrap_width: cli.width.unwrap_or(config.wrap_width),
    };
    let mut session = ReviewSession::new(&rows, comments, options);
    session.run(io::stdin().lock(), &mut stdout)
}

/// Ctrl+C ends the session like end of input. Comments are already on disk.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        let mut stdout = io::stdout();
        let _ = writeln!(stdout, "\nbye");
        let _ = stdout.flush();
        std::process::exit(0);
    })
    .context("failed to install Ctrl+C handler")
}
