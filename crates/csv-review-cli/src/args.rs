use crate::types::{ColorMode, LogLevel};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csv-review")]
#[command(about = "Step through CSV rows and attach review comments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Number of leading rows that make up the column names
    #[arg(long, default_value = "1", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub header: usize,

    /// Comments file [env: CSV_REVIEW_COMMENTS] [default: comments.csv]
    #[arg(long)]
    pub comments: Option<PathBuf>,

    /// Wrap field values at this many columns [default: 100]
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub width: Option<usize>,

    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Config file [default: csv-review.toml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// CSV file to review, or - for standard input
    pub csvfile: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["csv-review", "data.csv"]).unwrap();

        assert_eq!(cli.header, 1);
        assert_eq!(cli.comments, None);
        assert_eq!(cli.width, None);
        assert_eq!(cli.color, ColorMode::Auto);
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.csvfile, PathBuf::from("data.csv"));
    }

    #[test]
    fn test_header_must_be_positive() {
        assert!(Cli::try_parse_from(["csv-review", "--header", "0", "data.csv"]).is_err());
        let cli = Cli::try_parse_from(["csv-review", "--header", "3", "data.csv"]).unwrap();
        assert_eq!(cli.header, 3);
    }

    #[test]
    fn test_csvfile_is_required() {
        assert!(Cli::try_parse_from(["csv-review"]).is_err());
    }
}
