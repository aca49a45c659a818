use std::fmt;
use std::path::PathBuf;

/// Result type for csv-review-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading rows, comments or configuration
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// CSV parsing or writing failed
    Csv(csv::Error),

    /// Configuration file could not be parsed or is invalid
    Config(String),

    /// Header row count must be at least 1
    InvalidHeaderCount(usize),

    /// The input ended before all header rows were read
    MissingHeader { expected: usize, found: usize },

    /// The comments file contains a record that is not `row,text`
    MalformedComments {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidHeaderCount(count) => {
                write!(f, "Header row count must be at least 1, got {}", count)
            }
            Error::MissingHeader { expected, found } => write!(
                f,
                "Expected {} header row(s), but the input has only {}",
                expected, found
            ),
            Error::MalformedComments { path, line, reason } => write!(
                f,
                "Malformed comments file {} at line {}: {}",
                path.display(),
                line,
                reason
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Config(_)
            | Error::InvalidHeaderCount(_)
            | Error::MissingHeader { .. }
            | Error::MalformedComments { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_message() {
        let err = Error::MissingHeader {
            expected: 3,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Expected 3 header row(s), but the input has only 1"
        );
    }

    #[test]
    fn test_malformed_comments_message_names_file_and_line() {
        let err = Error::MalformedComments {
            path: PathBuf::from("comments.csv"),
            line: 4,
            reason: "invalid row number 'x'".to_string(),
        };
        let msg = err.to_string();

        assert!(msg.contains("comments.csv"));
        assert!(msg.contains("line 4"));
        assert!(msg.contains("invalid row number 'x'"));
    }

    #[test]
    fn test_io_error_has_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("IO error:"));
    }
}
