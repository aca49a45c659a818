use crate::comments::COMMENTS_FILE;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE: &str = "csv-review.toml";

/// Environment variable overriding the comments file location.
pub const COMMENTS_ENV: &str = "CSV_REVIEW_COMMENTS";

pub const DEFAULT_WRAP_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub comments_file: PathBuf,
    pub wrap_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comments_file: PathBuf::from(COMMENTS_FILE),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load an explicit config file, or `csv-review.toml` from the working directory.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load_from(path),
            None => Self::load_from(Path::new(CONFIG_FILE)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.wrap_width == 0 {
            return Err(Error::Config("wrap_width must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Resolve the comments file path based on priority:
/// 1. Explicit path from the command line
/// 2. CSV_REVIEW_COMMENTS environment variable
/// 3. The config file value (defaults to comments.csv)
pub fn resolve_comments_path(explicit: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(env_path) = std::env::var_os(COMMENTS_ENV)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }

    config.comments_file.clone()
}
