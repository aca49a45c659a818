//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated working directory
//! - Writing CSV and config files into it
//! - Running the CLI there with scripted reviewer input
//! - Spawning it with an open stdin for interactive checks

use crate::process::BackgroundProcess;
use anyhow::Result;
use assert_cmd::Command;
use csv_review_core::COMMENTS_FILE;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use csv_review_testing::TestWorld;
///
/// let world = TestWorld::new().with_csv("data.csv", "a,b\n1,2\n");
///
/// let result = world.run_with_input(&["data.csv"], "c looks fine\nq\n").unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            cwd: temp_dir.path().to_path_buf(),
            temp_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Default comments file location for the current working directory.
    pub fn comments_path(&self) -> PathBuf {
        self.cwd.join(COMMENTS_FILE)
    }

    /// Change the current working directory (relative to temp root).
    pub fn enter_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        let new_cwd = self.temp_dir.path().join(path);
        std::fs::create_dir_all(&new_cwd).expect("Failed to create directory");
        self.cwd = new_cwd;
        self
    }

    /// Write a file relative to the current working directory.
    pub fn with_file(self, name: &str, content: &str) -> Self {
        self.write_file(name, content);
        self
    }

    /// Write a CSV file relative to the current working directory.
    pub fn with_csv(self, name: &str, content: &str) -> Self {
        self.with_file(name, content)
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a file without consuming self.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.cwd.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Read a file relative to the current working directory.
    pub fn read_file(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.cwd.join(name))?)
    }

    /// Build a CLI command with this test environment's settings.
    ///
    /// Color is turned off and inherited `CSV_REVIEW_COMMENTS` / `RUST_LOG`
    /// are cleared so output does not depend on the host.
    #[allow(deprecated)]
    pub fn command(&self, args: &[&str]) -> std::process::Command {
        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("csv-review"));
        cmd.arg("--color").arg("never");
        cmd.current_dir(&self.cwd);
        cmd.env_remove("CSV_REVIEW_COMMENTS").env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd.args(args);
        cmd
    }

    /// Execute the binary with no reviewer input (stdin closed immediately).
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_input(args, "")
    }

    /// Execute the binary, feeding `input` to stdin as reviewer commands.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Result<CliResult> {
        let mut cmd = Command::from_std(self.command(args));
        cmd.write_stdin(input.to_string());

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Start the binary with an open stdin for interactive tests.
    pub fn spawn(&self, args: &[&str]) -> Result<BackgroundProcess> {
        Ok(BackgroundProcess::spawn_interactive(self.command(args))?)
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
