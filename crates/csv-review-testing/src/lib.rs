//! Testing infrastructure for csv-review integration tests.
//!
//! - `TestWorld`: isolated working directory plus CLI execution with piped input
//! - `fixtures`: sample CSV documents
//! - `assertions`: checks against the comments file a session leaves behind
//! - `process`: a running CLI with an open stdin, for signal handling

pub mod assertions;
pub mod fixtures;
pub mod process;
pub mod world;

pub use process::BackgroundProcess;
pub use world::{CliResult, TestWorld};
