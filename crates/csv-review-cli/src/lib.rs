// csv-review: step through the rows of a CSV file and annotate them.
//
// Rows are loaded into memory once; the loop only moves a cursor over them.
// Comments are the only mutable state and are written back to the sidecar
// file after every edit, so quitting at any point (including Ctrl+C) loses
// nothing.

mod args;
mod commands;
pub mod logging;
pub mod presentation;
pub mod review;
pub mod types;

pub use args::Cli;
pub use commands::run;
