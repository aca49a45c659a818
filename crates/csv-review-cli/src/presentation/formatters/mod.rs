pub mod options;
pub mod text;

pub use options::FormatOptions;
