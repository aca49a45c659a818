use csv_review_core::config::DEFAULT_WRAP_WIDTH;

/// Display formatting options
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub enable_color: bool,
    /// Column at which field values wrap; also the divider width
    pub wrap_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl FormatOptions {
    pub fn plain() -> Self {
        Self {
            enable_color: false,
            ..Self::default()
        }
    }
}
