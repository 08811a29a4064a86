//! Options shared by the scanner and the parser

/// What to do once an error has been found
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ErrorMode {
    /// Stop at the first error, reporting only it
    #[default]
    FailFast,
    /// Keep scanning and parsing after errors, reporting all of them together
    CollectAll,
}

/// Configuration for a single parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    pub mode: ErrorMode,
    /// The deepest nesting of grammar productions allowed before parsing gives up
    pub max_depth: usize,
}

impl ParseConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            mode: ErrorMode::default(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
