/// Default limit on how many parentheses may be open at once.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for a single evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub max_depth: usize,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
