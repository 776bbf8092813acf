pub const DEFAULT_CHUNK_SIZE: usize = 4096;
pub const DEFAULT_STORE_BASELINE: usize = 4096;
pub const DEFAULT_MAX_KEY_LEN: usize = 1024;
pub const DEFAULT_MAX_NUMBER_LEN: usize = 64;
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables of a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Size in bytes of the read-ahead chunk pulled from the reader.
    pub chunk_size: usize,
    /// Capacity of each buffer in the value store.
    pub store_baseline: usize,
    /// Longest accepted key or bare word, in bytes.
    pub max_key_len: usize,
    /// Longest accepted number literal, in bytes.
    pub max_number_len: usize,
    /// Deepest accepted nesting of `{` and `[`.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            store_baseline: DEFAULT_STORE_BASELINE,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_number_len: DEFAULT_MAX_NUMBER_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Zero is bumped to one, a chunk must hold at least a byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn with_store_baseline(mut self, store_baseline: usize) -> Self {
        self.store_baseline = store_baseline.max(1);
        self
    }

    #[must_use]
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    #[must_use]
    pub fn with_max_number_len(mut self, max_number_len: usize) -> Self {
        self.max_number_len = max_number_len;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
