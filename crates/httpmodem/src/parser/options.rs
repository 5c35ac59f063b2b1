use crate::arena::DEFAULT_ARENA_CAPACITY;

/// Configuration for a parsing context and its tokenizer.
///
/// # Examples
///
/// ```rust
/// use httpmodem::{HttpModem, Message, ParserOptions};
///
/// let options = ParserOptions {
///     arena_capacity: 16 * 1024,
///     ..Default::default()
/// };
/// let modem = HttpModem::service(|_: &Message<'_>| {}, options);
/// assert!(modem.arena().capacity() >= 16 * 1024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Initial size of the context's arena, in bytes.
    ///
    /// The arena grows past this size when a message needs more, and keeps
    /// the grown buffer for later messages. Zero selects the default.
    ///
    /// # Default
    ///
    /// `4096`
    pub arena_capacity: usize,

    /// Upper bound on the bytes of a start line plus header section (and of
    /// a chunked trailer section).
    ///
    /// # Default
    ///
    /// `80 * 1024`
    pub max_head_size: usize,

    /// Upper bound on a declared `Content-Length` or a single chunk size.
    ///
    /// Bodies with a declared length are assembled into a buffer allocated
    /// up front, so this is also the largest single arena allocation a peer
    /// can cause.
    ///
    /// # Default
    ///
    /// `8 * 1024 * 1024`
    pub max_content_length: u64,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            max_head_size: 80 * 1024,
            max_content_length: 8 * 1024 * 1024,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
