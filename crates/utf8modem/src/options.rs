/// Default read buffer length of the stream entry points.
pub const DEFAULT_BUFFER_LEN: usize = 8 * 1024;

/// Smallest read buffer that can hold a whole UTF-8 sequence.
pub const MIN_BUFFER_LEN: usize = 4;

/// Configuration of the [`std::io::Read`] driven entry points.
///
/// # Examples
///
/// ```rust
/// use utf8modem::{StreamOptions, Validity, classify_stream_with};
///
/// let options = StreamOptions {
///     buffer_len: 16,
///     ..Default::default()
/// };
/// let input = "\u{1F980}".repeat(10);
/// let validity = classify_stream_with(input.as_bytes(), options)?;
/// assert_eq!(validity, Validity::Utf8);
/// # Ok::<(), std::io::Error>(())
/// ```
///
/// # Default
///
/// An 8 KiB buffer reused through the per-thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamOptions {
    /// Length of the read buffer.
    ///
    /// Larger buffers mean fewer `read` calls. The classifier needs room for
    /// a carried-over partial sequence plus at least one new byte, so values
    /// below [`MIN_BUFFER_LEN`] are raised to it.
    ///
    /// # Default
    ///
    /// [`DEFAULT_BUFFER_LEN`]
    pub buffer_len: usize,

    /// Whether to borrow the read buffer from a per-thread pool instead of
    /// allocating one per call.
    ///
    /// The pooled buffer is taken out of its slot for the duration of the
    /// call, so a nested call on the same thread simply allocates. Buffers
    /// larger than [`DEFAULT_BUFFER_LEN`] are freed after the call.
    ///
    /// # Default
    ///
    /// `true`
    pub reuse_scratch: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            buffer_len: DEFAULT_BUFFER_LEN,
            reuse_scratch: true,
        }
    }
}

impl StreamOptions {
    /// The buffer length actually used, never below [`MIN_BUFFER_LEN`].
    #[must_use]
    pub const fn effective_buffer_len(&self) -> usize {
        if self.buffer_len < MIN_BUFFER_LEN {
            MIN_BUFFER_LEN
        } else {
            self.buffer_len
        }
    }
}
