//! A push-style decoder that owns its state and handler.

use crate::{
    decode::{decode, finish, next_state_with_handler},
    handler::ByteHandler,
    state::State,
};

/// Incremental UTF-8 decoder.
///
/// Feed it buffers of any size, split anywhere; every event reaches the
/// handler exactly as if the whole stream had been decoded at once. Call
/// [`Utf8Decoder::finish`] at the end of the stream to report a trailing
/// incomplete sequence and get the handler back.
///
/// ```
/// use utf8modem::{Chars, Utf8Decoder};
///
/// let mut decoder = Utf8Decoder::new(Chars(String::new()));
/// for chunk in [&b"\xE2"[..], b"\x82", b"\xAC", b"5"] {
///     decoder.feed(chunk)?;
/// }
/// assert_eq!(decoder.finish()?.into_inner(), "\u{20ac}5");
/// # Ok::<(), core::convert::Infallible>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder<H> {
    state: State,
    handler: H,
}

impl<H: ByteHandler> Utf8Decoder<H> {
    /// Creates a decoder at the start of a stream.
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self::with_state(State::INITIAL, handler)
    }

    /// Creates a decoder resuming from `state`, as returned by
    /// [`crate::decode`] or [`Utf8Decoder::state`].
    #[must_use]
    pub fn with_state(state: State, handler: H) -> Self {
        Self { state, handler }
    }

    /// Decodes the next buffer of the stream.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the handler. A handler error ends
    /// the stream: events before the failing one were already delivered, so
    /// feeding the same bytes again would repeat them. The stored state is
    /// left as it was before the call.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), H::Error> {
        self.state = decode(self.state, bytes, &mut self.handler)?;
        Ok(())
    }

    /// Decodes a single byte.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the handler.
    pub fn feed_byte(&mut self, byte: u8) -> Result<(), H::Error> {
        self.state = next_state_with_handler(self.state, byte, &mut self.handler)?;
        Ok(())
    }

    /// Ends the stream and returns the handler.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the handler for a trailing incomplete
    /// sequence.
    pub fn finish(mut self) -> Result<H, H::Error> {
        finish(self.state, &mut self.handler)?;
        Ok(self.handler)
    }

    /// Ends the current stream and starts a new one with the same handler.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the handler for a trailing incomplete
    /// sequence; the decoder is reset either way.
    pub fn reset(&mut self) -> Result<(), H::Error> {
        let state = core::mem::take(&mut self.state);
        finish(state, &mut self.handler)
    }
}

impl<H> Utf8Decoder<H> {
    /// The state reached after the last fed byte.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Tests if the stream currently ends inside a multi-byte sequence.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.state.is_incomplete()
    }

    /// The handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Returns the handler without ending the stream; a pending incomplete
    /// sequence is dropped unreported.
    pub fn into_inner(self) -> H {
        self.handler
    }
}

#[cfg(feature = "std")]
impl<H> std::io::Write for Utf8Decoder<H>
where
    H: ByteHandler,
    H::Error: core::error::Error + Send + Sync + 'static,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.feed(buf).map_err(std::io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
