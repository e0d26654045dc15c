//! The byte-event protocol driven by the decoder.
//!
//! [`ByteHandler`] exposes every event the automaton can produce, with the raw
//! bytes involved. Most consumers only care about scalar values and "there was
//! an error": they implement [`CharHandler`] and wrap themselves in [`Chars`].
//!
//! Every input byte is accounted for exactly once across the events of a
//! stream: in a valid sequence, as a prefix error, among the bytes consumed by
//! a continuation error, or as an ignored byte. The `next` byte carried by a
//! continuation error is *not* consumed by that event; the decoder restarts at
//! it (or, for a surrogate prefix, reports it as ignored).

use crate::code_point::{code_point_2, code_point_3, code_point_4};

/// The `next` argument of a continuation error raised because the stream
/// ended rather than because a wrong byte arrived.
pub const END_OF_STREAM: Option<u8> = None;

/// Receives the byte-level events of a UTF-8 decode.
///
/// Each callback may fail with [`ByteHandler::Error`]; the decoder stops and
/// propagates the first failure. Handlers that never fail use
/// [`core::convert::Infallible`].
pub trait ByteHandler {
    /// Error returned to abort decoding.
    type Error;

    /// A valid 1-byte sequence, `b1` in `0x00..=0x7F`.
    fn handle_ascii(&mut self, b1: u8) -> Result<(), Self::Error>;

    /// A valid 2-byte sequence. See [`crate::code_point_2`].
    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Self::Error>;

    /// A valid 3-byte sequence. See [`crate::code_point_3`].
    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Self::Error>;

    /// A valid 4-byte sequence. See [`crate::code_point_4`].
    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Self::Error>;

    /// A byte that can never start a sequence: `0x80..=0xC1` or `0xF5..=0xFF`.
    fn handle_prefix_error(&mut self, b1: u8) -> Result<(), Self::Error>;

    /// The byte after lead `b1` is not an admissible continuation, or the
    /// stream ended ([`END_OF_STREAM`]).
    fn handle_continuation_error_1(&mut self, b1: u8, next: Option<u8>) -> Result<(), Self::Error>;

    /// The third byte of a 3- or 4-byte sequence is not a continuation, or the
    /// stream ended.
    fn handle_continuation_error_2(
        &mut self,
        b1: u8,
        b2: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error>;

    /// The fourth byte of a 4-byte sequence is not a continuation, or the
    /// stream ended.
    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error>;

    /// A trailing byte of a sequence whose error was already reported: the
    /// second and third bytes of a surrogate encoding.
    fn handle_ignored_byte(&mut self, b: u8) -> Result<(), Self::Error> {
        let _ = b;
        Ok(())
    }
}

impl<H: ByteHandler + ?Sized> ByteHandler for &mut H {
    type Error = H::Error;

    #[inline]
    fn handle_ascii(&mut self, b1: u8) -> Result<(), Self::Error> {
        (**self).handle_ascii(b1)
    }

    #[inline]
    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Self::Error> {
        (**self).handle_2_bytes(b1, b2)
    }

    #[inline]
    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Self::Error> {
        (**self).handle_3_bytes(b1, b2, b3)
    }

    #[inline]
    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Self::Error> {
        (**self).handle_4_bytes(b1, b2, b3, b4)
    }

    fn handle_prefix_error(&mut self, b1: u8) -> Result<(), Self::Error> {
        (**self).handle_prefix_error(b1)
    }

    fn handle_continuation_error_1(
        &mut self,
        b1: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        (**self).handle_continuation_error_1(b1, next)
    }

    fn handle_continuation_error_2(
        &mut self,
        b1: u8,
        b2: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        (**self).handle_continuation_error_2(b1, b2, next)
    }

    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        (**self).handle_continuation_error_3(b1, b2, b3, next)
    }

    fn handle_ignored_byte(&mut self, b: u8) -> Result<(), Self::Error> {
        (**self).handle_ignored_byte(b)
    }
}

/// Receives decoded scalar values and collapsed errors.
///
/// Wrap an implementation in [`Chars`] to drive it from the decoder.
pub trait CharHandler {
    /// Error returned to abort decoding.
    type Error;

    /// A valid scalar value.
    fn handle_char(&mut self, ch: char) -> Result<(), Self::Error>;

    /// A malformed sequence. Emitted once per replacement marker a
    /// reference decoder would produce.
    fn handle_error(&mut self) -> Result<(), Self::Error>;

    /// A valid ASCII byte; override for a cheaper ASCII path.
    #[inline]
    fn handle_ascii(&mut self, ascii: u8) -> Result<(), Self::Error> {
        self.handle_char(char::from(ascii))
    }
}

impl<H: CharHandler + ?Sized> CharHandler for &mut H {
    type Error = H::Error;

    #[inline]
    fn handle_char(&mut self, ch: char) -> Result<(), Self::Error> {
        (**self).handle_char(ch)
    }

    fn handle_error(&mut self) -> Result<(), Self::Error> {
        (**self).handle_error()
    }

    #[inline]
    fn handle_ascii(&mut self, ascii: u8) -> Result<(), Self::Error> {
        (**self).handle_ascii(ascii)
    }
}

/// Adapts a [`CharHandler`] to the [`ByteHandler`] protocol.
///
/// Valid sequences are reconstructed into `char`s; every prefix and
/// continuation error becomes one [`CharHandler::handle_error`]; ignored
/// bytes are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chars<H>(pub H);

impl<H> Chars<H> {
    /// Returns the wrapped handler.
    pub fn into_inner(self) -> H {
        self.0
    }
}

impl<H: CharHandler> Chars<H> {
    #[inline]
    fn scalar(&mut self, value: u32) -> Result<(), H::Error> {
        // The decoder only reports sequences it validated.
        match char::from_u32(value) {
            Some(ch) => self.0.handle_char(ch),
            None => self.0.handle_error(),
        }
    }
}

impl<H: CharHandler> ByteHandler for Chars<H> {
    type Error = H::Error;

    #[inline]
    fn handle_ascii(&mut self, b1: u8) -> Result<(), Self::Error> {
        self.0.handle_ascii(b1)
    }

    #[inline]
    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Self::Error> {
        self.scalar(code_point_2(b1, b2))
    }

    #[inline]
    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Self::Error> {
        self.scalar(code_point_3(b1, b2, b3))
    }

    #[inline]
    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Self::Error> {
        self.scalar(code_point_4(b1, b2, b3, b4))
    }

    fn handle_prefix_error(&mut self, _b1: u8) -> Result<(), Self::Error> {
        self.0.handle_error()
    }

    fn handle_continuation_error_1(
        &mut self,
        _b1: u8,
        _next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.0.handle_error()
    }

    fn handle_continuation_error_2(
        &mut self,
        _b1: u8,
        _b2: u8,
        _next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.0.handle_error()
    }

    fn handle_continuation_error_3(
        &mut self,
        _b1: u8,
        _b2: u8,
        _b3: u8,
        _next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.0.handle_error()
    }
}
