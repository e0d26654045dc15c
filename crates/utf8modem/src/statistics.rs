//! Counting handler for sniffing whether a byte stream is UTF-8.

use core::convert::Infallible;

use crate::handler::{ByteHandler, END_OF_STREAM};

/// A [`ByteHandler`] that counts valid and malformed sequences.
///
/// Feed it through [`crate::decode`] (or a [`crate::Utf8Decoder`]) and call
/// [`crate::finish`] at the end so a trailing truncated sequence is counted.
///
/// ```
/// use utf8modem::{Statistics, Utf8Decoder};
///
/// let mut decoder = Utf8Decoder::new(Statistics::default());
/// decoder.feed("na\u{ef}ve caf\u{e9}".as_bytes())?;
/// decoder.feed(b"\xE2\x82")?;
/// let stats = decoder.finish()?;
/// assert_eq!(stats.count_valid(), 2);
/// assert_eq!(stats.count_invalid(), 1);
/// assert_eq!(stats.count_invalid_ignoring_truncation(), 0);
/// assert!(stats.looks_like_utf8());
/// # Ok::<(), core::convert::Infallible>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    ascii: u64,
    two_byte: u64,
    three_byte: u64,
    four_byte: u64,
    prefix_errors: u64,
    continuation_errors: u64,
    truncations: u64,
    ignored: u64,
}

impl Statistics {
    /// Clears every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Bytes in `0x00..=0x7F` decoded as ASCII.
    #[must_use]
    pub const fn count_ascii(&self) -> u64 {
        self.ascii
    }

    /// Valid multi-byte sequences of `len` bytes (2, 3 or 4); zero for any
    /// other length.
    #[must_use]
    pub const fn count_sequences(&self, len: usize) -> u64 {
        match len {
            2 => self.two_byte,
            3 => self.three_byte,
            4 => self.four_byte,
            _ => 0,
        }
    }

    /// Valid multi-byte sequences of any length.
    #[must_use]
    pub const fn count_valid(&self) -> u64 {
        self.two_byte + self.three_byte + self.four_byte
    }

    /// Bytes that can never start a sequence.
    #[must_use]
    pub const fn count_prefix_errors(&self) -> u64 {
        self.prefix_errors
    }

    /// Sequences broken by a wrong byte, not counting truncation at the end.
    #[must_use]
    pub const fn count_continuation_errors(&self) -> u64 {
        self.continuation_errors
    }

    /// Sequences cut short by the end of the stream.
    #[must_use]
    pub const fn count_truncations(&self) -> u64 {
        self.truncations
    }

    /// Trailing bytes of surrogate encodings, skipped after their error.
    #[must_use]
    pub const fn count_ignored(&self) -> u64 {
        self.ignored
    }

    /// Every malformed sequence, including truncations.
    #[must_use]
    pub const fn count_invalid(&self) -> u64 {
        self.count_invalid_ignoring_truncation() + self.truncations
    }

    /// Malformed sequences that more input could not have fixed.
    #[must_use]
    pub const fn count_invalid_ignoring_truncation(&self) -> u64 {
        self.prefix_errors + self.continuation_errors
    }

    /// Tests if the counted bytes look like UTF-8: more than ten valid
    /// multi-byte sequences per error, ignoring truncation.
    ///
    /// Pure ASCII input has no evidence either way and does not look like
    /// UTF-8.
    #[must_use]
    pub const fn looks_like_utf8(&self) -> bool {
        self.count_valid() > self.count_invalid_ignoring_truncation().saturating_mul(10)
    }

    fn continuation_error(&mut self, next: Option<u8>) {
        if next == END_OF_STREAM {
            self.truncations += 1;
        } else {
            self.continuation_errors += 1;
        }
    }
}

impl ByteHandler for Statistics {
    type Error = Infallible;

    #[inline]
    fn handle_ascii(&mut self, _b1: u8) -> Result<(), Self::Error> {
        self.ascii += 1;
        Ok(())
    }

    fn handle_2_bytes(&mut self, _b1: u8, _b2: u8) -> Result<(), Self::Error> {
        self.two_byte += 1;
        Ok(())
    }

    fn handle_3_bytes(&mut self, _b1: u8, _b2: u8, _b3: u8) -> Result<(), Self::Error> {
        self.three_byte += 1;
        Ok(())
    }

    fn handle_4_bytes(&mut self, _b1: u8, _b2: u8, _b3: u8, _b4: u8) -> Result<(), Self::Error> {
        self.four_byte += 1;
        Ok(())
    }

    fn handle_prefix_error(&mut self, _b1: u8) -> Result<(), Self::Error> {
        self.prefix_errors += 1;
        Ok(())
    }

    fn handle_continuation_error_1(&mut self, _b1: u8, next: Option<u8>) -> Result<(), Self::Error> {
        self.continuation_error(next);
        Ok(())
    }

    fn handle_continuation_error_2(
        &mut self,
        _b1: u8,
        _b2: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.continuation_error(next);
        Ok(())
    }

    fn handle_continuation_error_3(
        &mut self,
        _b1: u8,
        _b2: u8,
        _b3: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.continuation_error(next);
        Ok(())
    }

    fn handle_ignored_byte(&mut self, _b: u8) -> Result<(), Self::Error> {
        self.ignored += 1;
        Ok(())
    }
}
