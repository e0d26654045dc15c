//! Text-building consumers: malformed input becomes U+FFFD.

use alloc::string::String;
use core::{convert::Infallible, fmt};

use crate::{
    decode::{decode, finish},
    handler::{CharHandler, Chars},
    state::State,
};

impl CharHandler for String {
    type Error = Infallible;

    #[inline]
    fn handle_char(&mut self, ch: char) -> Result<(), Self::Error> {
        self.push(ch);
        Ok(())
    }

    fn handle_error(&mut self) -> Result<(), Self::Error> {
        self.push(char::REPLACEMENT_CHARACTER);
        Ok(())
    }

    #[inline]
    fn handle_ascii(&mut self, ascii: u8) -> Result<(), Self::Error> {
        self.push(char::from(ascii));
        Ok(())
    }
}

/// Writes decoded text into any [`fmt::Write`], substituting U+FFFD for each
/// malformed sequence.
///
/// ```
/// use utf8modem::{Chars, Lossy, Utf8Decoder};
///
/// let mut out = String::new();
/// let mut decoder = Utf8Decoder::new(Chars(Lossy(&mut out)));
/// decoder.feed(b"\xF0\x9F\x98")?;
/// decoder.feed(b"\x80 \xC0!")?;
/// decoder.finish()?;
/// assert_eq!(out, "\u{1F600} \u{FFFD}!");
/// # Ok::<(), core::fmt::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lossy<W>(pub W);

impl<W> Lossy<W> {
    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: fmt::Write> CharHandler for Lossy<W> {
    type Error = fmt::Error;

    #[inline]
    fn handle_char(&mut self, ch: char) -> Result<(), Self::Error> {
        self.0.write_char(ch)
    }

    fn handle_error(&mut self) -> Result<(), Self::Error> {
        self.0.write_char(char::REPLACEMENT_CHARACTER)
    }
}

/// Decodes a complete byte buffer, replacing every malformed sequence with
/// one U+FFFD.
///
/// The number of replacements matches [`String::from_utf8_lossy`] except for
/// surrogate encodings, where `0xED 0xA0..=0xBF` and an optional trailing
/// continuation byte yield a single U+FFFD.
///
/// ```
/// use utf8modem::decode_lossy;
///
/// assert_eq!(decode_lossy(b"ok \xE2\x82 \xED\xA0\x80"), "ok \u{FFFD} \u{FFFD}");
/// ```
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut handler = Chars(&mut text);
    let Ok(state) = decode(State::INITIAL, bytes, &mut handler);
    let Ok(()) = finish(state, &mut handler);
    text
}
