//! Fail-fast decoding: the first malformation aborts with a [`Utf8Error`].

use alloc::string::String;

use crate::{
    decode::{decode, finish},
    error::{StrictError, Utf8Error},
    handler::{ByteHandler, Chars},
    state::State,
};

/// Wraps a [`ByteHandler`] so that the first error event stops decoding with
/// [`StrictError::Invalid`]. Valid sequences are forwarded unchanged.
///
/// Ignored bytes only ever follow a reported error, so they never reach the
/// wrapped handler.
///
/// ```
/// use utf8modem::{Chars, State, Strict, StrictError, Utf8Error, decode};
///
/// let mut text = String::new();
/// let mut strict = Strict(Chars(&mut text));
/// let err = decode(State::INITIAL, b"ok\xFFno", &mut strict).unwrap_err();
/// assert_eq!(err, StrictError::Invalid(Utf8Error::InvalidLead { byte: 0xFF }));
/// assert_eq!(text, "ok");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strict<H>(pub H);

impl<H> Strict<H> {
    /// Returns the wrapped handler.
    pub fn into_inner(self) -> H {
        self.0
    }
}

impl<H: ByteHandler> ByteHandler for Strict<H> {
    type Error = StrictError<H::Error>;

    #[inline]
    fn handle_ascii(&mut self, b1: u8) -> Result<(), Self::Error> {
        self.0.handle_ascii(b1).map_err(StrictError::Handler)
    }

    #[inline]
    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Self::Error> {
        self.0.handle_2_bytes(b1, b2).map_err(StrictError::Handler)
    }

    #[inline]
    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Self::Error> {
        self.0.handle_3_bytes(b1, b2, b3).map_err(StrictError::Handler)
    }

    #[inline]
    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Self::Error> {
        self.0
            .handle_4_bytes(b1, b2, b3, b4)
            .map_err(StrictError::Handler)
    }

    fn handle_prefix_error(&mut self, b1: u8) -> Result<(), Self::Error> {
        Err(Utf8Error::InvalidLead { byte: b1 }.into())
    }

    fn handle_continuation_error_1(&mut self, b1: u8, next: Option<u8>) -> Result<(), Self::Error> {
        Err(Utf8Error::continuation(&[b1], next).into())
    }

    fn handle_continuation_error_2(
        &mut self,
        b1: u8,
        b2: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        Err(Utf8Error::continuation(&[b1, b2], next).into())
    }

    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        Err(Utf8Error::continuation(&[b1, b2, b3], next).into())
    }
}

/// Decodes a complete byte buffer, failing on the first malformed sequence.
///
/// Unlike [`core::str::from_utf8`], the error describes the offending bytes
/// rather than a position.
///
/// ```
/// use utf8modem::{Utf8Error, decode_strict};
///
/// assert_eq!(decode_strict("d\u{e9}j\u{e0}".as_bytes()).as_deref(), Ok("d\u{e9}j\u{e0}"));
/// assert!(matches!(
///     decode_strict(b"\xE2\x82"),
///     Err(Utf8Error::Truncated { .. })
/// ));
/// ```
///
/// # Errors
///
/// Returns the first [`Utf8Error`] found in `bytes`, including a sequence
/// left incomplete at the end.
pub fn decode_strict(bytes: &[u8]) -> Result<String, Utf8Error> {
    let mut text = String::with_capacity(bytes.len());
    let mut handler = Strict(Chars(&mut text));
    let state = decode(State::INITIAL, bytes, &mut handler).map_err(invalid)?;
    finish(state, &mut handler).map_err(invalid)?;
    Ok(text)
}

fn invalid(err: StrictError<core::convert::Infallible>) -> Utf8Error {
    match err {
        StrictError::Invalid(err) => err,
        StrictError::Handler(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use rstest::rstest;

    use super::*;
    use crate::error::Sequence;

    #[rstest]
    #[case::lead(b"ab\x80", Utf8Error::InvalidLead { byte: 0x80 })]
    #[case::overlong(b"\xE0\x9F\x80", Utf8Error::InvalidContinuation {
        sequence: Sequence::new(&[0xE0]),
        found: 0x9F,
    })]
    #[case::third(b"\xF0\x9F\x41", Utf8Error::InvalidContinuation {
        sequence: Sequence::new(&[0xF0, 0x9F]),
        found: 0x41,
    })]
    #[case::fourth(b"\xF0\x9F\x98\xF0", Utf8Error::InvalidContinuation {
        sequence: Sequence::new(&[0xF0, 0x9F, 0x98]),
        found: 0xF0,
    })]
    #[case::surrogate(b"\xED\xB0\x80", Utf8Error::InvalidContinuation {
        sequence: Sequence::new(&[0xED]),
        found: 0xB0,
    })]
    #[case::truncated(b"x\xE2\x82", Utf8Error::Truncated {
        sequence: Sequence::new(&[0xE2, 0x82]),
    })]
    fn reports_first_error(#[case] bytes: &[u8], #[case] expected: Utf8Error) {
        assert_eq!(decode_strict(bytes), Err(expected));
    }

    #[test]
    fn fails_exactly_when_lossy_substitutes() {
        let inputs: [&[u8]; 6] = [
            b"",
            "\u{10FFFF}\u{7FF}".as_bytes(),
            b"\xC2",
            b"\xF4\x8F\xBF\xBF",
            b"\xF8\x88\x80\x80\x80",
            b"\xEF\xBF\xBD",
        ];
        for bytes in inputs {
            let lossy = crate::decode_lossy(bytes);
            let valid = core::str::from_utf8(bytes).is_ok();
            assert_eq!(decode_strict(bytes).is_ok(), valid, "{bytes:02X?}");
            if valid {
                assert_eq!(decode_strict(bytes).as_deref(), Ok(lossy.as_str()));
            }
        }
    }

    #[test]
    fn handler_errors_are_wrapped() {
        struct Refuse;

        impl ByteHandler for Refuse {
            type Error = &'static str;

            fn handle_ascii(&mut self, _: u8) -> Result<(), Self::Error> {
                Err("no ascii")
            }
            fn handle_2_bytes(&mut self, _: u8, _: u8) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_3_bytes(&mut self, _: u8, _: u8, _: u8) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_4_bytes(&mut self, _: u8, _: u8, _: u8, _: u8) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_prefix_error(&mut self, _: u8) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_continuation_error_1(&mut self, _: u8, _: Option<u8>) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_continuation_error_2(
                &mut self,
                _: u8,
                _: u8,
                _: Option<u8>,
            ) -> Result<(), Self::Error> {
                Ok(())
            }
            fn handle_continuation_error_3(
                &mut self,
                _: u8,
                _: u8,
                _: u8,
                _: Option<u8>,
            ) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let err = decode(State::INITIAL, "\u{e9}a".as_bytes(), &mut Strict(Refuse)).unwrap_err();
        assert_eq!(err, StrictError::Handler("no ascii"));
        assert_eq!(err.to_string(), "handler error: no ascii");
    }
}
