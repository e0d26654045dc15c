use core::fmt;

use bstr::BStr;
use thiserror::Error;

/// The bytes of a multi-byte sequence consumed before it failed (1..=3).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sequence {
    bytes: [u8; 3],
    len: u8,
}

impl Sequence {
    pub(crate) fn new(prefix: &[u8]) -> Self {
        debug_assert!((1..=3).contains(&prefix.len()));
        let mut bytes = [0; 3];
        let len = prefix.len().min(3);
        bytes[..len].copy_from_slice(&prefix[..len]);
        #[expect(clippy::cast_possible_truncation)]
        let len = len as u8;
        Self { bytes, len }
    }

    /// The consumed bytes, lead byte first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(self.as_bytes()), f)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(self.as_bytes()), f)
    }
}

/// The first malformation met by a strict decode.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Error {
    /// A byte that can never start a sequence.
    #[error("invalid lead byte {byte:#04x}")]
    InvalidLead {
        /// The offending byte.
        byte: u8,
    },
    /// A byte that cannot continue `sequence`, including overlong,
    /// surrogate and out-of-range encodings.
    #[error("invalid continuation byte {found:#04x} after {sequence}")]
    InvalidContinuation {
        /// Bytes consumed before the failure.
        sequence: Sequence,
        /// The byte that broke the sequence.
        found: u8,
    },
    /// The input ended inside `sequence`.
    #[error("truncated sequence {sequence} at end of input")]
    Truncated {
        /// Bytes consumed before the input ended.
        sequence: Sequence,
    },
}

impl Utf8Error {
    pub(crate) fn continuation(prefix: &[u8], next: Option<u8>) -> Self {
        let sequence = Sequence::new(prefix);
        match next {
            Some(found) => Utf8Error::InvalidContinuation { sequence, found },
            None => Utf8Error::Truncated { sequence },
        }
    }
}

/// Error of a handler wrapped in [`crate::Strict`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StrictError<E> {
    /// The input was malformed.
    #[error(transparent)]
    Invalid(#[from] Utf8Error),
    /// The wrapped handler failed.
    #[error("handler error: {0}")]
    Handler(E),
}

/// Error of the [`std::io::Read`] driven entry points.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum StreamError<E> {
    /// Reading from the byte source failed.
    #[error("failed to read from byte source")]
    Io(#[from] std::io::Error),
    /// The handler stopped decoding.
    #[error("handler error: {0}")]
    Handler(E),
}
