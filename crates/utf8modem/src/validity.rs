//! Well-formedness classification without handler events.

use crate::state::{LEADS, is_continuation};

/// The UTF-8 validity of a byte range.
///
/// ```
/// use utf8modem::{Validity, classify};
///
/// assert_eq!(classify(b"plain"), Validity::Ascii);
/// assert_eq!(classify("d\u{e9}j\u{e0}".as_bytes()), Validity::Utf8);
/// assert_eq!(classify(b"\xE2\x82"), Validity::Truncated { pending: 2, missing: 1 });
/// assert_eq!(classify(b"\xED\xA0"), Validity::Malformed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validity {
    /// Only bytes in `0x00..=0x7F`.
    Ascii,
    /// Complete, well-formed UTF-8 with at least one multi-byte sequence.
    Utf8,
    /// Well-formed so far, but the range ends inside a multi-byte sequence.
    Truncated {
        /// Trailing bytes of the unfinished sequence (1..=3). These are the
        /// bytes to carry over when more input arrives.
        pending: u8,
        /// Bytes still needed to complete the sequence (1..=3).
        missing: u8,
    },
    /// Malformed UTF-8; no amount of further input can fix it.
    Malformed,
}

impl Validity {
    /// Well-formed and complete: [`Validity::Ascii`] or [`Validity::Utf8`].
    #[must_use]
    pub const fn is_fully_valid(self) -> bool {
        matches!(self, Validity::Ascii | Validity::Utf8)
    }

    /// Well-formed so far, possibly needing more bytes.
    #[must_use]
    pub const fn is_valid_or_truncated(self) -> bool {
        !matches!(self, Validity::Malformed)
    }

    /// Number of trailing bytes to carry into the next read; zero unless
    /// truncated.
    #[must_use]
    pub const fn pending(self) -> usize {
        match self {
            Validity::Truncated { pending, .. } => pending as usize,
            _ => 0,
        }
    }
}

/// Classifies `bytes` as pure ASCII, valid UTF-8, truncated UTF-8 or
/// malformed.
///
/// A sub-range `from..to` of a buffer is classified with
/// `classify(&buffer[from..to])`. The result agrees with decoding the same
/// bytes: [`Validity::is_fully_valid`] holds exactly when decoding through
/// [`crate::finish`] reports no error, and a truncated result is reported only
/// when every byte so far could still begin a valid stream. In particular
/// `0xED` followed by `0xA0..=0xBF` is malformed even at the very end.
#[must_use]
pub fn classify(bytes: &[u8]) -> Validity {
    let Some(first) = bytes.iter().position(|&b| b >= 0x80) else {
        return Validity::Ascii;
    };

    let len = bytes.len();
    let mut i = first;
    while i < len {
        let b1 = bytes[i];
        if b1 < 0x80 {
            i += 1;
            continue;
        }

        let lead = LEADS[b1 as usize];
        let width = lead.width as usize;
        if width < 2 {
            return Validity::Malformed;
        }

        let available = width.min(len - i);
        let sequence = &bytes[i..i + available];
        if let Some(&b2) = sequence.get(1) {
            if b2 < lead.lo || b2 > lead.hi {
                return Validity::Malformed;
            }
        }
        if sequence.iter().skip(2).any(|&b| !is_continuation(b)) {
            return Validity::Malformed;
        }

        if available < width {
            #[expect(clippy::cast_possible_truncation)]
            let (pending, missing) = (available as u8, (width - available) as u8);
            return Validity::Truncated { pending, missing };
        }
        i += width;
    }

    Validity::Utf8
}
