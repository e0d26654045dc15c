//! The decoding automaton.
//!
//! A [`State`] is a single `i32` that is opaque beyond a handful of
//! predicates:
//!
//! - zero is the initial state ("no partial sequence pending"); it is also the
//!   state left behind by U+0000, and the two behave identically;
//! - any other non-negative value is the scalar value completed by the most
//!   recent transition;
//! - negative values are either *incomplete* (continuation bytes are pending)
//!   or *errors*, one of which is the distinguished surrogate-prefix error.
//!
//! Completed and error states carry no memory of the sequence that produced
//! them: [`next_state`] treats them exactly like [`State::INITIAL`].
//!
//! Layout (private, may change): the sign bit marks non-scalar states. For
//! incomplete states bit 30 is clear, bits 24..26 hold the number of pending
//! bytes (1..=3) and bits 0..24 hold the pending bytes themselves, oldest in
//! the most significant position. Error states set bit 30; the surrogate
//! prefix additionally sets bit 29.

use core::fmt;

/// Width and first-continuation bounds of a byte when it appears at a
/// sequence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lead {
    /// Total sequence length, `1` for ASCII and `0` for bytes that can never
    /// start a sequence.
    pub(crate) width: u8,
    /// Lowest admissible first continuation byte.
    pub(crate) lo: u8,
    /// Highest admissible first continuation byte.
    pub(crate) hi: u8,
}

const fn lead(byte: u8) -> Lead {
    const fn lead_of(width: u8, lo: u8, hi: u8) -> Lead {
        Lead { width, lo, hi }
    }
    match byte {
        0x00..=0x7F => lead_of(1, 0, 0),
        0xC2..=0xDF => lead_of(2, 0x80, 0xBF),
        // overlong below U+0800
        0xE0 => lead_of(3, 0xA0, 0xBF),
        // surrogates U+D800..=U+DFFF
        0xED => lead_of(3, 0x80, 0x9F),
        0xE1..=0xEF => lead_of(3, 0x80, 0xBF),
        // overlong below U+10000
        0xF0 => lead_of(4, 0x90, 0xBF),
        0xF1..=0xF3 => lead_of(4, 0x80, 0xBF),
        // above U+10FFFF
        0xF4 => lead_of(4, 0x80, 0x8F),
        // continuation bytes, 0xC0, 0xC1, 0xF5..=0xFF
        _ => lead_of(0, 0, 0),
    }
}

/// Lead-byte table shared by the automaton, the inline decode path and the
/// validity classifier.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const LEADS: [Lead; 256] = {
    let mut table = [lead(0x80); 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = lead(byte as u8);
        byte += 1;
    }
    table
};

/// Returns `true` for bytes in the generic continuation range `0x80..=0xBF`.
#[inline(always)]
#[must_use]
pub const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

const SIGN: u32 = 0x8000_0000;
const ERROR_FLAG: u32 = 0x4000_0000;
const SURROGATE_FLAG: u32 = 0x2000_0000;
const PENDING_SHIFT: u32 = 24;
const PENDING_MASK: u32 = 0x00FF_FFFF;

/// The state of the UTF-8 automaton between two bytes.
///
/// Obtain states from [`State::INITIAL`] and [`next_state`] (or the
/// handler-driven entry points in [`crate::decode`]); inspect them only
/// through the predicates below.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct State(i32);

impl State {
    /// No partial sequence pending.
    pub const INITIAL: State = State(0);

    /// The byte sequence seen since the last boundary is malformed.
    pub(crate) const ERROR: State = State::from_bits(SIGN | ERROR_FLAG);

    /// `0xED` followed by `0xA0..=0xBF`: can only ever encode a surrogate.
    pub(crate) const SURROGATE_PREFIX: State =
        State::from_bits(SIGN | ERROR_FLAG | SURROGATE_FLAG);

    #[expect(clippy::cast_possible_wrap)]
    const fn from_bits(bits: u32) -> State {
        State(bits as i32)
    }

    #[expect(clippy::cast_sign_loss)]
    const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// A completed state for a scalar value the caller has validated.
    #[expect(clippy::cast_possible_wrap)]
    pub(crate) const fn scalar(value: u32) -> State {
        State(value as i32)
    }

    /// An incomplete state holding `len` pending bytes packed into `bytes`.
    const fn pending(len: u32, bytes: u32) -> State {
        debug_assert!(matches!(len, 1..=3));
        State::from_bits(SIGN | len << PENDING_SHIFT | (bytes & PENDING_MASK))
    }

    /// Tests if at least one more continuation byte is needed before a
    /// scalar value or an error is known.
    #[inline]
    #[must_use]
    pub const fn is_incomplete(self) -> bool {
        self.bits() & (SIGN | ERROR_FLAG) == SIGN
    }

    /// Tests if this state corresponds to a malformed byte sequence.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.bits() & (SIGN | ERROR_FLAG) == SIGN | ERROR_FLAG
    }

    /// Tests if this state is the two-byte prefix of a surrogate encoding,
    /// i.e. `0xED` followed by a byte in `0xA0..=0xBF`.
    #[inline]
    #[must_use]
    pub const fn is_surrogate_prefix_error(self) -> bool {
        self.0 == State::SURROGATE_PREFIX.0
    }

    /// Tests if this state is the initial state or a completed scalar value.
    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 >= 0
    }

    /// The scalar value completed by the most recent transition.
    ///
    /// Returns `None` for incomplete and error states. The initial state
    /// reports U+0000, which it cannot be told apart from.
    #[must_use]
    pub const fn code_point(self) -> Option<char> {
        if self.0 < 0 {
            return None;
        }
        char::from_u32(self.bits())
    }

    /// Number of bytes held by an incomplete state, zero otherwise.
    #[inline]
    pub(crate) const fn pending_len(self) -> u32 {
        if self.is_incomplete() {
            (self.bits() >> PENDING_SHIFT) & 0x3
        } else {
            0
        }
    }

    /// The pending bytes of an incomplete state, oldest first.
    ///
    /// Only the first [`State::pending_len`] entries are meaningful.
    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn pending_bytes(self) -> [u8; 3] {
        let len = self.pending_len();
        let packed = self.bits() & PENDING_MASK;
        let mut out = [0u8; 3];
        let mut i = 0;
        while i < len {
            out[i as usize] = (packed >> (8 * (len - 1 - i))) as u8;
            i += 1;
        }
        out
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_incomplete() {
            let bytes = self.pending_bytes();
            let len = self.pending_len() as usize;
            return write!(f, "Incomplete({:02X?})", &bytes[..len]);
        }
        if self.is_surrogate_prefix_error() {
            return f.write_str("SurrogatePrefix");
        }
        if self.is_error() {
            return f.write_str("Error");
        }
        match self.bits() {
            0 => f.write_str("Initial"),
            value => write!(f, "Complete(U+{value:04X})"),
        }
    }
}

/// Returns the initial state. Equivalent to [`State::INITIAL`].
#[inline]
#[must_use]
pub const fn initial_state() -> State {
    State::INITIAL
}

/// Returns the next automaton state given a previous state and a next byte.
///
/// If the result is complete it holds a legal, non-surrogate scalar value;
/// otherwise it is an incomplete or error state. A byte that breaks an
/// incomplete sequence yields an error state and is *not* reinterpreted as the
/// start of a new sequence: use [`crate::next_state_with_handler`] for that.
///
/// ```
/// use utf8modem::{State, next_state};
///
/// let s = next_state(State::INITIAL, 0xE2);
/// assert!(s.is_incomplete());
/// let s = next_state(next_state(s, 0x82), 0xAC);
/// assert_eq!(s.code_point(), Some('€'));
/// ```
#[inline]
#[must_use]
pub const fn next_state(state: State, byte: u8) -> State {
    if state.is_incomplete() {
        continue_sequence(state, byte)
    } else {
        start_sequence(byte)
    }
}

#[inline]
const fn start_sequence(byte: u8) -> State {
    match LEADS[byte as usize].width {
        0 => State::ERROR,
        1 => State::scalar(byte as u32),
        _ => State::pending(1, byte as u32),
    }
}

const fn continue_sequence(state: State, byte: u8) -> State {
    let len = state.pending_len();
    let packed = state.bits() & PENDING_MASK;
    let first = (packed >> (8 * (len - 1))) & 0xFF;
    let lead = LEADS[first as usize];
    let (lo, hi) = if len == 1 {
        (lead.lo, lead.hi)
    } else {
        (0x80, 0xBF)
    };

    if byte < lo || byte > hi {
        if len == 1 && first == 0xED && is_continuation(byte) {
            return State::SURROGATE_PREFIX;
        }
        return State::ERROR;
    }

    let packed = packed << 8 | byte as u32;
    if len + 1 < lead.width as u32 {
        return State::pending(len + 1, packed);
    }

    #[expect(clippy::cast_possible_truncation)]
    let value = match lead.width {
        2 => crate::code_point_2((packed >> 8) as u8, packed as u8),
        3 => crate::code_point_3((packed >> 16) as u8, (packed >> 8) as u8, packed as u8),
        _ => crate::code_point_4(
            (packed >> 24) as u8,
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        ),
    };
    State::scalar(value)
}
