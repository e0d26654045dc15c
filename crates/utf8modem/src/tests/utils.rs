use alloc::{boxed::Box, string::String, vec::Vec};
use core::convert::Infallible;

use quickcheck::{Arbitrary, Gen};

use crate::{ByteHandler, State, decode, finish, is_continuation, next_state_with_handler};

/// One handler callback, with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Ascii(u8),
    Two(u8, u8),
    Three(u8, u8, u8),
    Four(u8, u8, u8, u8),
    Prefix(u8),
    Cont1(u8, Option<u8>),
    Cont2(u8, u8, Option<u8>),
    Cont3(u8, u8, u8, Option<u8>),
    Ignored(u8),
}

impl Event {
    /// Input bytes this event accounts for. The `next` byte of a
    /// continuation error is not one of them.
    pub fn consumed(self) -> usize {
        match self {
            Event::Ascii(_) | Event::Prefix(_) | Event::Cont1(..) | Event::Ignored(_) => 1,
            Event::Two(..) | Event::Cont2(..) => 2,
            Event::Three(..) | Event::Cont3(..) => 3,
            Event::Four(..) => 4,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Event::Prefix(_) | Event::Cont1(..) | Event::Cont2(..) | Event::Cont3(..)
        )
    }

    pub fn is_truncation(self) -> bool {
        matches!(
            self,
            Event::Cont1(_, None) | Event::Cont2(_, _, None) | Event::Cont3(_, _, _, None)
        )
    }
}

/// Records every callback in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder(pub Vec<Event>);

impl ByteHandler for Recorder {
    type Error = Infallible;

    fn handle_ascii(&mut self, b1: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Ascii(b1));
        Ok(())
    }

    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Two(b1, b2));
        Ok(())
    }

    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Three(b1, b2, b3));
        Ok(())
    }

    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Four(b1, b2, b3, b4));
        Ok(())
    }

    fn handle_prefix_error(&mut self, b1: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Prefix(b1));
        Ok(())
    }

    fn handle_continuation_error_1(&mut self, b1: u8, next: Option<u8>) -> Result<(), Self::Error> {
        self.0.push(Event::Cont1(b1, next));
        Ok(())
    }

    fn handle_continuation_error_2(
        &mut self,
        b1: u8,
        b2: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.0.push(Event::Cont2(b1, b2, next));
        Ok(())
    }

    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> Result<(), Self::Error> {
        self.0.push(Event::Cont3(b1, b2, b3, next));
        Ok(())
    }

    fn handle_ignored_byte(&mut self, b: u8) -> Result<(), Self::Error> {
        self.0.push(Event::Ignored(b));
        Ok(())
    }
}

/// Decodes `bytes` in one buffer and finishes; returns the events and the
/// state before finishing.
pub fn events(bytes: &[u8]) -> (Vec<Event>, State) {
    let mut recorder = Recorder::default();
    let Ok(state) = decode(State::INITIAL, bytes, &mut recorder);
    let Ok(()) = finish(state, &mut recorder);
    (recorder.0, state)
}

/// Decodes `bytes` one [`next_state_with_handler`] step at a time.
pub fn events_bytewise(bytes: &[u8]) -> (Vec<Event>, State) {
    let mut recorder = Recorder::default();
    let mut state = State::INITIAL;
    for &byte in bytes {
        let Ok(next) = next_state_with_handler(state, byte, &mut recorder);
        state = next;
    }
    let Ok(()) = finish(state, &mut recorder);
    (recorder.0, state)
}

/// Decodes `bytes` split at the positions derived from `splits`.
pub fn events_chunked(bytes: &[u8], splits: &[usize]) -> (Vec<Event>, State) {
    let mut recorder = Recorder::default();
    let mut state = State::INITIAL;
    let mut rest = bytes;
    for &split in splits {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(split % (rest.len() + 1));
        let Ok(next) = decode(state, chunk, &mut recorder);
        state = next;
        rest = tail;
    }
    let Ok(next) = decode(state, rest, &mut recorder);
    state = next;
    let Ok(()) = finish(state, &mut recorder);
    (recorder.0, state)
}

/// Lossy decoding built on `core::str::from_utf8`: one U+FFFD per maximal
/// invalid subpart, except that `0xED 0xA0..=0xBF` plus an optional
/// continuation byte is a single U+FFFD.
pub fn reference_lossy(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = bytes;
    loop {
        let err = match core::str::from_utf8(rest) {
            Ok(text) => {
                out.push_str(text);
                return out;
            }
            Err(err) => err,
        };
        let (valid, invalid) = rest.split_at(err.valid_up_to());
        out.push_str(core::str::from_utf8(valid).unwrap());
        out.push(char::REPLACEMENT_CHARACTER);

        let surrogate = invalid[0] == 0xED && invalid.get(1).is_some_and(|b| (0xA0..=0xBF).contains(b));
        let skip = if surrogate {
            if invalid.get(2).copied().is_some_and(is_continuation) {
                3
            } else {
                2
            }
        } else {
            err.error_len().unwrap_or(invalid.len())
        };
        rest = &invalid[skip..];
    }
}

/// Byte strings biased towards UTF-8: encoded scalars, truncated
/// encodings, boundary bytes and noise.
#[derive(Debug, Clone)]
pub struct Mixed(pub Vec<u8>);

const INTERESTING: &[u8] = &[
    0x00, 0x7F, 0x80, 0x8F, 0x90, 0x9F, 0xA0, 0xBF, 0xC0, 0xC1, 0xC2, 0xDF, 0xE0, 0xED, 0xEF,
    0xF0, 0xF4, 0xF5, 0xFF,
];

impl Arbitrary for Mixed {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (g.size() + 1);
        let mut bytes = Vec::new();
        for _ in 0..len {
            match u8::arbitrary(g) % 5 {
                0 => bytes.push(u8::arbitrary(g)),
                1 => bytes.extend(g.choose(INTERESTING).copied()),
                2 => {
                    let mut buf = [0u8; 4];
                    let encoded = char::arbitrary(g).encode_utf8(&mut buf).len();
                    let keep = 1 + usize::arbitrary(g) % encoded;
                    bytes.extend_from_slice(&buf[..keep]);
                }
                _ => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(char::arbitrary(g).encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        Mixed(bytes)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Mixed))
    }
}

/// Number of quickcheck cases, following the CI/miri conventions.
pub fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if cfg!(feature = "test-fast") {
        100
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    };
    #[cfg(miri)]
    let tests = 10;
    tests
}

#[test]
fn case_count_follows_features() {
    let tests = quickcheck_tests();
    if cfg!(miri) {
        assert_eq!(tests, 10);
    } else if cfg!(feature = "test-fast") {
        assert_eq!(tests, 100);
    } else {
        assert!(tests >= 1_000);
    }
}

#[test]
fn reference_lossy_handles_surrogates() {
    assert_eq!(reference_lossy(b"\xED\xA0\x80x"), "\u{FFFD}x");
    assert_eq!(reference_lossy(b"\xED\xA0"), "\u{FFFD}");
    assert_eq!(reference_lossy(b"\xED\x9F\xBF"), "\u{D7FF}");
    assert_eq!(reference_lossy(b"\xE2\x82"), "\u{FFFD}");
    assert_eq!(reference_lossy(b"\xF4\x90\x80\x80"), "\u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}");
}
