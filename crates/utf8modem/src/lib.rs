//! Streaming UTF-8 decoding and validation.
//!
//! The core is a byte-at-a-time automaton whose whole state is one [`State`]
//! value: feed bytes in any chunking, keep the returned state between
//! buffers, and call [`finish`] at the end of the stream. Decoding reports to
//! a [`ByteHandler`], which sees every valid sequence and every malformation
//! with the bytes involved; [`CharHandler`] (through [`Chars`]) is the
//! simpler "scalar values and errors" view.
//!
//! ```
//! use utf8modem::{Chars, State, Validity, classify, decode, finish};
//!
//! let mut text = String::new();
//! let mut handler = Chars(&mut text);
//! let state = decode(State::INITIAL, b"gr\xC3", &mut handler)?;
//! let state = decode(state, b"\xBC\xC3\x9F \xFF", &mut handler)?;
//! finish(state, &mut handler)?;
//! assert_eq!(text, "gr\u{fc}\u{df} \u{FFFD}");
//!
//! assert_eq!(classify(b"gr\xC3"), Validity::Truncated { pending: 1, missing: 1 });
//! # Ok::<(), core::convert::Infallible>(())
//! ```
//!
//! Malformed input follows the W3C/WHATWG "maximal subpart" practice: one
//! error per maximal prefix of a would-be sequence, except that a surrogate
//! encoding (`0xED 0xA0..=0xBF ..`) is reported once, at its second byte.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod chunk_utils;
mod code_point;
mod decode;
mod decoder;
mod error;
mod handler;
mod sink;
mod state;
mod statistics;
mod strict;
mod validity;

#[cfg(feature = "std")]
mod options;
#[cfg(feature = "std")]
mod scratch;
#[cfg(feature = "std")]
mod stream;

#[cfg(test)]
mod tests;

pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use code_point::{code_point_2, code_point_3, code_point_4};
pub use decode::{decode, finish, next_state_with_handler};
pub use decoder::Utf8Decoder;
#[cfg(feature = "std")]
pub use error::StreamError;
pub use error::{Sequence, StrictError, Utf8Error};
pub use handler::{ByteHandler, CharHandler, Chars, END_OF_STREAM};
#[cfg(feature = "std")]
pub use options::{DEFAULT_BUFFER_LEN, MIN_BUFFER_LEN, StreamOptions};
pub use sink::{Lossy, decode_lossy};
pub use state::{State, initial_state, is_continuation, next_state};
pub use statistics::Statistics;
pub use strict::{Strict, decode_strict};
#[cfg(feature = "std")]
pub use stream::{
    classify_stream, classify_stream_in, classify_stream_with, decode_stream, decode_stream_in,
    decode_stream_with, decode_to_end, is_fully_valid, is_valid_up_to_truncation,
};
pub use validity::{Validity, classify};
