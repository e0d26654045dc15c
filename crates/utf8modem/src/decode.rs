//! Handler-driven decoding over single bytes and whole buffers.
//!
//! [`next_state_with_handler`] is the reference step: one byte in, zero or
//! more events out. [`decode`] produces exactly the same events and final
//! state as folding that step over a buffer, but runs ASCII runs and
//! sequences that lie entirely within the buffer inline. Only a sequence cut
//! by the end of the buffer (and resynchronisation after an incoming
//! incomplete or error state) goes through the byte-at-a-time path.

use crate::{
    handler::{ByteHandler, END_OF_STREAM},
    state::{LEADS, State, is_continuation, next_state},
};

/// Reports the continuation error for an incomplete `state` interrupted by
/// `next`.
fn continuation_error<H>(state: State, next: Option<u8>, handler: &mut H) -> Result<(), H::Error>
where
    H: ByteHandler + ?Sized,
{
    let [b1, b2, b3] = state.pending_bytes();
    match state.pending_len() {
        1 => handler.handle_continuation_error_1(b1, next),
        2 => handler.handle_continuation_error_2(b1, b2, next),
        _ => handler.handle_continuation_error_3(b1, b2, b3, next),
    }
}

/// Feeds a byte to the automaton in the initial state and reports the
/// outcome. Never produces a continuation error.
#[inline]
fn start_with_handler<H>(byte: u8, handler: &mut H) -> Result<State, H::Error>
where
    H: ByteHandler + ?Sized,
{
    let next = next_state(State::INITIAL, byte);
    if next.is_error() {
        handler.handle_prefix_error(byte)?;
    } else if next.is_complete() {
        handler.handle_ascii(byte)?;
    }
    Ok(next)
}

/// Returns the next state given a previous state and a next byte, reporting
/// every completed sequence and error to `handler`.
///
/// Unlike [`next_state`], a byte that interrupts an incomplete sequence is
/// reported as a continuation error and then decoded again from the initial
/// state, so it may also produce its own event. The one exception is a byte
/// that confirms a surrogate prefix (`0xED 0xA0..=0xBF`): it is reported as
/// ignored, as is a continuation byte following the surrogate prefix.
///
/// # Errors
///
/// Returns the first error raised by `handler`.
pub fn next_state_with_handler<H>(state: State, byte: u8, handler: &mut H) -> Result<State, H::Error>
where
    H: ByteHandler + ?Sized,
{
    if !state.is_incomplete() {
        if state.is_surrogate_prefix_error() && is_continuation(byte) {
            handler.handle_ignored_byte(byte)?;
            return Ok(State::ERROR);
        }
        return start_with_handler(byte, handler);
    }

    let next = next_state(state, byte);
    if next.is_incomplete() {
        return Ok(next);
    }

    let [b1, b2, b3] = state.pending_bytes();
    if next.is_complete() {
        match state.pending_len() {
            1 => handler.handle_2_bytes(b1, byte)?,
            2 => handler.handle_3_bytes(b1, b2, byte)?,
            _ => handler.handle_4_bytes(b1, b2, b3, byte)?,
        }
        return Ok(next);
    }

    continuation_error(state, Some(byte), handler)?;
    if next.is_surrogate_prefix_error() {
        handler.handle_ignored_byte(byte)?;
        return Ok(next);
    }
    start_with_handler(byte, handler)
}

/// Decodes `bytes`, continuing from `state`, and returns the state to resume
/// from with the next buffer.
///
/// The events and the returned state are identical to those of calling
/// [`next_state_with_handler`] once per byte, so a stream may be split into
/// buffers at arbitrary positions. Call [`finish`] once the stream ends.
///
/// ```
/// use core::convert::Infallible;
/// use utf8modem::{Chars, State, decode, finish};
///
/// let mut text = String::new();
/// let mut handler = Chars(&mut text);
/// let state = decode(State::INITIAL, b"caf\xC3", &mut handler)?;
/// let state = decode(state, b"\xA9!", &mut handler)?;
/// finish(state, &mut handler)?;
/// assert_eq!(text, "café!");
/// # Ok::<(), Infallible>(())
/// ```
///
/// # Errors
///
/// Returns the first error raised by `handler`.
pub fn decode<H>(mut state: State, bytes: &[u8], handler: &mut H) -> Result<State, H::Error>
where
    H: ByteHandler + ?Sized,
{
    let mut i = 0;
    let len = bytes.len();

    // Resolve whatever the previous buffer left pending.
    while !state.is_complete() {
        let Some(&byte) = bytes.get(i) else {
            return Ok(state);
        };
        state = next_state_with_handler(state, byte, handler)?;
        i += 1;
    }

    while i < len {
        let b1 = bytes[i];

        if b1 < 0x80 {
            handler.handle_ascii(b1)?;
            i += 1;
            while i < len && bytes[i] < 0x80 {
                handler.handle_ascii(bytes[i])?;
                i += 1;
            }
            state = State::scalar(u32::from(bytes[i - 1]));
            continue;
        }

        let lead = LEADS[b1 as usize];
        let width = lead.width as usize;
        if width == 0 {
            handler.handle_prefix_error(b1)?;
            state = State::ERROR;
            i += 1;
            continue;
        }

        if len - i < width {
            // The sequence is cut by the end of the buffer.
            state = State::INITIAL;
            for &byte in &bytes[i..] {
                state = next_state_with_handler(state, byte, handler)?;
            }
            return Ok(state);
        }

        let b2 = bytes[i + 1];
        if b2 < lead.lo || b2 > lead.hi {
            handler.handle_continuation_error_1(b1, Some(b2))?;
            if b1 == 0xED && is_continuation(b2) {
                handler.handle_ignored_byte(b2)?;
                state = State::SURROGATE_PREFIX;
                i += 2;
                // width is 3, so the third byte is in the buffer
                let b3 = bytes[i];
                if is_continuation(b3) {
                    handler.handle_ignored_byte(b3)?;
                    state = State::ERROR;
                    i += 1;
                }
            } else {
                state = State::ERROR;
                i += 1;
            }
            continue;
        }
        if width == 2 {
            handler.handle_2_bytes(b1, b2)?;
            state = State::scalar(crate::code_point_2(b1, b2));
            i += 2;
            continue;
        }

        let b3 = bytes[i + 2];
        if !is_continuation(b3) {
            handler.handle_continuation_error_2(b1, b2, Some(b3))?;
            state = State::ERROR;
            i += 2;
            continue;
        }
        if width == 3 {
            handler.handle_3_bytes(b1, b2, b3)?;
            state = State::scalar(crate::code_point_3(b1, b2, b3));
            i += 3;
            continue;
        }

        let b4 = bytes[i + 3];
        if !is_continuation(b4) {
            handler.handle_continuation_error_3(b1, b2, b3, Some(b4))?;
            state = State::ERROR;
            i += 3;
            continue;
        }
        handler.handle_4_bytes(b1, b2, b3, b4)?;
        state = State::scalar(crate::code_point_4(b1, b2, b3, b4));
        i += 4;
    }

    Ok(state)
}

/// Ends a stream: if `state` is incomplete, reports one continuation error
/// carrying [`END_OF_STREAM`]. Complete and error states need no action.
///
/// Decoding continues from [`State::INITIAL`] afterwards.
///
/// # Errors
///
/// Returns the error raised by `handler`.
pub fn finish<H>(state: State, handler: &mut H) -> Result<(), H::Error>
where
    H: ByteHandler + ?Sized,
{
    if state.is_incomplete() {
        continuation_error(state, END_OF_STREAM, handler)?;
    }
    Ok(())
}
