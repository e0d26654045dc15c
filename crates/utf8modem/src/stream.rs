//! [`std::io::Read`] driven decoding and classification.
//!
//! Every entry point reads into one bounded buffer; the classifier carries
//! only the undecided trailing bytes of each read into the next one, so
//! memory stays bounded by the buffer length however long the stream is.

use std::io::{self, Read};

use crate::{
    decode::{decode, finish},
    error::StreamError,
    handler::ByteHandler,
    options::{MIN_BUFFER_LEN, StreamOptions},
    scratch::with_scratch,
    state::State,
    validity::{Validity, classify},
};

fn read_retrying<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Decodes everything `reader` produces, continuing from `state`, and returns
/// the state to resume from. Does not call [`finish`].
///
/// # Errors
///
/// Returns [`StreamError::Io`] if a read fails and [`StreamError::Handler`]
/// if the handler stops decoding.
pub fn decode_stream<R, H>(state: State, reader: R, handler: &mut H) -> Result<State, StreamError<H::Error>>
where
    R: Read,
    H: ByteHandler + ?Sized,
{
    decode_stream_with(state, reader, handler, StreamOptions::default())
}

/// [`decode_stream`] with explicit [`StreamOptions`].
///
/// # Errors
///
/// See [`decode_stream`].
pub fn decode_stream_with<R, H>(
    state: State,
    reader: R,
    handler: &mut H,
    options: StreamOptions,
) -> Result<State, StreamError<H::Error>>
where
    R: Read,
    H: ByteHandler + ?Sized,
{
    with_scratch(options, |buf| decode_stream_in(state, reader, handler, buf))
}

/// [`decode_stream`] reading into a caller-provided buffer.
///
/// # Errors
///
/// See [`decode_stream`].
///
/// # Panics
///
/// Panics if `buf` is shorter than [`MIN_BUFFER_LEN`].
pub fn decode_stream_in<R, H>(
    mut state: State,
    mut reader: R,
    handler: &mut H,
    buf: &mut [u8],
) -> Result<State, StreamError<H::Error>>
where
    R: Read,
    H: ByteHandler + ?Sized,
{
    assert!(
        buf.len() >= MIN_BUFFER_LEN,
        "read buffer must hold at least {MIN_BUFFER_LEN} bytes"
    );
    loop {
        let n = read_retrying(&mut reader, buf)?;
        if n == 0 {
            return Ok(state);
        }
        state = decode(state, &buf[..n], handler).map_err(StreamError::Handler)?;
    }
}

/// Decodes a whole stream into `handler` and ends it with [`finish`].
///
/// ```
/// use utf8modem::{Chars, decode_to_end};
///
/// let mut text = String::new();
/// decode_to_end(&b"\xCE\xBB\xE2\x82"[..], &mut Chars(&mut text))?;
/// assert_eq!(text, "\u{3bb}\u{FFFD}");
/// # Ok::<(), utf8modem::StreamError<core::convert::Infallible>>(())
/// ```
///
/// # Errors
///
/// See [`decode_stream`].
pub fn decode_to_end<R, H>(reader: R, handler: &mut H) -> Result<(), StreamError<H::Error>>
where
    R: Read,
    H: ByteHandler + ?Sized,
{
    let state = decode_stream(State::INITIAL, reader, handler)?;
    finish(state, handler).map_err(StreamError::Handler)
}

/// Classifies everything `reader` produces, stopping at the first
/// malformation.
///
/// The result is the same as [`classify`] over the concatenated stream.
///
/// # Errors
///
/// Returns the first read error.
pub fn classify_stream<R: Read>(reader: R) -> io::Result<Validity> {
    classify_stream_with(reader, StreamOptions::default())
}

/// [`classify_stream`] with explicit [`StreamOptions`].
///
/// # Errors
///
/// Returns the first read error.
pub fn classify_stream_with<R: Read>(reader: R, options: StreamOptions) -> io::Result<Validity> {
    with_scratch(options, |buf| classify_stream_in(reader, buf))
}

/// [`classify_stream`] reading into a caller-provided buffer.
///
/// # Errors
///
/// Returns the first read error.
///
/// # Panics
///
/// Panics if `buf` is shorter than [`MIN_BUFFER_LEN`]: a carried-over
/// partial sequence takes up to three bytes and each read needs room for at
/// least one more.
pub fn classify_stream_in<R: Read>(mut reader: R, buf: &mut [u8]) -> io::Result<Validity> {
    assert!(
        buf.len() >= MIN_BUFFER_LEN,
        "read buffer must hold at least {MIN_BUFFER_LEN} bytes"
    );

    let mut carried = 0;
    let mut multi_byte = false;
    loop {
        let n = read_retrying(&mut reader, &mut buf[carried..])?;
        if n == 0 {
            if carried > 0 {
                return Ok(classify(&buf[..carried]));
            }
            return Ok(if multi_byte {
                Validity::Utf8
            } else {
                Validity::Ascii
            });
        }

        let filled = carried + n;
        let validity = classify(&buf[..filled]);
        match validity {
            Validity::Malformed => return Ok(Validity::Malformed),
            Validity::Ascii => {}
            Validity::Utf8 | Validity::Truncated { .. } => multi_byte = true,
        }
        // A truncated tail is re-examined together with the next read.
        carried = validity.pending();
        buf.copy_within(filled - carried..filled, 0);
    }
}

/// Tests if `reader` produces complete, well-formed UTF-8.
///
/// # Errors
///
/// Returns the first read error.
pub fn is_fully_valid<R: Read>(reader: R) -> io::Result<bool> {
    Ok(classify_stream(reader)?.is_fully_valid())
}

/// Tests if `reader` produces well-formed UTF-8, allowing the stream to end
/// inside a sequence.
///
/// # Errors
///
/// Returns the first read error.
pub fn is_valid_up_to_truncation<R: Read>(reader: R) -> io::Result<bool> {
    Ok(classify_stream(reader)?.is_valid_or_truncated())
}
