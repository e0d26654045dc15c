use std::{boxed::Box, cell::Cell, vec};

use crate::options::{DEFAULT_BUFFER_LEN, StreamOptions};

std::thread_local! {
    static SCRATCH: Cell<Option<Box<[u8]>>> = const { Cell::new(None) };
}

fn allocate(len: usize) -> Box<[u8]> {
    vec![0u8; len].into_boxed_slice()
}

/// Runs `f` with a read buffer of `options.effective_buffer_len()` bytes.
///
/// With `reuse_scratch` the buffer is taken out of the per-thread slot and put
/// back afterwards. A nested call finds the slot empty and allocates. Buffers
/// larger than [`DEFAULT_BUFFER_LEN`] are dropped instead of kept.
pub(crate) fn with_scratch<F, R>(options: StreamOptions, f: F) -> R
where
    F: FnOnce(&mut [u8]) -> R,
{
    let len = options.effective_buffer_len();
    if !options.reuse_scratch {
        return f(&mut allocate(len)[..]);
    }

    let mut buf = match SCRATCH.take() {
        Some(buf) if buf.len() >= len => buf,
        _ => allocate(len),
    };
    let result = f(&mut buf[..len]);
    if buf.len() <= DEFAULT_BUFFER_LEN {
        SCRATCH.set(Some(buf));
    }
    result
}
