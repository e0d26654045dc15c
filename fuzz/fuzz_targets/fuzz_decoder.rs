#![no_main]
use std::cell::RefCell;
use std::convert::Infallible;

use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use utf8modem::{
    ByteHandler, State, Validity, classify, classify_stream_in, decode, decode_lossy,
    decode_strict, finish, next_state_with_handler,
};

const HEADER: usize = 4; // 4-byte split seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Byte strings that sit on the edges of the lead-byte table.
static EDGE_TABLE: &[&[u8]] = &[
    b"\xC2\x80",
    b"\xDF\xBF",
    b"\xE0\xA0\x80",
    b"\xED\x9F\xBF",
    b"\xED\xA0\x80",
    b"\xEE\x80\x80",
    b"\xF0\x90\x80\x80",
    b"\xF4\x8F\xBF\xBF",
    b"\xF4\x90\x80\x80",
    b"\xC0\xAF",
    b"\xE0\x80\xAF",
    b"\xF8\x88\x80\x80\x80",
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < max_size.min(HEADER + 256) {
            let limit = max_size - prefix;
            let written = append_fragment(&mut data[prefix..], limit);
            if written == 0 {
                break;
            }
            prefix += written;
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append one encoded scalar, a cut-off encoding, an edge case or a random
/// byte, never exceeding `limit`. Returns the number of bytes written.
fn append_fragment(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let mut scratch = [0u8; 4];
        let fragment: &[u8] = match rng.random_range(0..4) {
            0 => {
                let ch = char::from_u32(rng.random_range(0..=0x10_FFFF)).unwrap_or('\u{FFFD}');
                ch.encode_utf8(&mut scratch).as_bytes()
            }
            1 => {
                let ch = char::from_u32(rng.random_range(0x80..=0x10_FFFF)).unwrap_or('\u{10000}');
                let len = ch.encode_utf8(&mut scratch).len();
                &scratch[..rng.random_range(1..len)]
            }
            2 => EDGE_TABLE[rng.random_range(0..EDGE_TABLE.len())],
            _ => {
                scratch[0] = rng.random();
                &scratch[..1]
            }
        };
        if fragment.len() > limit {
            return 0;
        }
        buf[..fragment.len()].copy_from_slice(fragment);
        fragment.len()
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Records every callback so whole and chunked runs can be compared.
#[derive(Debug, Default, PartialEq)]
struct Log(Vec<(u8, [u8; 4], Option<u8>)>);

impl Log {
    fn push(&mut self, kind: u8, bytes: &[u8], next: Option<u8>) -> Result<(), Infallible> {
        let mut padded = [0u8; 4];
        padded[..bytes.len()].copy_from_slice(bytes);
        self.0.push((kind, padded, next));
        Ok(())
    }

    fn errors(&self) -> usize {
        self.0.iter().filter(|(kind, ..)| (4..=7).contains(kind)).count()
    }
}

impl ByteHandler for Log {
    type Error = Infallible;

    fn handle_ascii(&mut self, b1: u8) -> Result<(), Infallible> {
        self.push(0, &[b1], None)
    }
    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> Result<(), Infallible> {
        self.push(1, &[b1, b2], None)
    }
    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> Result<(), Infallible> {
        self.push(2, &[b1, b2, b3], None)
    }
    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> Result<(), Infallible> {
        self.push(3, &[b1, b2, b3, b4], None)
    }
    fn handle_prefix_error(&mut self, b1: u8) -> Result<(), Infallible> {
        self.push(4, &[b1], None)
    }
    fn handle_continuation_error_1(&mut self, b1: u8, next: Option<u8>) -> Result<(), Infallible> {
        self.push(5, &[b1], next)
    }
    fn handle_continuation_error_2(&mut self, b1: u8, b2: u8, next: Option<u8>) -> Result<(), Infallible> {
        self.push(6, &[b1, b2], next)
    }
    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> Result<(), Infallible> {
        self.push(7, &[b1, b2, b3], next)
    }
    fn handle_ignored_byte(&mut self, b: u8) -> Result<(), Infallible> {
        self.push(8, &[b], None)
    }
}

fn decode_whole(data: &[u8]) -> (Log, State) {
    let mut log = Log::default();
    let Ok(state) = decode(State::INITIAL, data, &mut log);
    let Ok(()) = finish(state, &mut log);
    (log, state)
}

fn decode_chunked(data: &[u8], split_seed: u64) -> (Log, State) {
    let mut log = Log::default();
    let mut state = State::INITIAL;
    for chunk in split_into_chunks(data, split_seed) {
        let Ok(next) = decode(state, chunk, &mut log);
        state = next;
    }
    let Ok(()) = finish(state, &mut log);
    (log, state)
}

fn decode_bytewise(data: &[u8]) -> (Log, State) {
    let mut log = Log::default();
    let mut state = State::INITIAL;
    for &byte in data {
        let Ok(next) = next_state_with_handler(state, byte, &mut log);
        state = next;
    }
    let Ok(()) = finish(state, &mut log);
    (log, state)
}

fn decoder(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let split_seed = u64::from(u32::from_le_bytes(data[..HEADER].try_into().unwrap()));
    let data = &data[HEADER..];

    let whole = decode_whole(data);
    assert_eq!(whole, decode_chunked(data, split_seed));
    assert_eq!(whole, decode_bytewise(data));

    let valid = std::str::from_utf8(data).is_ok();
    let validity = classify(data);
    assert_eq!(validity.is_fully_valid(), valid);
    assert_eq!(whole.0.errors() == 0, valid);
    assert_eq!(decode_strict(data).is_ok(), valid);
    if valid {
        assert_eq!(decode_lossy(data).as_bytes(), data);
    }
    if matches!(validity, Validity::Ascii) {
        assert!(data.is_ascii());
    }

    let mut buf = [0u8; 7];
    assert_eq!(classify_stream_in(data, &mut buf).unwrap(), validity);
}

fuzz_target!(|data: &[u8]| decoder(data));

/// Split `data` into chunks at positions derived from `split_seed`.
///
/// * `split_seed` may be any `u64`.
/// * Each chunk is at least one byte.
/// * Chunks cut through multi-byte sequences freely.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < data.len() {
        let size = rng.random_range(1..=(data.len() - start).min(16));
        chunks.push(&data[start..start + size]);
        start += size;
    }
    chunks
}
