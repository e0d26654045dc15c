//! Scalar value reconstruction for validated multi-byte sequences.
//!
//! Each function XORs away the length tag of the lead byte and the `10`
//! prefix of every continuation byte in a single step. The inputs must form a
//! sequence the automaton accepted; anything else produces a meaningless
//! value (never a panic).

/// Returns the scalar value of a valid 2-byte sequence (at most U+07FF).
///
/// `b1` is in `0xC2..=0xDF`, `b2` in `0x80..=0xBF`.
#[inline]
#[must_use]
pub const fn code_point_2(b1: u8, b2: u8) -> u32 {
    (b1 as u32) << 6 ^ b2 as u32 ^ 0x3080
}

/// Returns the scalar value of a valid 3-byte sequence (at most U+FFFF).
///
/// `b1` is in `0xE0..=0xEF`; `b2` is a continuation byte, narrowed to
/// `0xA0..=0xBF` after `0xE0` and `0x80..=0x9F` after `0xED`; `b3` is a
/// continuation byte.
#[inline]
#[must_use]
pub const fn code_point_3(b1: u8, b2: u8, b3: u8) -> u32 {
    (b1 as u32) << 12 ^ (b2 as u32) << 6 ^ b3 as u32 ^ 0x000E_2080
}

/// Returns the scalar value of a valid 4-byte sequence (at most U+10FFFF).
///
/// `b1` is in `0xF0..=0xF4`; `b2` is a continuation byte, narrowed to
/// `0x90..=0xBF` after `0xF0` and `0x80..=0x8F` after `0xF4`; `b3` and `b4`
/// are continuation bytes.
#[inline]
#[must_use]
pub const fn code_point_4(b1: u8, b2: u8, b3: u8, b4: u8) -> u32 {
    (b1 as u32) << 18 ^ (b2 as u32) << 12 ^ (b3 as u32) << 6 ^ b4 as u32 ^ 0x03C8_2080
}
