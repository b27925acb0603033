//! Q28.4 fixed-point conversions and bit-field extraction.
//!
//! Every packed record in the graph store is decoded through these helpers.
//! Coordinates, lengths and elevations are stored as Q28.4 values: integers
//! scaled by 2⁴, so the 4 low-order bits hold the fractional part.

/// Number of fractional bits in a Q28.4 value.
const FRACTION_BITS: u32 = 4;

/// Scale factor between a Q28.4 value and the real number it encodes.
const SCALE: f64 = (1 << FRACTION_BITS) as f64;

/// Width of the words bit fields are extracted from.
const WORD_BITS: u32 = u32::BITS;

/// Convert an integer to its Q28.4 representation.
///
/// ```
/// assert_eq!(velo::fixed_point::to_fixed_point(2), 32);
/// ```
pub fn to_fixed_point(value: i32) -> i32 {
    value << FRACTION_BITS
}

/// Convert a Q28.4 value to `f64`. Exact for every `i32` input.
pub fn to_f64(fixed: i32) -> f64 {
    fixed as f64 / SCALE
}

/// Convert a Q28.4 value to `f32`.
pub fn to_f32(fixed: i32) -> f32 {
    fixed as f32 / SCALE as f32
}

/// Extract `length` bits starting at bit `start` of `word`, sign-extended.
///
/// # Panics
///
/// Panics if `start + length > 32`.
pub fn extract_signed(word: u32, start: u32, length: u32) -> i32 {
    assert!(
        fits_word(start, length),
        "bit range of {length} bits at {start} exceeds a 32-bit word"
    );
    if length == 0 {
        return 0;
    }
    ((word << (WORD_BITS - start - length)) as i32) >> (WORD_BITS - length)
}

/// Extract `length` bits starting at bit `start` of `word`, zero-extended.
///
/// # Panics
///
/// Panics if `start + length > 32` or `length == 32` (the result would not
/// be distinguishable from a signed read).
pub fn extract_unsigned(word: u32, start: u32, length: u32) -> u32 {
    assert!(
        fits_word(start, length) && length < WORD_BITS,
        "invalid unsigned bit range of {length} bits at {start}"
    );
    if length == 0 {
        return 0;
    }
    (word << (WORD_BITS - start - length)) >> (WORD_BITS - length)
}

fn fits_word(start: u32, length: u32) -> bool {
    start.checked_add(length).is_some_and(|end| end <= WORD_BITS)
}
