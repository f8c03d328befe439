//! Bidirectional conversion between byte counts and human-readable
//! size strings.
//!
//! One table drives both directions. Formatting walks the table from
//! `bytes` upward, dividing in half-unit steps so the stopping decision
//! can round half away from zero; parsing looks the unit up by name and
//! multiplies. The walk is generic over a [`NumericBackend`] so the
//! `i64` and [`Decimal`] formatters cannot drift apart.

use crate::decimal::{Decimal, ParseDecimalError};
use crate::error::{ParseSizeError, ParseSizeResult};
use std::fmt;

/// One entry of the size unit table.
#[derive(Debug, Clone, Copy)]
pub struct SizeUnit {
    /// Name as printed and parsed.
    pub name: &'static str,
    /// Upper bound (exclusive) for a value to stop at this unit,
    /// expressed in the unit of the walk when it reaches this entry.
    /// Never consulted for the last entry, which takes everything.
    pub limit: u64,
    /// Whether a value stopping here is rounded half away from zero.
    /// Rounding units are walked in half-unit steps.
    pub round: bool,
    /// log2 of the number of bytes in one of this unit.
    pub shift: u32,
}

/// The unit table, smallest to largest. All units are powers of two.
// When a unit is added here, extend the message on
// ParseSizeError::InvalidUnit as well.
pub const SIZE_UNITS: &[SizeUnit] = &[
    SizeUnit { name: "bytes", limit: 10 * 1024, round: false, shift: 0 },
    SizeUnit { name: "kB", limit: 20 * 1024 - 1, round: true, shift: 10 },
    SizeUnit { name: "MB", limit: 20 * 1024 - 1, round: true, shift: 20 },
    SizeUnit { name: "GB", limit: 20 * 1024 - 1, round: true, shift: 30 },
    SizeUnit { name: "TB", limit: 20 * 1024 - 1, round: true, shift: 40 },
    SizeUnit { name: "PB", limit: 20 * 1024 - 1, round: true, shift: 50 },
];

/// An alternate unit spelling accepted by [`parse_size`].
#[derive(Debug, Clone, Copy)]
pub struct UnitAlias {
    /// The accepted spelling.
    pub alias: &'static str,
    /// Index into [`SIZE_UNITS`] of the unit it means.
    pub canonical: usize,
}

/// Spellings accepted on input but never produced on output.
pub const UNIT_ALIASES: &[UnitAlias] = &[UnitAlias { alias: "B", canonical: 0 }];

/// Arithmetic a numeric type must provide to drive the formatting walk.
///
/// The two implementations must agree digit for digit on every value
/// both can represent; keeping the walk generic keeps the rounding
/// rules in one place.
pub trait NumericBackend: fmt::Display + Sized {
    /// True if the absolute value is strictly below `limit`.
    fn abs_lt(&self, limit: u64) -> bool;

    /// Divides by two, rounding half away from zero.
    fn half_rounded(self) -> Self;

    /// Divides by `2^bits`, truncating toward zero.
    fn div_pow2_trunc(self, bits: u32) -> Self;
}

impl NumericBackend for i64 {
    fn abs_lt(&self, limit: u64) -> bool {
        self.unsigned_abs() < limit
    }

    fn half_rounded(self) -> Self {
        // Values reaching this point have been divided at least nine
        // bits down, so the adjustment cannot overflow.
        let adjust = if self < 0 { -1 } else { 1 };
        (self + adjust) / 2
    }

    fn div_pow2_trunc(self, bits: u32) -> Self {
        // Division, not a shift: negative values must truncate toward
        // zero exactly like positive ones.
        self / (1i64 << bits)
    }
}

impl NumericBackend for Decimal {
    fn abs_lt(&self, limit: u64) -> bool {
        Decimal::abs_lt(self, limit)
    }

    fn half_rounded(self) -> Self {
        self.magnitude_plus_one().div_trunc(2)
    }

    fn div_pow2_trunc(self, bits: u32) -> Self {
        self.div_trunc(1u64 << bits)
    }
}

fn format_size<N: NumericBackend>(mut size: N) -> String {
    let Some((last, leading)) = SIZE_UNITS.split_last() else {
        return size.to_string();
    };

    for (index, unit) in leading.iter().enumerate() {
        if size.abs_lt(unit.limit) {
            if unit.round {
                size = size.half_rounded();
            }
            return format!("{size} {}", unit.name);
        }
        // Step to the next unit. Rounding units are carried in
        // half-unit values, hence the one-bit adjustment on each side
        // of the transition.
        let next = &SIZE_UNITS[index + 1];
        let bits = (next.shift - unit.shift) - (u32::from(next.round) - u32::from(unit.round));
        size = size.div_pow2_trunc(bits);
    }

    if last.round {
        size = size.half_rounded();
    }
    format!("{size} {}", last.name)
}

/// Formats a byte count as a human-readable string.
///
/// Small values print in bytes exactly; from 10240 bytes upward the
/// value moves to the largest unit that keeps it under five digits,
/// rounded half away from zero. Negative values mirror positive ones.
///
/// # Example
///
/// ```
/// use relsize_core::pretty_size;
///
/// assert_eq!(pretty_size(0), "0 bytes");
/// assert_eq!(pretty_size(10239), "10239 bytes");
/// assert_eq!(pretty_size(10240), "10 kB");
/// assert_eq!(pretty_size(-1_000_000_000), "-954 MB");
/// ```
#[must_use]
pub fn pretty_size(size: i64) -> String {
    format_size(size)
}

/// Formats an arbitrary-precision byte count.
///
/// Produces exactly the digits [`pretty_size`] produces for any value
/// an `i64` can hold; larger magnitudes keep climbing the unit table
/// instead of overflowing. Values that stop at `bytes` keep their
/// fractional digits.
#[must_use]
pub fn pretty_size_decimal(size: &Decimal) -> String {
    format_size(size.clone())
}

/// Parses a human-readable size string into a byte count.
///
/// Accepts an optionally signed decimal number, with optional
/// exponent, followed by an optional unit from the table or its
/// aliases. Unit match is case-insensitive; surrounding ASCII
/// whitespace is ignored. Fractional byte results truncate toward
/// zero.
///
/// # Example
///
/// ```
/// use relsize_core::parse_size;
///
/// assert_eq!(parse_size("912").unwrap(), 912);
/// assert_eq!(parse_size(" 1.5 MB ").unwrap(), 1_572_864);
/// assert_eq!(parse_size("-1 GB").unwrap(), -1_073_741_824);
/// ```
///
/// # Errors
///
/// Fails when the number is malformed, the unit is unknown, or the
/// resulting byte count does not fit an `i64`.
pub fn parse_size(input: &str) -> ParseSizeResult<i64> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let number_start = pos;
    let mut have_digits = false;

    if pos < bytes.len() && (bytes[pos] == b'-' || bytes[pos] == b'+') {
        pos += 1;
    }
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        have_digits = true;
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            have_digits = true;
            pos += 1;
        }
    }
    if !have_digits {
        return Err(ParseSizeError::invalid_number(input));
    }

    // An exponent marker only belongs to the number when digits follow
    // it; otherwise the tail is left alone so a unit starting with `e`
    // could one day be parsed.
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut cursor = pos + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'-' || bytes[cursor] == b'+') {
            cursor += 1;
        }
        let exponent_digits = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_digits {
            pos = cursor;
        }
    }

    let mut number: Decimal = input[number_start..pos].parse().map_err(|err| match err {
        ParseDecimalError::OutOfRange { .. } => ParseSizeError::out_of_range(input),
        ParseDecimalError::Invalid { .. } => ParseSizeError::invalid_number(input),
    })?;

    let mut unit_start = pos;
    while unit_start < bytes.len() && bytes[unit_start].is_ascii_whitespace() {
        unit_start += 1;
    }

    if unit_start < bytes.len() {
        let unit_text = input[unit_start..].trim_end_matches(|c: char| c.is_ascii_whitespace());
        let unit =
            unit_by_name(unit_text).ok_or_else(|| ParseSizeError::invalid_unit(unit_text))?;
        if unit.shift > 0 {
            number = number.mul_u64(1u64 << unit.shift);
        }
    }

    number
        .to_i64_trunc()
        .ok_or_else(|| ParseSizeError::out_of_range(input))
}

fn unit_by_name(name: &str) -> Option<&'static SizeUnit> {
    SIZE_UNITS
        .iter()
        .find(|unit| unit.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            UNIT_ALIASES
                .iter()
                .find(|alias| alias.alias.eq_ignore_ascii_case(name))
                .map(|alias| &SIZE_UNITS[alias.canonical])
        })
}
