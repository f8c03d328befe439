//! Arbitrary-precision signed decimal numbers.
//!
//! The unit engine needs exact arithmetic on values beyond `i64`, plus
//! scale-preserving rendering: `"10.50"` parses and prints back as
//! `10.50`, not `10.5`. Only the operations the engine uses exist here:
//! parsing, magnitude comparison against integer limits, multiplication
//! by small integers, truncating division, and conversion to `i64`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most digits allowed after the decimal point.
const MAX_SCALE: u32 = 16383;
/// Most digits allowed before the decimal point.
const MAX_INT_DIGITS: usize = 131072;

/// Error parsing a [`Decimal`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDecimalError {
    /// The input is not a valid decimal literal.
    #[error("invalid decimal literal: \"{input}\"")]
    Invalid {
        /// The rejected input.
        input: String,
    },

    /// The exponent pushes the value outside the representable range.
    #[error("decimal value out of range: \"{input}\"")]
    OutOfRange {
        /// The rejected input.
        input: String,
    },
}

/// An arbitrary-precision signed decimal number.
///
/// Digits are stored most significant first in base 10, with leading
/// zeros trimmed; `scale` counts how many of them sit after the decimal
/// point. Zero stores no digits at all but keeps its scale, so `0.00`
/// stays `0.00`.
#[derive(Debug, Clone)]
pub struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    scale: u32,
}

impl Decimal {
    /// Zero at scale 0.
    pub const ZERO: Decimal = Decimal {
        negative: false,
        digits: Vec::new(),
        scale: 0,
    };

    /// True if the value is exactly zero, at any scale.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// True if the value is below zero. Zero is never negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Number of digits kept after the decimal point.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Truncates toward zero and converts to `i64` if the result fits.
    #[must_use]
    pub fn to_i64_trunc(&self) -> Option<i64> {
        let int_len = self.digits.len().saturating_sub(self.scale as usize);
        let mut magnitude: u64 = 0;
        for &digit in &self.digits[..int_len] {
            magnitude = magnitude.checked_mul(10)?.checked_add(u64::from(digit))?;
        }
        if self.negative {
            if magnitude > i64::MIN.unsigned_abs() {
                return None;
            }
            Some(magnitude.wrapping_neg() as i64)
        } else {
            i64::try_from(magnitude).ok()
        }
    }

    /// True if the absolute value is strictly below the integer
    /// `limit`.
    pub(crate) fn abs_lt(&self, limit: u64) -> bool {
        // The fraction can never push an integer part below `limit`
        // over it, so comparing integer digits suffices.
        let int_len = self.digits.len().saturating_sub(self.scale as usize);
        let int_digits = &self.digits[..int_len];
        let limit_digits = digits_of(limit);
        match int_digits.len().cmp(&limit_digits.len()) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => int_digits < &limit_digits[..],
        }
    }

    /// Multiplies the magnitude by an integer factor, keeping sign and
    /// scale.
    pub(crate) fn mul_u64(&self, factor: u64) -> Self {
        if factor == 0 || self.is_zero() {
            return Self {
                negative: false,
                digits: Vec::new(),
                scale: self.scale,
            };
        }
        let factor = u128::from(factor);
        let mut out: Vec<u8> = Vec::with_capacity(self.digits.len() + 20);
        let mut carry: u128 = 0;
        for &digit in self.digits.iter().rev() {
            let value = u128::from(digit) * factor + carry;
            out.push((value % 10) as u8);
            carry = value / 10;
        }
        while carry > 0 {
            out.push((carry % 10) as u8);
            carry /= 10;
        }
        out.reverse();
        Self::normalized(self.negative, out, self.scale)
    }

    /// Divides by a nonzero integer, truncating toward zero. The result
    /// is integral, at scale 0.
    pub(crate) fn div_trunc(&self, divisor: u64) -> Self {
        let divisor = u128::from(divisor);
        let mut quotient = Vec::with_capacity(self.digits.len());
        let mut remainder: u128 = 0;
        for &digit in &self.digits {
            remainder = remainder * 10 + u128::from(digit);
            quotient.push((remainder / divisor) as u8);
            remainder %= divisor;
        }
        // Dropping the fractional quotient digits truncates the
        // magnitude, which is toward zero for either sign.
        let keep = quotient.len().saturating_sub(self.scale as usize);
        quotient.truncate(keep);
        Self::normalized(self.negative, quotient, 0)
    }

    /// Adds one to the magnitude, keeping sign and scale. Zero becomes
    /// one.
    pub(crate) fn magnitude_plus_one(&self) -> Self {
        let scale = self.scale as usize;
        let mut digits = self.digits.clone();
        if digits.len() < scale + 1 {
            let pad = scale + 1 - digits.len();
            digits.splice(0..0, std::iter::repeat(0).take(pad));
        }
        let mut idx = digits.len() - scale - 1;
        loop {
            if digits[idx] < 9 {
                digits[idx] += 1;
                break;
            }
            digits[idx] = 0;
            if idx == 0 {
                digits.insert(0, 1);
                break;
            }
            idx -= 1;
        }
        Self::normalized(self.negative, digits, self.scale)
    }

    fn normalized(negative: bool, mut digits: Vec<u8>, scale: u32) -> Self {
        match digits.iter().position(|&d| d != 0) {
            Some(first) => {
                digits.drain(..first);
                Self {
                    negative,
                    digits,
                    scale,
                }
            }
            None => Self {
                negative: false,
                digits: Vec::new(),
                scale,
            },
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        let negative = value < 0;
        Self::normalized(negative, digits_of(value.unsigned_abs()), 0)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError::Invalid { input: s.to_string() };
        let out_of_range = || ParseDecimalError::OutOfRange { input: s.to_string() };
        let bytes = s.as_bytes();
        let mut pos = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let mut digits: Vec<u8> = Vec::new();
        let mut frac_len: usize = 0;
        let mut have_digits = false;

        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            digits.push(bytes[pos] - b'0');
            have_digits = true;
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                digits.push(bytes[pos] - b'0');
                frac_len += 1;
                have_digits = true;
                pos += 1;
            }
        }
        if !have_digits {
            return Err(invalid());
        }

        let mut exponent: i64 = 0;
        if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
            pos += 1;
            let exp_negative = match bytes.get(pos) {
                Some(b'-') => {
                    pos += 1;
                    true
                }
                Some(b'+') => {
                    pos += 1;
                    false
                }
                _ => false,
            };
            let exp_start = pos;
            let mut value: i64 = 0;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                value = value
                    .saturating_mul(10)
                    .saturating_add(i64::from(bytes[pos] - b'0'));
                pos += 1;
            }
            if pos == exp_start {
                return Err(invalid());
            }
            exponent = if exp_negative { -value } else { value };
        }

        if pos != bytes.len() {
            return Err(invalid());
        }

        // The exponent shifts the decimal point: it shrinks the scale,
        // and past zero it appends zero digits instead.
        let effective_scale = i128::from(frac_len as u64) - i128::from(exponent);

        if digits.iter().all(|&d| d == 0) {
            let scale = effective_scale.clamp(0, i128::from(MAX_SCALE)) as u32;
            return Ok(Self {
                negative: false,
                digits: Vec::new(),
                scale,
            });
        }

        if effective_scale > i128::from(MAX_SCALE) {
            return Err(out_of_range());
        }

        if effective_scale < 0 {
            let extra = (-effective_scale) as usize;
            if digits.len().saturating_add(extra) > MAX_INT_DIGITS {
                return Err(out_of_range());
            }
            digits.extend(std::iter::repeat(0).take(extra));
            Ok(Self::normalized(negative, digits, 0))
        } else {
            let scale = effective_scale as u32;
            if digits.len().saturating_sub(scale as usize) > MAX_INT_DIGITS {
                return Err(out_of_range());
            }
            Ok(Self::normalized(negative, digits, scale))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if self.digits.len() > scale {
            for &digit in &self.digits[..self.digits.len() - scale] {
                write!(f, "{digit}")?;
            }
        } else {
            f.write_str("0")?;
        }
        if scale > 0 {
            f.write_str(".")?;
            for _ in self.digits.len()..scale {
                f.write_str("0")?;
            }
            let start = self.digits.len().saturating_sub(scale);
            for &digit in &self.digits[start..] {
                write!(f, "{digit}")?;
            }
        }
        Ok(())
    }
}

fn digits_of(mut value: u64) -> Vec<u8> {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push((value % 10) as u8);
        value /= 10;
    }
    digits.reverse();
    digits
}
