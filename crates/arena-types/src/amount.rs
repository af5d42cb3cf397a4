use crate::error::{ArenaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Fixed-point token amount with 6 decimal places (USDC-style units).
/// Internally stored as i128; scores reuse the same representation and
/// may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(i128);

const SCALE: i128 = 1_000_000; // 10^6

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(0);

    /// Sentinel for an unlimited token approval. Ledgers treat an
    /// allowance at this value as never-decrementing.
    pub const MAX: Amount = Amount(i128::MAX);

    /// Create from raw i128 (scaled value)
    pub const fn from_raw(raw: i128) -> Self {
        Amount(raw)
    }

    /// Get the raw scaled value
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// Create from integer token units
    pub const fn from_units(units: i64) -> Self {
        Amount((units as i128) * SCALE)
    }

    /// Convert to f64 (for percentage derivations)
    pub fn to_f64(&self) -> f64 {
        (self.0 as f64) / (SCALE as f64)
    }

    /// Parse a user-entered decimal string (e.g. "1234.50") into a
    /// fixed-point amount. Exact: no float round-trip. At most 6
    /// fractional digits are accepted.
    pub fn from_str_decimal(s: &str) -> Result<Self> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if digits.is_empty() {
            return Err(ArenaError::InvalidAmount(format!("cannot parse: {:?}", s)));
        }

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if frac_part.len() > 6 {
            return Err(ArenaError::InvalidAmount(format!(
                "more than 6 fractional digits: {:?}",
                s
            )));
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ArenaError::InvalidAmount(format!("cannot parse: {:?}", s)));
        }

        let parse_digits = |part: &str| -> Result<i128> {
            if part.is_empty() {
                return Ok(0);
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ArenaError::InvalidAmount(format!("cannot parse: {:?}", s)));
            }
            part.parse::<i128>()
                .map_err(|_| ArenaError::InvalidAmount(format!("cannot parse: {:?}", s)))
        };

        let int: i128 = parse_digits(int_part)?;
        let mut frac: i128 = parse_digits(frac_part)?;
        for _ in frac_part.len()..6 {
            frac *= 10;
        }

        let raw = int
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| ArenaError::InvalidAmount(format!("overflow: {:?}", s)))?;

        Ok(Amount(if negative { -raw } else { raw }))
    }

    /// Check if amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Check if amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Absolute value
    pub const fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Checked addition
    pub fn checked_add(&self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| ArenaError::InvalidAmount("overflow in addition".to_string()))
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| ArenaError::InvalidAmount("overflow in subtraction".to_string()))
    }

    /// Display formatting: two decimal digits with thousands grouping,
    /// rounding half away from zero. Raw 1_234_500_000 renders "1,234.50".
    pub fn format_grouped(&self) -> String {
        let (sign, body) = self.format_cents();
        format!("{}{}", if sign { "-" } else { "" }, body)
    }

    /// Score formatting: like `format_grouped` but non-negative values
    /// carry an explicit "+" prefix. Raw -500_000 renders "-0.50".
    pub fn format_signed(&self) -> String {
        let (sign, body) = self.format_cents();
        format!("{}{}", if sign { "-" } else { "+" }, body)
    }

    /// Round to cents and render "<grouped int>.<2 frac>"; returns
    /// (is_negative, body). A value that rounds to exactly zero is not
    /// negative.
    fn format_cents(&self) -> (bool, String) {
        let abs = self.0.unsigned_abs();
        // 10^6 fixed point -> cents, half away from zero
        let cents = (abs + 5_000) / 10_000;
        let int = cents / 100;
        let frac = cents % 100;

        let int_digits = int.to_string();
        let mut grouped = String::with_capacity(int_digits.len() + int_digits.len() / 3);
        for (i, ch) in int_digits.chars().enumerate() {
            if i > 0 && (int_digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        (self.0 < 0 && cents > 0, format!("{}.{:02}", grouped, frac))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_conversions() {
        let a = Amount::from_units(100);
        assert_eq!(a.raw(), 100_000_000);
        assert_eq!(a.to_f64(), 100.0);
        assert_eq!(Amount::ZERO.to_f64(), 0.0);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Amount::from_str_decimal("1234.50").unwrap().raw(), 1_234_500_000);
        assert_eq!(Amount::from_str_decimal("0.000001").unwrap().raw(), 1);
        assert_eq!(Amount::from_str_decimal("100").unwrap(), Amount::from_units(100));
        assert_eq!(Amount::from_str_decimal("-0.5").unwrap().raw(), -500_000);
        assert_eq!(Amount::from_str_decimal(".25").unwrap().raw(), 250_000);

        assert!(Amount::from_str_decimal("").is_err());
        assert!(Amount::from_str_decimal(".").is_err());
        assert!(Amount::from_str_decimal("abc").is_err());
        assert!(Amount::from_str_decimal("1.2345678").is_err());
        assert!(Amount::from_str_decimal("1.-5").is_err());
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(Amount::from_raw(1_234_500_000).format_grouped(), "1,234.50");
        assert_eq!(Amount::from_raw(0).format_grouped(), "0.00");
        assert_eq!(Amount::from_units(1_000_000).format_grouped(), "1,000,000.00");
        assert_eq!(Amount::from_raw(999_999).format_grouped(), "1.00"); // rounds up
        assert_eq!(Amount::from_raw(125_000).format_grouped(), "0.13"); // half away from zero
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(Amount::from_raw(-500_000).format_signed(), "-0.50");
        assert_eq!(Amount::from_raw(500_000).format_signed(), "+0.50");
        assert_eq!(Amount::ZERO.format_signed(), "+0.00");
        // Rounds to zero: no negative sign survives
        assert_eq!(Amount::from_raw(-4_000).format_signed(), "+0.00");
    }

    #[test]
    fn test_amount_checks() {
        assert!(Amount::from_units(10).is_positive());
        assert!(Amount::from_units(-10).is_negative());
        assert!(Amount::ZERO.is_zero());
        assert!(Amount::MAX.is_positive());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Amount::from_units(10);
        let b = Amount::from_units(5);
        assert_eq!(a.checked_add(b).unwrap(), Amount::from_units(15));
        assert_eq!(a.checked_sub(b).unwrap(), Amount::from_units(5));
        assert!(Amount::MAX.checked_add(Amount::from_raw(1)).is_err());
    }
}
