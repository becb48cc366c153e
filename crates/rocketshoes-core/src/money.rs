//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The catalog sends prices like 179.9 as JSON numbers.                   │
//! │  We parse the decimal TEXT straight into centavos:                      │
//! │    "179.9" → 17990 centavos, no float ever involved                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rocketshoes_core::money::Money;
//!
//! let price = Money::from_cents(17990); // R$ 179,90
//! let line = price * 2u32;              // R$ 359,80
//! assert_eq!(line.cents(), 35980);
//! assert_eq!(line.to_string(), "R$ 359,80");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::error::ValidationError;

/// Maximum number of fraction digits accepted by [`Money::parse_decimal`].
const MINOR_DIGITS: usize = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic never has to think about underflow
/// - **Single field tuple struct**: serializes as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(179, 90).cents(), 17990);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal string such as `"179.9"` or `"100"`.
    ///
    /// Accepts an optional leading `-`, an integer part and at most two
    /// fraction digits. Exponents and thousands separators are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("179.9").unwrap().cents(), 17990);
    /// assert_eq!(Money::parse_decimal("100").unwrap().cents(), 10000);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Self, ValidationError> {
        let parts = DecimalParts::split(text)?;
        if parts.fraction.len() > MINOR_DIGITS {
            return Err(invalid_price("more than two decimal places"));
        }
        parts.to_money(false)
    }

    /// Like [`parse_decimal`](Self::parse_decimal), but rounds any extra
    /// fraction digits to the nearest centavo, half away from zero.
    ///
    /// Prices computed in floating point by a server (`65.89000000000001`)
    /// land on the centavo they were meant to be.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// assert_eq!(Money::round_decimal("65.89000000000001").unwrap().cents(), 6589);
    /// assert_eq!(Money::round_decimal("1.995").unwrap().cents(), 200);
    /// assert_eq!(Money::round_decimal("-1.005").unwrap().cents(), -101);
    /// ```
    pub fn round_decimal(text: &str) -> Result<Self, ValidationError> {
        let parts = DecimalParts::split(text)?;
        let round_up = parts
            .fraction
            .as_bytes()
            .get(MINOR_DIGITS)
            .is_some_and(|&b| b >= b'5');
        parts.to_money(round_up)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

fn invalid_price(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    }
}

/// A decimal string split at the point, digits checked.
struct DecimalParts<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
}

impl<'a> DecimalParts<'a> {
    fn split(text: &'a str) -> Result<Self, ValidationError> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid_price("expected a decimal number"));
        }

        Ok(DecimalParts {
            negative,
            whole,
            fraction,
        })
    }

    /// Centavos from the whole part and the first two fraction digits,
    /// plus one when `round_up` is set.
    fn to_money(&self, round_up: bool) -> Result<Money, ValidationError> {
        let too_large = || invalid_price("value is too large");

        let major: i64 = self.whole.parse().map_err(|_| too_large())?;
        let minor = self
            .fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(MINOR_DIGITS)
            .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .and_then(|c| c.checked_add(i64::from(round_up)))
            .ok_or_else(too_large)?;

        Ok(Money(if self.negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as Brazilian Real: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.reais().abs().to_string();

        // Group thousands with '.'
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by a cart amount.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * i64::from(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
