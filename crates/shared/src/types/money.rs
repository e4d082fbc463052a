//! Money type with exact decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and keeps every value at a
//! fixed scale of four fractional digits. The only float that ever
//! leaves this module is [`Money::ratio`], used for runway months where
//! fractional precision loss is acceptable.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced by monetary parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Input string is not a valid decimal number.
    #[error("invalid monetary value: {0}")]
    Parse(String),

    /// Value has more integer digits than the storage precision allows.
    #[error("monetary value exceeds {max} integer digits", max = Money::MAX_INTEGER_DIGITS)]
    PrecisionExceeded,

    /// Arithmetic overflowed the decimal range.
    #[error("monetary arithmetic overflow")]
    Overflow,

    /// Division by a zero amount.
    #[error("division by zero amount")]
    DivisionByZero,
}

/// A monetary amount: signed exact decimal with scale 4.
///
/// All constructors normalize to four fractional digits, rounding half
/// away from zero on excess scale, so equality and ordering compare the
/// normalized representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl Money {
    /// Fixed number of fractional digits.
    pub const SCALE: u32 = 4;

    /// Maximum number of integer digits accepted for storage.
    pub const MAX_INTEGER_DIGITS: u32 = 15;

    /// Creates a Money value from a decimal, normalizing to scale 4.
    ///
    /// Excess fractional digits are rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::PrecisionExceeded`] if the integer part has
    /// more than [`Self::MAX_INTEGER_DIGITS`] digits.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);

        if normalized.abs() >= Self::integer_limit() {
            return Err(MoneyError::PrecisionExceeded);
        }

        // Pad to exactly four fractional digits so Display and equality
        // always see the same representation.
        normalized.rescale(Self::SCALE);
        Ok(Self(normalized))
    }

    /// The zero amount.
    #[must_use]
    pub fn zero() -> Self {
        let mut value = Decimal::ZERO;
        value.rescale(Self::SCALE);
        Self(value)
    }

    /// The unit amount, used as the default exchange rate.
    #[must_use]
    pub fn one() -> Self {
        let mut value = Decimal::ONE;
        value.rescale(Self::SCALE);
        Self(value)
    }

    /// Parses a Money value from a plain decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Parse`] on non-numeric input and
    /// [`MoneyError::PrecisionExceeded`] on out-of-range values.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        let value: Decimal = trimmed
            .parse()
            .map_err(|_| MoneyError::Parse(trimmed.to_string()))?;
        Self::new(value)
    }

    /// Returns the inner decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns the amount with its sign flipped.
    #[must_use]
    pub fn neg(self) -> Self {
        Self(-self.0)
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the sum leaves the storage range.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::Overflow)?;
        Self::new(sum).map_err(|_| MoneyError::Overflow)
    }

    /// Subtracts an amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the difference leaves the
    /// storage range.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        let diff = self.0.checked_sub(other.0).ok_or(MoneyError::Overflow)?;
        Self::new(diff).map_err(|_| MoneyError::Overflow)
    }

    /// Multiplies two amounts, rounding the result half away from zero
    /// back to scale 4.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the product leaves the
    /// storage range.
    pub fn checked_mul(self, other: Self) -> Result<Self, MoneyError> {
        let product = self.0.checked_mul(other.0).ok_or(MoneyError::Overflow)?;
        Self::new(product).map_err(|_| MoneyError::Overflow)
    }

    /// Divides the amount by an integer count, rounding half away from
    /// zero back to scale 4. Used for averaging monthly expenses.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::DivisionByZero`] for a zero divisor.
    pub fn checked_div_scalar(self, divisor: u32) -> Result<Self, MoneyError> {
        if divisor == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        let quotient = self
            .0
            .checked_div(Decimal::from(divisor))
            .ok_or(MoneyError::Overflow)?;
        Self::new(quotient).map_err(|_| MoneyError::Overflow)
    }

    /// Divides one amount by another, producing a 64-bit float.
    ///
    /// This is the only lossy operation on Money; it exists solely for
    /// the runway computation where fractional months are acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::DivisionByZero`] for a zero divisor.
    pub fn ratio(self, divisor: Self) -> Result<f64, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let quotient = self
            .0
            .checked_div(divisor.0)
            .ok_or(MoneyError::Overflow)?;
        quotient.to_f64().ok_or(MoneyError::Overflow)
    }

    fn integer_limit() -> Decimal {
        // 10^15: smallest absolute value with 16 integer digits.
        Decimal::new(1_000_000_000_000_000, 0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Decimal = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
