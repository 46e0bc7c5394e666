use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::CENTS_PER_UNIT;

/// Exact currency value stored as integer cents.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount `{0}`")]
    Invalid(String),
    #[error("amount `{0}` has more than two decimal places")]
    TooPrecise(String),
    #[error("amount `{0}` is too large")]
    Overflow(String),
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole currency units (e.g. `from_units(10)` is `$10.00`).
    pub const fn from_units(units: u64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Amount> {
        self.0.checked_mul(factor).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Signed difference `self - other` in cents.
    pub fn signed_diff(self, other: Amount) -> i64 {
        let diff = self.0 as i128 - other.0 as i128;
        diff.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    /// Value in whole units, for analytics only.
    pub fn as_units_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / CENTS_PER_UNIT,
            self.0 % CENTS_PER_UNIT
        )
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountParseError::Invalid(raw.to_string()));
        }
        if fraction.len() > 2 {
            return Err(AmountParseError::TooPrecise(raw.to_string()));
        }

        let overflow = || AmountParseError::Overflow(raw.to_string());
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut cents: u64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| overflow())?
        };
        if fraction.len() == 1 {
            cents *= 10;
        }

        whole
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(cents))
            .map(Amount)
            .ok_or_else(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("10".parse::<Amount>(), Ok(Amount::from_units(10)));
        assert_eq!("10.5".parse::<Amount>(), Ok(Amount::from_cents(1_050)));
        assert_eq!("10.05".parse::<Amount>(), Ok(Amount::from_cents(1_005)));
        assert_eq!("$0.25".parse::<Amount>(), Ok(Amount::from_cents(25)));
        assert_eq!(".5".parse::<Amount>(), Ok(Amount::from_cents(50)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Amount>(), Err(AmountParseError::Empty));
        assert!(matches!(
            "-5".parse::<Amount>(),
            Err(AmountParseError::Invalid(_))
        ));
        assert!(matches!(
            "1e3".parse::<Amount>(),
            Err(AmountParseError::Invalid(_))
        ));
        assert!(matches!(
            ".".parse::<Amount>(),
            Err(AmountParseError::Invalid(_))
        ));
        assert!(matches!(
            "1.234".parse::<Amount>(),
            Err(AmountParseError::TooPrecise(_))
        ));
        assert!(matches!(
            "999999999999999999999".parse::<Amount>(),
            Err(AmountParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_cents(135_000).to_string(), "$1350.00");
        assert_eq!(Amount::from_cents(7).to_string(), "$0.07");
    }

    #[test]
    fn test_saturating_and_signed() {
        let ten = Amount::from_units(10);
        let five = Amount::from_units(5);
        assert_eq!(five.saturating_sub(ten), Amount::ZERO);
        assert_eq!(five.signed_diff(ten), -500);
        assert_eq!(ten.signed_diff(five), 500);
    }

    #[test]
    fn test_sum_is_exact() {
        // 0.10 summed a thousand times drifts in f64 but not in cents.
        let total: Amount = std::iter::repeat(Amount::from_cents(10)).take(1_000).sum();
        assert_eq!(total, Amount::from_units(100));
    }
}
