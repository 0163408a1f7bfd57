use std::fmt;

use serde::Deserialize;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoneyError {
    #[error("Overflow error while applying {0} operation on {1:?} and {2:?}")]
    Overflow(&'static str, Money, Money),

    #[error("Underflow error while applying {0} operation on {1:?} and {2:?}")]
    Underflow(&'static str, Money, Money),

    #[error("Money parse error: {0}, {1}")]
    Parse(&'static str, String),
}

/// Fixed-point monetary amount with 4 implied decimal places.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Number of minor units per whole currency unit.
    const SCALE: i64 = 10_000;

    pub fn parse(string: String) -> crate::Result<Self> {
        let trimmed = string.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = unsigned.split('.');

        if parts.clone().count() > 2 {
            Err(MoneyError::Parse("Too many decimal points", string.clone()))?
        }

        let dollars = match parts.next() {
            None | Some("") => "0".to_string(),
            Some(dollars) => dollars.to_string(),
        };

        let cents = match parts.next() {
            None => "0000".to_string(),
            Some(cents) => format!("{:0<4}", cents)[..4].to_string(),
        };

        let dollars: i64 = dollars.parse()?;
        let cents: i64 = cents.parse()?;

        let magnitude = dollars
            .checked_mul(Self::SCALE)
            .and_then(|minor| minor.checked_add(cents))
            .ok_or_else(|| MoneyError::Parse("Amount out of range", string))?;

        if negative {
            return Ok(Money(-magnitude));
        }

        return Ok(Money(magnitude));
    }

    pub fn add(&mut self, other: &Self) -> Result<(), MoneyError> {
        let sum = match self.0.checked_add(other.0) {
            Some(sum) => sum,
            None if other.0 > 0 => return Err(MoneyError::Overflow("add", *self, *other)),
            None => return Err(MoneyError::Underflow("add", *self, *other)),
        };

        self.0 = sum;

        return Ok(());
    }

    pub fn sub(&mut self, other: &Self) -> Result<(), MoneyError> {
        let diff = match self.0.checked_sub(other.0) {
            Some(diff) => diff,
            None if other.0 < 0 => return Err(MoneyError::Overflow("sub", *self, *other)),
            None => return Err(MoneyError::Underflow("sub", *self, *other)),
        };

        self.0 = diff;

        return Ok(());
    }

    /// Converts this amount with the given exchange rate, rounding to the
    /// nearest minor unit. Pure: the stored amount is never changed.
    pub fn convert(&self, rate: f64) -> Self {
        return Self(((self.0 as f64) * rate).round() as i64);
    }

    pub fn is_positive(&self) -> bool {
        return self.0 > 0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let minor = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        let scale = Self::SCALE as u64;

        write!(f, "{sign}{}.{:02}", minor / scale, (minor % scale) / 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_amount() {
        assert_eq!(Money::parse("500".to_string()).unwrap(), Money(5_000_000));
    }

    #[test]
    fn parse_fractional_amount() {
        assert_eq!(Money::parse("12.5".to_string()).unwrap(), Money(125_000));
        assert_eq!(Money::parse("12.3456".to_string()).unwrap(), Money(123_456));
    }

    #[test]
    fn parse_negative_amount() {
        assert_eq!(Money::parse("-5.25".to_string()).unwrap(), Money(-52_500));
    }

    #[test]
    fn parse_rejects_multiple_decimal_points() {
        assert!(Money::parse("1.2.3".to_string()).is_err());
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(Money::parse("abc".to_string()).is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_amounts() {
        assert!(Money::parse("2000000000000000".to_string()).is_err());
        assert!(Money::parse("922337203685477.9999".to_string()).is_err());
    }

    #[test]
    fn add_and_sub() {
        let mut money = Money(5_000_000);

        money.add(&Money(1_000_000)).unwrap();
        assert_eq!(money, Money(6_000_000));

        money.sub(&Money(2_000_000)).unwrap();
        assert_eq!(money, Money(4_000_000));
    }

    #[test]
    fn add_overflow_leaves_value_untouched() {
        let mut money = Money::MAX;

        assert!(money.add(&Money(1)).is_err());
        assert_eq!(money, Money::MAX);
    }

    #[test]
    fn sub_underflow_leaves_value_untouched() {
        let mut money = Money::MIN;

        assert!(money.sub(&Money(1)).is_err());
        assert_eq!(money, Money::MIN);
    }

    #[test]
    fn convert_is_pure() {
        let money = Money(5_000_000);

        assert_eq!(money.convert(0.5), Money(2_500_000));
        assert_eq!(money, Money(5_000_000));
    }

    #[test]
    fn display_two_decimal_places() {
        assert_eq!(Money(5_000_000).to_string(), "500.00");
        assert_eq!(Money(125_000).to_string(), "12.50");
        assert_eq!(Money(-52_500).to_string(), "-5.25");
    }
}
