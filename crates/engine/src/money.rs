use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::{Currency, EngineError};

/// Signed money amount represented as an integer number of **minor units**.
///
/// Use this type for **all** monetary values in the engine (balances, caps,
/// transaction amounts) to avoid floating-point drift. The paired currency
/// decides how many minor units make a major unit; the value itself is just
/// the count.
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.format(Currency::Eur), "€12.34");
/// assert_eq!(Money::new(1000).format(Currency::Jpy), "¥1000");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more decimals than the currency carries):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse("10", Currency::Eur).unwrap().minor(), 1000);
/// assert_eq!(Money::parse("10,5", Currency::Eur).unwrap().minor(), 1050);
/// assert!(Money::parse("12.345", Currency::Eur).is_err());
/// assert!(Money::parse("12.3", Currency::Jpy).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Formats the amount for display in the given currency.
    ///
    /// Symbol first, then sign, then major units with the currency's number
    /// of fraction digits: `€12.34`, `€-0.05`, `¥1000`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let digits = currency.minor_units() as u32;
        if digits == 0 {
            return format!("{}{sign}{abs}", currency.symbol());
        }
        let scale = 10u64.pow(digits);
        let major = abs / scale;
        let frac = abs % scale;
        format!(
            "{}{sign}{major}.{frac:0width$}",
            currency.symbol(),
            width = digits as usize
        )
    }

    /// Parses a decimal string into minor units of the given currency.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - at most `currency.minor_units()` fractional digits
    /// - rejects empty/invalid strings
    pub fn parse(s: &str, currency: Currency) -> Result<Self, EngineError> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| invalid())?;

        let digits = currency.minor_units() as u32;
        let scale = 10i64.pow(digits);

        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > digits as usize {
                    return Err(EngineError::InvalidAmount("too many decimals".to_string()));
                }
                let parsed: i64 = frac.parse().map_err(|_| invalid())?;
                parsed * 10i64.pow(digits - frac.len() as u32)
            }
        };

        let total = major
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_two_decimal_currency() {
        assert_eq!(Money::new(0).format(Currency::Eur), "€0.00");
        assert_eq!(Money::new(1).format(Currency::Eur), "€0.01");
        assert_eq!(Money::new(10).format(Currency::Eur), "€0.10");
        assert_eq!(Money::new(1050).format(Currency::Eur), "€10.50");
        assert_eq!(Money::new(-1050).format(Currency::Eur), "€-10.50");
        assert_eq!(Money::new(10000).format(Currency::Usd), "$100.00");
    }

    #[test]
    fn format_zero_decimal_currency() {
        assert_eq!(Money::new(1000).format(Currency::Jpy), "¥1000");
        assert_eq!(Money::new(-5).format(Currency::Jpy), "¥-5");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(Money::parse("10", Currency::Eur).unwrap().minor(), 1000);
        assert_eq!(Money::parse("10.5", Currency::Eur).unwrap().minor(), 1050);
        assert_eq!(Money::parse("10,50", Currency::Eur).unwrap().minor(), 1050);
        assert_eq!(Money::parse("-0.01", Currency::Eur).unwrap().minor(), -1);
        assert_eq!(Money::parse("+1.00", Currency::Eur).unwrap().minor(), 100);
        assert_eq!(Money::parse("  2.30 ", Currency::Eur).unwrap().minor(), 230);
    }

    #[test]
    fn parse_respects_currency_minor_units() {
        assert_eq!(Money::parse("1000", Currency::Jpy).unwrap().minor(), 1000);
        assert!(Money::parse("10.5", Currency::Jpy).is_err());
        assert!(Money::parse("12.345", Currency::Eur).is_err());
        assert!(Money::parse("0.001", Currency::Usd).is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Money::parse("", Currency::Eur).is_err());
        assert!(Money::parse("abc", Currency::Eur).is_err());
        assert!(Money::parse("1.2.3", Currency::Eur).is_err());
    }
}
