//! Exchange-rate snapshots and display conversion.
//!
//! A [`RateTable`] is an immutable snapshot of rates quoted against one base
//! currency. Refreshing rates means replacing the whole snapshot; entries are
//! never patched in place. Conversion failures are ordinary values
//! ([`ConversionError`]), so callers can always fall back to showing the
//! original amount.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Currency, Money};

/// Non-fatal reasons a conversion cannot be performed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("no exchange rate for {0}")]
    MissingRate(Currency),
    #[error("exchange rates not loaded")]
    RatesUnavailable,
}

/// Snapshot of exchange rates relative to a fixed base currency.
///
/// Rates are floats and only ever touch money at this display edge; ledger
/// amounts stay in integer minor units (see `Money`).
#[derive(Debug, Clone)]
pub struct RateTable {
    base: Currency,
    rates: HashMap<Currency, f64>,
    fetched_at: DateTime<Utc>,
}

impl RateTable {
    /// Builds a snapshot from `(currency, rate)` entries quoted against
    /// `base`.
    ///
    /// Non-finite and non-positive rates are discarded. The base currency is
    /// pinned to `1.0` whether or not the source included it.
    #[must_use]
    pub fn new(
        base: Currency,
        entries: impl IntoIterator<Item = (Currency, f64)>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut rates: HashMap<Currency, f64> = entries
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.insert(base, 1.0);
        Self {
            base,
            rates,
            fetched_at,
        }
    }

    #[must_use]
    pub fn base(&self) -> Currency {
        self.base
    }

    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Rate for one currency relative to the base, if quoted.
    #[must_use]
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    /// Iterates over every quoted `(currency, rate)` pair.
    pub fn entries(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.rates.iter().map(|(currency, rate)| (*currency, *rate))
    }

    /// Converts `amount` from one currency to another for display.
    ///
    /// - `from == to` is the identity: the amount is returned unchanged with
    ///   no table lookup.
    /// - A currency absent from the table yields
    ///   [`ConversionError::MissingRate`].
    /// - Otherwise the amount is scaled through the base
    ///   (`major * rate(to) / rate(from)`), which gives the same result
    ///   whichever currency the table happens to be quoted against, and the
    ///   result is rounded to the target currency's minor units.
    pub fn convert(
        &self,
        amount: Money,
        from: Currency,
        to: Currency,
    ) -> Result<Money, ConversionError> {
        Ok(Money::new(self.convert_minor(amount.minor(), from, to)?))
    }

    /// Minor-units variant of [`RateTable::convert`].
    pub fn convert_minor(
        &self,
        amount_minor: i64,
        from: Currency,
        to: Currency,
    ) -> Result<i64, ConversionError> {
        if from == to {
            return Ok(amount_minor);
        }

        let from_rate = self
            .rate(from)
            .ok_or(ConversionError::MissingRate(from))?;
        let to_rate = self.rate(to).ok_or(ConversionError::MissingRate(to))?;

        let from_scale = 10f64.powi(from.minor_units() as i32);
        let to_scale = 10f64.powi(to.minor_units() as i32);

        let major = amount_minor as f64 / from_scale;
        let converted = major * to_rate / from_rate;
        Ok((converted * to_scale).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usd_based(entries: &[(Currency, f64)]) -> RateTable {
        RateTable::new(Currency::Usd, entries.iter().copied(), Utc::now())
    }

    #[test]
    fn identity_needs_no_rates() {
        let table = usd_based(&[]);
        let amount = Money::new(123_456);
        assert_eq!(
            table.convert(amount, Currency::Cop, Currency::Cop).unwrap(),
            amount
        );
    }

    #[test]
    fn converts_through_the_base() {
        // 100 USD at EUR 0.9 per USD.
        let table = usd_based(&[(Currency::Eur, 0.9)]);
        let converted = table
            .convert(Money::new(100_00), Currency::Usd, Currency::Eur)
            .unwrap();
        assert_eq!(converted, Money::new(90_00));
    }

    #[test]
    fn result_is_independent_of_the_table_base() {
        // Same market quoted two ways: USD-based and EUR-based.
        let usd_table = usd_based(&[(Currency::Eur, 0.8), (Currency::Gbp, 0.5)]);
        let eur_table = RateTable::new(
            Currency::Eur,
            [(Currency::Usd, 1.25), (Currency::Gbp, 0.625)],
            Utc::now(),
        );

        let amount = Money::new(40_00);
        let via_usd = usd_table
            .convert(amount, Currency::Eur, Currency::Gbp)
            .unwrap();
        let via_eur = eur_table
            .convert(amount, Currency::Eur, Currency::Gbp)
            .unwrap();
        assert_eq!(via_usd, via_eur);
        assert_eq!(via_usd, Money::new(25_00));
    }

    #[test]
    fn round_trip_is_stable_within_one_minor_unit() {
        let table = usd_based(&[(Currency::Eur, 0.9137), (Currency::Gbp, 0.7891)]);
        let amount = Money::new(12_345_67);

        let there = table
            .convert(amount, Currency::Eur, Currency::Gbp)
            .unwrap();
        let back = table.convert(there, Currency::Gbp, Currency::Eur).unwrap();
        assert!((back.minor() - amount.minor()).abs() <= 1);
    }

    #[test]
    fn missing_code_fails_both_directions() {
        let table = usd_based(&[(Currency::Eur, 0.9)]);
        assert_eq!(
            table.convert_minor(1000, Currency::Jpy, Currency::Eur),
            Err(ConversionError::MissingRate(Currency::Jpy))
        );
        assert_eq!(
            table.convert_minor(1000, Currency::Eur, Currency::Jpy),
            Err(ConversionError::MissingRate(Currency::Jpy))
        );
    }

    #[test]
    fn minor_unit_scaling_crosses_currencies() {
        // 100.00 USD at 149.5 JPY per USD -> ¥14950 (JPY has no minor units).
        let table = usd_based(&[(Currency::Jpy, 149.5)]);
        let converted = table
            .convert(Money::new(100_00), Currency::Usd, Currency::Jpy)
            .unwrap();
        assert_eq!(converted, Money::new(14_950));

        let back = table
            .convert(Money::new(14_950), Currency::Jpy, Currency::Usd)
            .unwrap();
        assert_eq!(back, Money::new(100_00));
    }

    #[test]
    fn bogus_rates_are_dropped_at_construction() {
        let table = usd_based(&[(Currency::Eur, 0.0), (Currency::Gbp, f64::NAN)]);
        assert_eq!(
            table.convert_minor(100, Currency::Usd, Currency::Eur),
            Err(ConversionError::MissingRate(Currency::Eur))
        );
        assert_eq!(
            table.convert_minor(100, Currency::Usd, Currency::Gbp),
            Err(ConversionError::MissingRate(Currency::Gbp))
        );
    }

    #[test]
    fn base_rate_is_always_one() {
        let table = usd_based(&[(Currency::Eur, 0.9)]);
        assert_eq!(table.rate(Currency::Usd), Some(1.0));
    }
}
