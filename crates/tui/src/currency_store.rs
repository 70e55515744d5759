//! The single owner of the display-currency preference and the rate snapshot.
//!
//! Every widget renders amounts through this store on every frame, so there
//! is exactly one source of truth: changing the preference (or installing a
//! fresh rate table) is visible on the next draw with no other bookkeeping.

use engine::{ConversionError, Currency, Money, RateTable};

/// A monetary value prepared for display.
///
/// `original` carries the source-currency rendering when the shown text is a
/// conversion, so the UI can annotate it; it is `None` when no conversion
/// happened (same currency, or graceful fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountDisplay {
    pub text: String,
    pub original: Option<String>,
}

#[derive(Debug)]
pub struct CurrencyStore {
    preferred: Currency,
    rates: Option<RateTable>,
}

impl CurrencyStore {
    pub fn new(preferred: Currency) -> Self {
        Self {
            preferred,
            rates: None,
        }
    }

    pub fn preferred(&self) -> Currency {
        self.preferred
    }

    /// The only write entry point for the preference.
    pub fn set_preferred(&mut self, currency: Currency) {
        self.preferred = currency;
    }

    /// Replaces the rate snapshot (last-write-wins).
    pub fn install_rates(&mut self, table: RateTable) {
        self.rates = Some(table);
    }

    pub fn has_rates(&self) -> bool {
        self.rates.is_some()
    }

    /// Converts an amount into the preferred currency.
    ///
    /// Fails with `RatesUnavailable` before the first snapshot arrives and
    /// with `MissingRate` when the table lacks a code; callers fall back to
    /// the original amount in both cases.
    pub fn convert(&self, amount: Money, from: Currency) -> Result<Money, ConversionError> {
        if from == self.preferred {
            return Ok(amount);
        }
        let table = self
            .rates
            .as_ref()
            .ok_or(ConversionError::RatesUnavailable)?;
        table.convert(amount, from, self.preferred)
    }

    /// Currency-aware formatting, independent of the preference.
    pub fn format(&self, amount: Money, currency: Currency) -> String {
        amount.format(currency)
    }

    /// Prepares an amount for display in the preferred currency.
    ///
    /// - Same currency: formatted as-is, no conversion attempted.
    /// - Convertible: the converted text, plus the original for annotation.
    /// - Anything else: the original formatted amount, silently.
    pub fn display(&self, amount: Money, from: Currency) -> AmountDisplay {
        if from == self.preferred {
            return AmountDisplay {
                text: amount.format(from),
                original: None,
            };
        }
        match self.convert(amount, from) {
            Ok(converted) => AmountDisplay {
                text: converted.format(self.preferred),
                original: Some(amount.format(from)),
            },
            Err(_) => AmountDisplay {
                text: amount.format(from),
                original: None,
            },
        }
    }

    /// Sums mixed-currency rows in the preferred currency.
    ///
    /// Fails if any row cannot be converted; callers then show per-currency
    /// rows instead of a bogus partial total.
    pub fn sum_in_preferred(
        &self,
        rows: impl IntoIterator<Item = (Money, Currency)>,
    ) -> Result<Money, ConversionError> {
        let mut total = Money::ZERO;
        for (amount, currency) in rows {
            total += self.convert(amount, currency)?;
        }
        Ok(total)
    }
}

/// Wire currency → engine currency.
pub fn engine_currency(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Gbp => Currency::Gbp,
        api_types::Currency::Mxn => Currency::Mxn,
        api_types::Currency::Cad => Currency::Cad,
        api_types::Currency::Aud => Currency::Aud,
        api_types::Currency::Jpy => Currency::Jpy,
        api_types::Currency::Chf => Currency::Chf,
        api_types::Currency::Brl => Currency::Brl,
        api_types::Currency::Cop => Currency::Cop,
    }
}

/// Engine currency → wire currency.
pub fn api_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Usd => api_types::Currency::Usd,
        Currency::Eur => api_types::Currency::Eur,
        Currency::Gbp => api_types::Currency::Gbp,
        Currency::Mxn => api_types::Currency::Mxn,
        Currency::Cad => api_types::Currency::Cad,
        Currency::Aud => api_types::Currency::Aud,
        Currency::Jpy => api_types::Currency::Jpy,
        Currency::Chf => api_types::Currency::Chf,
        Currency::Brl => api_types::Currency::Brl,
        Currency::Cop => api_types::Currency::Cop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_with_rates(preferred: Currency) -> CurrencyStore {
        let mut store = CurrencyStore::new(preferred);
        store.install_rates(RateTable::new(
            Currency::Usd,
            [(Currency::Eur, 0.9), (Currency::Gbp, 0.8)],
            Utc::now(),
        ));
        store
    }

    #[test]
    fn same_currency_skips_conversion_even_without_rates() {
        let store = CurrencyStore::new(Currency::Eur);
        let shown = store.display(Money::new(100_00), Currency::Eur);
        assert_eq!(shown.text, "€100.00");
        assert_eq!(shown.original, None);
    }

    #[test]
    fn converted_amounts_carry_the_original_annotation() {
        let store = store_with_rates(Currency::Eur);
        let shown = store.display(Money::new(100_00), Currency::Usd);
        assert_eq!(shown.text, "€90.00");
        assert_eq!(shown.original.as_deref(), Some("$100.00"));
    }

    #[test]
    fn missing_rate_falls_back_to_the_original() {
        let store = store_with_rates(Currency::Eur);
        let shown = store.display(Money::new(1000), Currency::Jpy);
        assert_eq!(shown.text, "¥1000");
        assert_eq!(shown.original, None);
    }

    #[test]
    fn no_rates_yet_falls_back_to_the_original() {
        let store = CurrencyStore::new(Currency::Eur);
        assert_eq!(
            store.convert(Money::new(100), Currency::Usd),
            Err(ConversionError::RatesUnavailable)
        );
        let shown = store.display(Money::new(100_00), Currency::Usd);
        assert_eq!(shown.text, "$100.00");
        assert_eq!(shown.original, None);
    }

    #[test]
    fn set_preferred_changes_display_immediately() {
        let mut store = store_with_rates(Currency::Eur);
        assert_eq!(store.display(Money::new(100_00), Currency::Usd).text, "€90.00");

        store.set_preferred(Currency::Usd);
        assert_eq!(store.preferred(), Currency::Usd);
        let shown = store.display(Money::new(100_00), Currency::Usd);
        assert_eq!(shown.text, "$100.00");
        assert_eq!(shown.original, None);
    }

    #[test]
    fn install_rates_is_last_write_wins() {
        let mut store = store_with_rates(Currency::Eur);
        store.install_rates(RateTable::new(
            Currency::Usd,
            [(Currency::Eur, 0.5)],
            Utc::now(),
        ));
        assert_eq!(store.display(Money::new(100_00), Currency::Usd).text, "€50.00");
    }

    #[test]
    fn sum_in_preferred_converts_every_row_or_fails() {
        let store = store_with_rates(Currency::Eur);
        let total = store
            .sum_in_preferred([
                (Money::new(100_00), Currency::Usd),
                (Money::new(10_00), Currency::Eur),
            ])
            .unwrap();
        assert_eq!(total, Money::new(100_00));

        let err = store
            .sum_in_preferred([
                (Money::new(100_00), Currency::Usd),
                (Money::new(1000), Currency::Jpy),
            ])
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingRate(Currency::Jpy));
    }
}
