use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code carried by accounts and money values.
///
/// The set is closed: these are the currencies the selector UI offers and the
/// rate table may quote. Adding a currency means extending this enum.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 EUR`)
/// - minor units (stored integers, e.g. `1050`)
///
/// Most currencies use 2; JPY has no fractional unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Mxn,
    Cad,
    Aud,
    Jpy,
    Chf,
    Brl,
    Cop,
}

impl Currency {
    /// Every supported currency, in the order the selector UI presents them.
    pub const ALL: [Currency; 10] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Mxn,
        Currency::Cad,
        Currency::Aud,
        Currency::Jpy,
        Currency::Chf,
        Currency::Brl,
        Currency::Cop,
    ];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Mxn => "MXN",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Brl => "BRL",
            Currency::Cop => "COP",
        }
    }

    /// Display symbol used when formatting amounts.
    ///
    /// Dollar currencies are disambiguated with a prefix (`CA$`, `MX$`, ...).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Mxn => "MX$",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
            Currency::Jpy => "¥",
            Currency::Chf => "CHF ",
            Currency::Brl => "R$",
            Currency::Cop => "CO$",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "MXN" => Ok(Currency::Mxn),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            "JPY" => Ok(Currency::Jpy),
            "CHF" => Ok(Currency::Chf),
            "BRL" => Ok(Currency::Brl),
            "COP" => Ok(Currency::Cop),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_supported_code() {
        for currency in Currency::ALL {
            assert_eq!(Currency::try_from(currency.code()).unwrap(), currency);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(Currency::try_from(" eur ").unwrap(), Currency::Eur);
        assert_eq!(Currency::try_from("jpy").unwrap(), Currency::Jpy);
    }

    #[test]
    fn rejects_unknown_code() {
        assert!(Currency::try_from("XTS").is_err());
        assert!(Currency::try_from("").is_err());
    }

    #[test]
    fn jpy_has_no_minor_units() {
        assert_eq!(Currency::Jpy.minor_units(), 0);
        assert_eq!(Currency::Eur.minor_units(), 2);
    }
}
