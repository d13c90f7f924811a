//! Static country and currency tables for seller accounts.
//!
//! The provider's supported lists change over time; these tables are the
//! snapshot the marketplace currently accepts.

/// Countries a seller may declare as address or bank country.
pub const COUNTRIES: &[&str] = &[
    "AT", "AU", "BE", "BG", "CA", "CH", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB",
    "GR", "HK", "HU", "IE", "IT", "JP", "LT", "LU", "LV", "MT", "MX", "NL", "NO", "NZ", "PL",
    "PR", "PT", "RO", "SE", "SG", "SI", "SK", "US",
];

/// Currencies accepted for payout bank accounts.
pub const VALID_BANK_CURRENCIES: &[&str] = &[
    "AUD", "BGN", "CAD", "CHF", "CZK", "DKK", "EUR", "GBP", "HKD", "HUF", "JPY", "MXN", "NOK",
    "NZD", "PLN", "RON", "SEK", "SGD", "USD",
];

pub const PUERTO_RICO: &str = "PR";
pub const UNITED_STATES: &str = "US";
pub const JAPAN: &str = "JP";
pub const NEW_ZEALAND: &str = "NZ";

pub fn is_supported_country(code: &str) -> bool {
    COUNTRIES.contains(&code)
}

pub fn is_valid_bank_currency(code: &str) -> bool {
    VALID_BANK_CURRENCIES.contains(&code)
}

/// Payout currency used for a bank account located in `country`.
pub fn country_currency(country: &str) -> Option<&'static str> {
    let currency = match country {
        "AU" => "AUD",
        "BG" => "BGN",
        "CA" => "CAD",
        "CH" => "CHF",
        "CZ" => "CZK",
        "DK" => "DKK",
        "GB" => "GBP",
        "HK" => "HKD",
        "HU" => "HUF",
        "JP" => "JPY",
        "MX" => "MXN",
        "NO" => "NOK",
        "NZ" => "NZD",
        "PL" => "PLN",
        "RO" => "RON",
        "SE" => "SEK",
        "SG" => "SGD",
        "US" | "PR" => "USD",
        "AT" | "BE" | "CY" | "DE" | "EE" | "ES" | "FI" | "FR" | "GR" | "IE" | "IT" | "LT"
        | "LU" | "LV" | "MT" | "NL" | "PT" | "SI" | "SK" => "EUR",
        _ => return None,
    };
    Some(currency)
}

/// A `(country, state)` pair crossing the provider boundary.
///
/// The provider does not accept Puerto Rico as a country, so it travels as
/// `US` with state `PR`. Both directions are idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    pub country: Option<String>,
    pub state: Option<String>,
}

impl Region {
    pub fn new(country: Option<String>, state: Option<String>) -> Self {
        Self { country, state }
    }

    /// Outgoing direction: `PR` becomes `US` + state `PR`.
    pub fn mask(self) -> Self {
        if self.country.as_deref() == Some(PUERTO_RICO) {
            Self {
                country: Some(UNITED_STATES.to_string()),
                state: Some(PUERTO_RICO.to_string()),
            }
        } else {
            self
        }
    }

    /// Incoming direction: `US` + state `PR` becomes country `PR`.
    pub fn unmask(self) -> Self {
        if self.country.as_deref() == Some(UNITED_STATES)
            && self.state.as_deref() == Some(PUERTO_RICO)
        {
            Self {
                country: Some(PUERTO_RICO.to_string()),
                state: self.state,
            }
        } else {
            self
        }
    }
}
