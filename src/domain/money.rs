use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(PaymentError::ValidationError(format!(
                "Invalid currency code: {code}"
            )))
        }
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Number of decimal places in the currency's minor unit.
    pub fn exponent(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "CLP" | "VND" | "ISK" | "HUF" => 0,
            _ => 2,
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A monetary amount in integer minor units (cents) tagged with its currency.
///
/// All receipt arithmetic happens on the integer `cents` value. `Decimal` is only
/// used when converting to major units for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(cents: i64, currency: Currency) -> Self {
        Self { cents, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Amount in major units, e.g. 150 EUR cents -> 1.50.
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.cents, self.currency.exponent())
    }

    pub fn checked_add(&self, rhs: &Money) -> Result<Money> {
        self.ensure_same_currency(rhs)?;
        let cents = self
            .cents
            .checked_add(rhs.cents)
            .ok_or_else(|| PaymentError::ValidationError("Amount overflow".to_string()))?;
        Ok(Money::new(cents, self.currency.clone()))
    }

    pub fn checked_sub(&self, rhs: &Money) -> Result<Money> {
        self.ensure_same_currency(rhs)?;
        let cents = self
            .cents
            .checked_sub(rhs.cents)
            .ok_or_else(|| PaymentError::ValidationError("Amount overflow".to_string()))?;
        Ok(Money::new(cents, self.currency.clone()))
    }

    pub fn checked_mul(&self, factor: u32) -> Result<Money> {
        let cents = self
            .cents
            .checked_mul(i64::from(factor))
            .ok_or_else(|| PaymentError::ValidationError("Amount overflow".to_string()))?;
        Ok(Money::new(cents, self.currency.clone()))
    }

    pub fn negated(&self) -> Money {
        Money::new(-self.cents, self.currency.clone())
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(PaymentError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: other.currency.to_string(),
            })
        }
    }
}
