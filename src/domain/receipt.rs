use super::money::{Currency, Money};
use crate::error::{PaymentError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gateway {
    Paypal,
    Stripe,
}

impl Gateway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paypal => "paypal",
            Self::Stripe => "stripe",
        }
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Item,
    Hour,
}

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Booking {
    /// Booked hours, partial hours rounded up.
    pub fn duration_hours(&self) -> Result<u32> {
        let seconds = (self.end_time - self.start_time).num_seconds();
        if seconds <= 0 {
            return Err(PaymentError::ValidationError(
                "Booking must end after it starts".to_string(),
            ));
        }
        let hours = (seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR;
        u32::try_from(hours)
            .map_err(|_| PaymentError::ValidationError("Booking is too long".to_string()))
    }
}

/// A paid transaction as the platform persisted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub gateway: Gateway,
    pub unit_price: Option<Money>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_type: UnitType,
    #[serde(default)]
    pub booking: Option<Booking>,
    /// Commission percentages configured at checkout.
    #[serde(default)]
    pub commission_from_seller: Option<Decimal>,
    #[serde(default)]
    pub commission_from_buyer: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaypalPayment {
    pub payment_total: Option<Money>,
    pub fee_total: Option<Money>,
    pub commission_total: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StripePayment {
    pub sum: Option<Money>,
    pub commission: Option<Money>,
    pub buyer_commission: Option<Money>,
}

/// Gateway-specific payment details stored next to the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gateway", rename_all = "lowercase")]
pub enum PaymentRecord {
    Paypal(PaypalPayment),
    Stripe(StripePayment),
}

impl PaymentRecord {
    pub fn gateway(&self) -> Gateway {
        match self {
            Self::Paypal(_) => Gateway::Paypal,
            Self::Stripe(_) => Gateway::Stripe,
        }
    }
}

/// Whether funds reach the seller at once or wait for order completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FundsHold {
    Immediate,
    Escrow,
}

impl FundsHold {
    pub fn for_gateway(gateway: Gateway) -> Self {
        match gateway {
            Gateway::Paypal => Self::Immediate,
            Gateway::Stripe => Self::Escrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pricing {
    PerItem,
    PerHour { unit_price: Money, duration_hours: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Seller,
    Buyer,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Buyer => "buyer",
        }
    }
}

/// Selects the receipt wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptVariant {
    pub gateway: Gateway,
    pub hold: FundsHold,
    pub pricing: Pricing,
}

impl ReceiptVariant {
    pub fn is_per_hour(&self) -> bool {
        matches!(self.pricing, Pricing::PerHour { .. })
    }

    /// Template name, e.g. `payment_receipt_to_seller.stripe_escrow_per_hour`.
    pub fn template_key(&self, audience: Audience) -> String {
        let hold = match self.hold {
            FundsHold::Immediate => "immediate",
            FundsHold::Escrow => "escrow",
        };
        let unit = if self.is_per_hour() { "per_hour" } else { "per_item" };
        format!(
            "payment_receipt_to_{}.{}_{}_{}",
            audience.as_str(),
            self.gateway,
            hold,
            unit
        )
    }
}

/// Itemized amounts shown on a payment receipt.
///
/// Fees are stored as positive amounts; renderers decide on the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    pub currency: Currency,
    pub unit_price: Money,
    pub quantity: u32,
    /// Listing price times quantity, before any buyer surcharge.
    pub gross_amount: Money,
    /// Platform commission taken from the seller.
    pub service_fee: Money,
    /// Gateway processing fee taken from the seller.
    pub processing_fee: Money,
    /// Platform commission the buyer pays on top of the gross amount.
    pub buyer_commission: Money,
    /// What the seller ends up with.
    pub net_total: Money,
    /// What the buyer was charged.
    pub buyer_total: Money,
    pub variant: ReceiptVariant,
}

impl FeeBreakdown {
    pub fn has_buyer_commission(&self) -> bool {
        self.buyer_commission.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(start: &str, end: &str) -> Booking {
        Booking {
            start_time: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M").unwrap(),
            end_time: NaiveDateTime::parse_from_str(end, "%Y-%m-%d %H:%M").unwrap(),
        }
    }

    #[test]
    fn test_booking_duration_hours() {
        assert_eq!(
            booking("2017-11-14 09:00", "2017-11-14 12:00")
                .duration_hours()
                .unwrap(),
            3
        );
        assert_eq!(
            booking("2017-11-14 09:00", "2017-11-14 12:30")
                .duration_hours()
                .unwrap(),
            4
        );
        assert!(
            booking("2017-11-14 12:00", "2017-11-14 12:00")
                .duration_hours()
                .is_err()
        );
    }

    #[test]
    fn test_payment_record_tagged_by_gateway() {
        let json = r#"{"gateway": "paypal", "fee_total": {"cents": 150, "currency": "EUR"}}"#;
        let record: PaymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gateway(), Gateway::Paypal);
    }

    #[test]
    fn test_template_keys() {
        let variant = ReceiptVariant {
            gateway: Gateway::Stripe,
            hold: FundsHold::for_gateway(Gateway::Stripe),
            pricing: Pricing::PerItem,
        };
        assert_eq!(
            variant.template_key(Audience::Buyer),
            "payment_receipt_to_buyer.stripe_escrow_per_item"
        );

        let variant = ReceiptVariant {
            gateway: Gateway::Paypal,
            hold: FundsHold::for_gateway(Gateway::Paypal),
            pricing: Pricing::PerHour {
                unit_price: Money::new(500, Currency::new("EUR").unwrap()),
                duration_hours: 3,
            },
        };
        assert_eq!(
            variant.template_key(Audience::Seller),
            "payment_receipt_to_seller.paypal_immediate_per_hour"
        );
    }
}
