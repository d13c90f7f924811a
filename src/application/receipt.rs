use crate::domain::money::Money;
use crate::domain::receipt::{
    FeeBreakdown, FundsHold, PaymentRecord, Pricing, ReceiptVariant, TransactionRecord, UnitType,
};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// Computes the itemized fees for a paid transaction.
///
/// The caller is responsible for only passing transactions that reached the
/// paid state. Missing amounts fail the whole computation so that an incomplete
/// receipt is never sent.
pub fn compute(tx: &TransactionRecord, payment: &PaymentRecord) -> Result<FeeBreakdown> {
    if tx.gateway != payment.gateway() {
        return Err(PaymentError::GatewayMismatch {
            transaction: tx.gateway.as_str(),
            payment: payment.gateway().as_str(),
        });
    }

    let unit_price = tx
        .unit_price
        .clone()
        .ok_or(PaymentError::MissingData("unit_price"))?;
    let currency = unit_price.currency.clone();
    let quantity = quantity(tx)?;
    let gross_amount = unit_price.checked_mul(quantity)?;
    let zero = Money::zero(currency.clone());

    let (service_fee, processing_fee, buyer_commission) = match payment {
        PaymentRecord::Paypal(paypal) => {
            let commission = paypal
                .commission_total
                .clone()
                .ok_or(PaymentError::MissingData("commission_total"))?;
            let fee = paypal
                .fee_total
                .clone()
                .ok_or(PaymentError::MissingData("fee_total"))?;
            (commission, fee, zero.clone())
        }
        PaymentRecord::Stripe(stripe) => {
            let commission = stripe
                .commission
                .clone()
                .ok_or(PaymentError::MissingData("commission"))?;
            let buyer_commission = match &stripe.buyer_commission {
                Some(amount) => amount.clone(),
                None if buyer_commission_configured(tx) => {
                    return Err(PaymentError::MissingData("buyer_commission"));
                }
                None => zero.clone(),
            };
            (commission, zero.clone(), buyer_commission)
        }
    };

    let net_total = gross_amount
        .checked_sub(&processing_fee)?
        .checked_sub(&service_fee)?;
    let buyer_total = gross_amount.checked_add(&buyer_commission)?;

    let pricing = match tx.unit_type {
        UnitType::Hour => Pricing::PerHour {
            unit_price: unit_price.clone(),
            duration_hours: quantity,
        },
        UnitType::Item => Pricing::PerItem,
    };

    debug!(
        gateway = %tx.gateway,
        gross = gross_amount.cents,
        net = net_total.cents,
        buyer_total = buyer_total.cents,
        "computed receipt breakdown"
    );

    Ok(FeeBreakdown {
        currency,
        unit_price,
        quantity,
        gross_amount,
        service_fee,
        processing_fee,
        buyer_commission,
        net_total,
        buyer_total,
        variant: ReceiptVariant {
            gateway: tx.gateway,
            hold: FundsHold::for_gateway(tx.gateway),
            pricing,
        },
    })
}

fn quantity(tx: &TransactionRecord) -> Result<u32> {
    match (tx.unit_type, &tx.booking) {
        (UnitType::Hour, Some(booking)) => booking.duration_hours(),
        (UnitType::Hour, None) => Err(PaymentError::MissingData("booking")),
        (UnitType::Item, _) => Ok(tx.quantity.unwrap_or(1)),
    }
}

fn buyer_commission_configured(tx: &TransactionRecord) -> bool {
    tx.commission_from_buyer
        .is_some_and(|percent| percent > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Currency;
    use crate::domain::receipt::{Booking, Gateway, PaypalPayment, StripePayment};
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn eur(cents: i64) -> Money {
        Money::new(cents, Currency::new("EUR").unwrap())
    }

    fn transaction(gateway: Gateway, unit_price_cents: i64) -> TransactionRecord {
        TransactionRecord {
            gateway,
            unit_price: Some(eur(unit_price_cents)),
            quantity: None,
            unit_type: UnitType::Item,
            booking: None,
            commission_from_seller: None,
            commission_from_buyer: None,
        }
    }

    fn paypal(fee: i64, commission: i64) -> PaymentRecord {
        PaymentRecord::Paypal(PaypalPayment {
            payment_total: None,
            fee_total: Some(eur(fee)),
            commission_total: Some(eur(commission)),
        })
    }

    fn stripe(commission: i64, buyer_commission: i64) -> PaymentRecord {
        PaymentRecord::Stripe(StripePayment {
            sum: None,
            commission: Some(eur(commission)),
            buyer_commission: Some(eur(buyer_commission)),
        })
    }

    fn three_hour_booking() -> Booking {
        Booking {
            start_time: NaiveDateTime::parse_from_str("2017-11-14 09:00", "%Y-%m-%d %H:%M")
                .unwrap(),
            end_time: NaiveDateTime::parse_from_str("2017-11-14 12:00", "%Y-%m-%d %H:%M")
                .unwrap(),
        }
    }

    #[test]
    fn test_paypal_receipt() {
        let breakdown = compute(&transaction(Gateway::Paypal, 500), &paypal(150, 0)).unwrap();

        assert_eq!(breakdown.gross_amount, eur(500));
        assert_eq!(breakdown.service_fee, eur(0));
        assert_eq!(breakdown.processing_fee, eur(150));
        assert_eq!(breakdown.net_total, eur(350));
        assert_eq!(breakdown.buyer_total, eur(500));
        assert_eq!(breakdown.variant.hold, FundsHold::Immediate);
    }

    #[test]
    fn test_stripe_receipt_without_buyer_commission() {
        let breakdown = compute(&transaction(Gateway::Stripe, 200), &stripe(100, 0)).unwrap();

        assert_eq!(breakdown.service_fee, eur(100));
        assert_eq!(breakdown.net_total, eur(100));
        assert_eq!(breakdown.buyer_total, eur(200));
        assert!(!breakdown.has_buyer_commission());
        assert_eq!(breakdown.variant.hold, FundsHold::Escrow);
    }

    #[test]
    fn test_stripe_receipt_with_buyer_commission() {
        let mut tx = transaction(Gateway::Stripe, 10200);
        tx.commission_from_seller = Some(dec!(12));
        tx.commission_from_buyer = Some(dec!(8));
        let breakdown = compute(&tx, &stripe(1200, 800)).unwrap();

        assert_eq!(breakdown.gross_amount, eur(10200));
        assert_eq!(breakdown.net_total, eur(9000));
        assert_eq!(breakdown.buyer_total, eur(11000));
        assert!(breakdown.has_buyer_commission());
    }

    #[test]
    fn test_per_hour_quantity_from_booking() {
        let mut tx = transaction(Gateway::Paypal, 500);
        tx.unit_type = UnitType::Hour;
        tx.quantity = Some(1);
        tx.booking = Some(three_hour_booking());
        let breakdown = compute(&tx, &paypal(150, 0)).unwrap();

        assert_eq!(breakdown.quantity, 3);
        assert_eq!(breakdown.gross_amount, eur(1500));
        assert_eq!(breakdown.net_total, eur(1350));
        assert_eq!(
            breakdown.variant.pricing,
            Pricing::PerHour {
                unit_price: eur(500),
                duration_hours: 3
            }
        );
    }

    #[test]
    fn test_item_quantity_multiplies() {
        let mut tx = transaction(Gateway::Stripe, 250);
        tx.quantity = Some(4);
        let breakdown = compute(&tx, &stripe(100, 0)).unwrap();
        assert_eq!(breakdown.gross_amount, eur(1000));
        assert_eq!(breakdown.net_total, eur(900));
    }

    #[test]
    fn test_missing_data_fails() {
        let mut tx = transaction(Gateway::Paypal, 500);
        tx.unit_price = None;
        assert!(matches!(
            compute(&tx, &paypal(150, 0)),
            Err(PaymentError::MissingData("unit_price"))
        ));

        let payment = PaymentRecord::Paypal(PaypalPayment::default());
        assert!(matches!(
            compute(&transaction(Gateway::Paypal, 500), &payment),
            Err(PaymentError::MissingData(_))
        ));

        let mut tx = transaction(Gateway::Paypal, 500);
        tx.unit_type = UnitType::Hour;
        tx.quantity = Some(2);
        assert!(matches!(
            compute(&tx, &paypal(150, 0)),
            Err(PaymentError::MissingData("booking"))
        ));

        let mut tx = transaction(Gateway::Stripe, 500);
        tx.commission_from_buyer = Some(dec!(5));
        let payment = PaymentRecord::Stripe(StripePayment {
            commission: Some(eur(10)),
            ..Default::default()
        });
        assert!(matches!(
            compute(&tx, &payment),
            Err(PaymentError::MissingData("buyer_commission"))
        ));
    }

    #[test]
    fn test_gateway_and_currency_mismatch() {
        assert!(matches!(
            compute(&transaction(Gateway::Paypal, 500), &stripe(100, 0)),
            Err(PaymentError::GatewayMismatch { .. })
        ));

        let usd_fee = PaymentRecord::Paypal(PaypalPayment {
            payment_total: None,
            fee_total: Some(Money::new(150, Currency::new("USD").unwrap())),
            commission_total: Some(eur(0)),
        });
        assert!(matches!(
            compute(&transaction(Gateway::Paypal, 500), &usd_fee),
            Err(PaymentError::CurrencyMismatch { .. })
        ));
    }
}
