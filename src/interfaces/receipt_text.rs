use crate::domain::money::Money;
use crate::domain::receipt::{Audience, FeeBreakdown, FundsHold, Pricing};
use serde::{Deserialize, Serialize};

/// Turns an amount into display text for a receipt.
pub trait CurrencyFormatter {
    fn format(&self, amount: &Money) -> String;
}

/// Prefix-symbol formatting: `€5`, `€1.50`, `-€1.50`, `SEK 20`.
///
/// Whole amounts drop their decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFormatter;

impl SymbolFormatter {
    fn symbol(code: &str) -> Option<&'static str> {
        match code {
            "EUR" => Some("€"),
            "USD" => Some("$"),
            "GBP" => Some("£"),
            "JPY" => Some("¥"),
            _ => None,
        }
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format(&self, amount: &Money) -> String {
        let major = amount.to_major().abs();
        let digits = if major.fract().is_zero() {
            major.normalize().to_string()
        } else {
            major.to_string()
        };
        let sign = if amount.cents < 0 { "-" } else { "" };
        match Self::symbol(amount.currency.code()) {
            Some(symbol) => format!("{sign}{symbol}{digits}"),
            None => format!("{sign}{} {digits}", amount.currency.code()),
        }
    }
}

/// Names that appear in the receipt text. Passed per call rather than read
/// from request-scoped state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptContext {
    pub service_name: String,
    pub listing_title: String,
    pub buyer_name: String,
    pub seller_name: String,
}

/// A rendered receipt: template key plus its text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReceipt {
    pub template: String,
    pub lines: Vec<String>,
}

impl RenderedReceipt {
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

fn listing_label(breakdown: &FeeBreakdown, ctx: &ReceiptContext) -> String {
    if breakdown.variant.is_per_hour() {
        format!("{}, per hour", ctx.listing_title)
    } else {
        ctx.listing_title.clone()
    }
}

fn pricing_lines(breakdown: &FeeBreakdown, fmt: &impl CurrencyFormatter) -> Vec<String> {
    match &breakdown.variant.pricing {
        Pricing::PerHour {
            unit_price,
            duration_hours,
        } => vec![
            format!("Price per hour {}", fmt.format(unit_price)),
            format!("Duration {duration_hours}"),
        ],
        Pricing::PerItem => Vec::new(),
    }
}

pub fn render_seller(
    breakdown: &FeeBreakdown,
    ctx: &ReceiptContext,
    fmt: &impl CurrencyFormatter,
) -> RenderedReceipt {
    let gross = fmt.format(&breakdown.gross_amount);
    let listing = listing_label(breakdown, ctx);

    let mut lines = vec![match breakdown.variant.hold {
        FundsHold::Immediate => format!(
            "You have been paid {gross} for {listing} by {}. Here is your receipt.",
            ctx.buyer_name
        ),
        FundsHold::Escrow => format!(
            "The amount of {gross} has been paid for {listing} by {}. The money is being held by {} until the order is marked as completed. Here is your receipt.",
            ctx.buyer_name, ctx.service_name
        ),
    }];
    lines.extend(pricing_lines(breakdown, fmt));

    if breakdown.has_buyer_commission() {
        lines.push(format!("Subtotal: {gross}"));
    } else {
        lines.push(format!("Price {} paid: {gross}", ctx.buyer_name));
    }
    lines.push(format!(
        "{} service fee: {}",
        ctx.service_name,
        fmt.format(&breakdown.service_fee.negated())
    ));
    if breakdown.variant.hold == FundsHold::Immediate {
        lines.push(format!(
            "Payment processing fee: {}",
            fmt.format(&breakdown.processing_fee.negated())
        ));
    }
    lines.push(format!("Total: {}", fmt.format(&breakdown.net_total)));

    RenderedReceipt {
        template: breakdown.variant.template_key(Audience::Seller),
        lines,
    }
}

pub fn render_buyer(
    breakdown: &FeeBreakdown,
    ctx: &ReceiptContext,
    fmt: &impl CurrencyFormatter,
) -> RenderedReceipt {
    let paid = fmt.format(&breakdown.buyer_total);
    let listing = listing_label(breakdown, ctx);

    let mut lines = vec![match breakdown.variant.hold {
        FundsHold::Immediate => format!(
            "You have paid {paid} for {listing} to {}. Here is a receipt of the payment.",
            ctx.seller_name
        ),
        FundsHold::Escrow => format!(
            "You have paid {paid} for {listing}. The money is being held by {} and will be released to {} once you mark the order as completed. Here is a receipt of the payment.",
            ctx.service_name, ctx.seller_name
        ),
    }];
    lines.extend(pricing_lines(breakdown, fmt));

    lines.push(format!("Subtotal {}", fmt.format(&breakdown.gross_amount)));
    if breakdown.has_buyer_commission() {
        lines.push(format!(
            "{} service fee {}",
            ctx.service_name,
            fmt.format(&breakdown.buyer_commission)
        ));
    }
    lines.push(format!("Total {paid}"));

    RenderedReceipt {
        template: breakdown.variant.template_key(Audience::Buyer),
        lines,
    }
}

pub fn render(
    audience: Audience,
    breakdown: &FeeBreakdown,
    ctx: &ReceiptContext,
    fmt: &impl CurrencyFormatter,
) -> RenderedReceipt {
    match audience {
        Audience::Seller => render_seller(breakdown, ctx, fmt),
        Audience::Buyer => render_buyer(breakdown, ctx, fmt),
    }
}
