//! Workflows built on the domain types.
//!
//! `SellerAccountService` drives seller onboarding against the payment
//! provider through the ports in `domain::ports`; the other modules are
//! synchronous steps called by the marketplace around orders and listings.

pub mod listing_moderation;
pub mod receipt;
pub mod seller_account;
