//! Marketplace payment domain: seller profiles, bank details, fees and the
//! admin-side records around them.

pub mod bank;
pub mod country;
pub mod forms;
pub mod listing;
pub mod membership;
pub mod money;
pub mod normalizer;
pub mod ports;
pub mod profile;
pub mod provider_account;
pub mod receipt;
pub mod settings;
pub mod validation;
