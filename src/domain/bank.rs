use super::country::{
    COUNTRIES, JAPAN, NEW_ZEALAND, PUERTO_RICO, UNITED_STATES, VALID_BANK_CURRENCIES,
    country_currency,
};
use super::profile::CanonicalSellerProfile;
use super::validation::{ValidationErrors, is_blank};
use serde::{Deserialize, Serialize};

/// Bank fields as typed into the payout form. Which ones are filled depends
/// on the bank country.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BankFormInput {
    pub bank_routing_number: Option<String>,
    pub bank_routing_1: Option<String>,
    pub bank_routing_2: Option<String>,
    pub bank_account_number: Option<String>,
    /// New Zealand only: `bank-branch-account-suffix`.
    pub bank_account_number_common: Option<String>,
}

impl BankFormInput {
    /// The number the seller typed, whichever field carried it.
    pub fn submitted_account_number(&self) -> Option<&str> {
        self.bank_account_number_common
            .as_deref()
            .or(self.bank_account_number.as_deref())
    }
}

/// Parts of a New Zealand account number, e.g. `12-3456-7890123-00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NzAccountNumber<'a> {
    pub bank: &'a str,
    pub branch: &'a str,
    pub account: &'a str,
    pub suffix: &'a str,
}

impl<'a> NzAccountNumber<'a> {
    pub fn parse(value: &'a str) -> Option<Self> {
        let parts: Vec<&str> = value.trim().split('-').collect();
        match parts[..] {
            [bank, branch, account, suffix] => Some(Self {
                bank,
                branch,
                account,
                suffix,
            }),
            _ => None,
        }
    }

    pub fn routing_number(&self) -> String {
        format!("{}{}", self.bank, self.branch)
    }

    pub fn account_number(&self) -> String {
        format!("{}{}", self.account, self.suffix)
    }
}

/// Payout bank form after country-specific normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BankForm {
    pub bank_country: Option<String>,
    pub bank_currency: Option<String>,
    pub bank_holder_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_routing_number: Option<String>,
    pub bank_routing_1: Option<String>,
    pub bank_routing_2: Option<String>,
    #[serde(skip)]
    pub bank_account_number_common: Option<String>,
}

/// Body of a bank account create call to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankAccountPayload {
    pub bank_country: String,
    pub bank_currency: String,
    pub bank_holder_name: String,
    pub bank_account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_routing_number: Option<String>,
}

impl BankForm {
    /// Builds the bank form for a seller. Country, currency and holder name
    /// always come from the profile; number fields only when a form was posted.
    pub fn parse(profile: &CanonicalSellerProfile, input: Option<&BankFormInput>) -> Self {
        let bank_country = profile.address_country.as_deref().map(|country| {
            if country == PUERTO_RICO {
                UNITED_STATES.to_string()
            } else {
                country.to_string()
            }
        });
        let bank_currency = bank_country
            .as_deref()
            .and_then(country_currency)
            .map(str::to_string);
        let bank_holder_name = profile.bank_holder_name(bank_country.as_deref().unwrap_or_default());

        let mut form = Self {
            bank_country,
            bank_currency,
            bank_holder_name,
            ..Default::default()
        };

        if let Some(input) = input {
            let country = form.bank_country.as_deref().unwrap_or_default();
            form.bank_routing_number = routing_number(country, input);
            form.bank_account_number = account_number(country, input);
            form.bank_routing_1 = input.bank_routing_1.clone();
            form.bank_routing_2 = input.bank_routing_2.clone();
            form.bank_account_number_common = input.bank_account_number_common.clone();
        }

        form
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("bank_country", self.bank_country.as_deref());
        errors.require("bank_currency", self.bank_currency.as_deref());
        errors.require("bank_holder_name", self.bank_holder_name.as_deref());
        errors.require("bank_account_number", self.bank_account_number.as_deref());
        errors.require_inclusion("bank_country", self.bank_country.as_deref(), COUNTRIES);
        errors.require_inclusion(
            "bank_currency",
            self.bank_currency.as_deref(),
            VALID_BANK_CURRENCIES,
        );
        if self.bank_country.as_deref() == Some(NEW_ZEALAND)
            && !is_blank(self.bank_account_number_common.as_deref())
            && self
                .bank_account_number_common
                .as_deref()
                .and_then(NzAccountNumber::parse)
                .is_none()
        {
            errors.add(
                "bank_account_number_common",
                "must have the form bank-branch-account-suffix",
            );
        }
        errors
    }

    /// True when the account number still holds the `****1234` placeholder
    /// of an already saved account.
    pub fn is_masked(&self) -> bool {
        self.bank_account_number
            .as_deref()
            .is_some_and(|number| number.contains('*'))
    }

    /// Provider payload, or `None` when a required field is missing.
    pub fn to_payload(&self) -> Option<BankAccountPayload> {
        Some(BankAccountPayload {
            bank_country: self.bank_country.clone()?,
            bank_currency: self.bank_currency.clone()?,
            bank_holder_name: self.bank_holder_name.clone()?,
            bank_account_number: self.bank_account_number.clone()?,
            bank_routing_number: self.bank_routing_number.clone(),
        })
    }
}

fn routing_number(country: &str, input: &BankFormInput) -> Option<String> {
    match country {
        NEW_ZEALAND => input
            .bank_account_number_common
            .as_deref()
            .and_then(NzAccountNumber::parse)
            .map(|number| number.routing_number()),
        JAPAN => Some(format!(
            "{}{}",
            input.bank_routing_1.as_deref().unwrap_or_default(),
            input.bank_routing_2.as_deref().unwrap_or_default()
        )),
        _ if !is_blank(input.bank_routing_1.as_deref()) => Some(format!(
            "{}-{}",
            input.bank_routing_1.as_deref().unwrap_or_default(),
            input.bank_routing_2.as_deref().unwrap_or_default()
        )),
        _ => input.bank_routing_number.clone(),
    }
}

fn account_number(country: &str, input: &BankFormInput) -> Option<String> {
    if let Some(number) = input.submitted_account_number()
        && number.contains('*')
    {
        return Some(number.to_string());
    }
    match country {
        NEW_ZEALAND => input
            .bank_account_number_common
            .as_deref()
            .and_then(NzAccountNumber::parse)
            .map(|number| number.account_number()),
        _ => input.bank_account_number.clone(),
    }
}
