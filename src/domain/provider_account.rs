use super::profile::{JapanAddress, JapanIdentity, PostalAddress};
use crate::error::PaymentError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which shape of the provider's account object to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Person data lives under `legal_entity`.
    #[default]
    Legacy,
    /// Person data lives under `individual`, plus contact and business profile.
    Current,
}

impl FromStr for ApiVersion {
    type Err = PaymentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" | "old" => Ok(Self::Legacy),
            "current" | "new" => Ok(Self::Current),
            other => Err(PaymentError::ValidationError(format!(
                "Unknown API version: {other}"
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Current => f.write_str("current"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl DateOfBirth {
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawAddress {
    pub city: Option<String>,
    pub country: Option<String>,
    pub line1: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub town: Option<String>,
}

/// The person object as the provider returns it, in either API shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<DateOfBirth>,
    pub address: Option<RawAddress>,
    pub address_kana: Option<RawAddress>,
    pub address_kanji: Option<RawAddress>,
    pub first_name_kana: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kanji: Option<String>,
    pub last_name_kanji: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalBankAccount {
    pub id: Option<String>,
    pub country: Option<String>,
    pub bank_name: Option<String>,
    pub currency: Option<String>,
    pub last4: Option<String>,
    pub routing_number: Option<String>,
    #[serde(default)]
    pub default_for_currency: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalAccountList {
    #[serde(default)]
    pub data: Vec<ExternalBankAccount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub mcc: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyVerification {
    #[serde(default)]
    pub fields_needed: Vec<String>,
    pub due_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub currently_due: Vec<String>,
    pub disabled_reason: Option<String>,
}

/// A seller account as fetched from the payment provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderAccountRecord {
    pub id: String,
    pub legal_entity: Option<RawPerson>,
    pub individual: Option<RawPerson>,
    #[serde(default)]
    pub external_accounts: ExternalAccountList,
    pub business_profile: Option<BusinessProfile>,
    pub verification: Option<LegacyVerification>,
    pub requirements: Option<Requirements>,
}

/// Name, birth date and contact fields shared by every entity shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonIdentity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardEntity {
    pub identity: PersonIdentity,
    pub country: Option<String>,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JapanEntity {
    pub identity: PersonIdentity,
    pub country: Option<String>,
    pub japan: JapanIdentity,
    pub kana: JapanAddress,
    pub kanji: JapanAddress,
}

/// The person behind an account, classified by which address form it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum LegalEntity {
    Standard(StandardEntity),
    Japan(JapanEntity),
    Unidentified(PersonIdentity),
}

impl LegalEntity {
    pub fn identity(&self) -> &PersonIdentity {
        match self {
            Self::Standard(entity) => &entity.identity,
            Self::Japan(entity) => &entity.identity,
            Self::Unidentified(identity) => identity,
        }
    }
}

impl From<&RawPerson> for LegalEntity {
    fn from(person: &RawPerson) -> Self {
        let identity = PersonIdentity {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            birth_date: person.dob.as_ref().and_then(DateOfBirth::to_date),
            email: person.email.clone(),
            phone: person.phone.clone(),
        };

        if let Some(address) = &person.address {
            return Self::Standard(StandardEntity {
                identity,
                country: address.country.clone(),
                address: PostalAddress {
                    line1: address.line1.clone(),
                    city: address.city.clone(),
                    state: address.state.clone(),
                    postal_code: address.postal_code.clone(),
                },
            });
        }

        if let Some(kana) = &person.address_kana {
            let kanji = person.address_kanji.clone().unwrap_or_default();
            return Self::Japan(JapanEntity {
                identity,
                country: kana.country.clone(),
                japan: JapanIdentity {
                    first_name_kana: person.first_name_kana.clone(),
                    last_name_kana: person.last_name_kana.clone(),
                    first_name_kanji: person.first_name_kanji.clone(),
                    last_name_kanji: person.last_name_kanji.clone(),
                    gender: person.gender.clone(),
                    phone_number: person.phone_number.clone(),
                },
                kana: JapanAddress::from(kana),
                kanji: JapanAddress::from(&kanji),
            });
        }

        Self::Unidentified(identity)
    }
}

impl ProviderAccountRecord {
    fn person(&self, api_version: ApiVersion) -> Option<&RawPerson> {
        match api_version {
            ApiVersion::Legacy => self.legal_entity.as_ref(),
            ApiVersion::Current => self.individual.as_ref(),
        }
    }

    /// Classifies the account's person for the given API shape.
    pub fn entity(&self, api_version: ApiVersion) -> LegalEntity {
        self.person(api_version)
            .map(LegalEntity::from)
            .unwrap_or_else(|| LegalEntity::Unidentified(PersonIdentity::default()))
    }

    /// The payout bank account marked as default for its currency.
    pub fn default_bank_account(&self) -> Option<&ExternalBankAccount> {
        self.external_accounts
            .data
            .iter()
            .find(|account| account.default_for_currency)
    }

    /// Whether the provider is blocking the account until more details arrive.
    pub fn needs_verification(&self, api_version: ApiVersion) -> bool {
        match api_version {
            ApiVersion::Legacy => self.verification.as_ref().is_some_and(|verification| {
                !verification.fields_needed.is_empty() && verification.due_by.is_some()
            }),
            ApiVersion::Current => self.requirements.as_ref().is_some_and(|requirements| {
                !requirements.currently_due.is_empty()
                    && requirements
                        .disabled_reason
                        .as_deref()
                        .is_some_and(|reason| !reason.trim().is_empty())
            }),
        }
    }
}
