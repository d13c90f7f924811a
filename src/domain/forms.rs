use super::country::{COUNTRIES, Region};
use super::validation::ValidationErrors;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;

/// Every field the seller account form accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name_kanji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name_kanji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kana_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kana_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kana_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kana_town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kana_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kanji_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kanji_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kanji_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kanji_town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_kanji_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn_last_4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AccountFields {
    fn masked(mut self) -> Self {
        let region = Region::new(self.address_country.take(), self.address_state.take()).mask();
        self.address_country = region.country;
        self.address_state = region.state;
        self
    }
}

/// The account form exactly as submitted, birth date split into three numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AccountSubmission {
    #[serde(flatten)]
    pub fields: AccountFields,
    #[serde(
        rename = "birth_date(1i)",
        alias = "birth_year",
        default,
        deserialize_with = "date_part"
    )]
    pub birth_year: Option<i32>,
    #[serde(
        rename = "birth_date(2i)",
        alias = "birth_month",
        default,
        deserialize_with = "date_part"
    )]
    pub birth_month: Option<u32>,
    #[serde(
        rename = "birth_date(3i)",
        alias = "birth_day",
        default,
        deserialize_with = "date_part"
    )]
    pub birth_day: Option<u32>,
}

/// Date select values arrive as numbers from JSON clients and as strings from
/// form posts; a blank select means no value.
fn date_part<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Part<T> {
        Number(T),
        Text(String),
    }

    match Option::<Part<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Part::Number(value)) => Ok(Some(value)),
        Some(Part::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Part::Text(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Parsed account form. Puerto Rico is already masked as `US` + state `PR`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountForm {
    pub fields: AccountFields,
    pub birth_date: Option<NaiveDate>,
    birth_date_invalid: bool,
}

/// Body of an account create/update call to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPayload {
    #[serde(flatten)]
    pub fields: AccountFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl AccountForm {
    pub fn from_submission(submission: AccountSubmission) -> Self {
        let (birth_date, birth_date_invalid) = match submission.birth_year {
            None => (None, false),
            Some(year) => {
                let date = NaiveDate::from_ymd_opt(
                    year,
                    submission.birth_month.unwrap_or_default(),
                    submission.birth_day.unwrap_or_default(),
                );
                (date, date.is_none())
            }
        };

        Self {
            fields: submission.fields.masked(),
            birth_date,
            birth_date_invalid,
        }
    }

    /// Checks required for opening a new seller account.
    pub fn validate_for_create(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let country = self.fields.address_country.as_deref();
        errors.require_inclusion("address_country", country, COUNTRIES);
        errors.require("address_country", country);
        errors.require("token", self.fields.token.as_deref());
        if self.birth_date_invalid {
            errors.add("birth_date", "is not a valid date");
        }
        errors
    }

    pub fn to_external_payload(&self) -> AccountPayload {
        AccountPayload {
            fields: self.fields.clone().masked(),
            birth_date: self.birth_date,
        }
    }
}
