//! Maps provider account records to the canonical seller profile and back.

use super::forms::{AccountForm, AccountPayload};
use super::profile::{BankSummary, CanonicalSellerProfile, ContactDetails, SellerAddress};
use super::provider_account::{ApiVersion, LegalEntity, ProviderAccountRecord};

/// Read path: provider record to canonical profile, Puerto Rico unmasked.
pub fn to_canonical(record: &ProviderAccountRecord, api_version: ApiVersion) -> CanonicalSellerProfile {
    let entity = record.entity(api_version);
    let identity = entity.identity();

    let mut profile = CanonicalSellerProfile {
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        birth_date: identity.birth_date,
        bank: record.default_bank_account().map(|bank| BankSummary {
            country: bank.country.clone(),
            bank_name: bank.bank_name.clone(),
            currency: bank.currency.clone(),
            last4: bank.last4.clone(),
            routing_number: bank.routing_number.clone(),
        }),
        ..Default::default()
    };

    if api_version == ApiVersion::Current {
        let business = record.business_profile.clone().unwrap_or_default();
        profile.contact = Some(ContactDetails {
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            mcc: business.mcc,
            url: business.url,
        });
    }

    match entity {
        LegalEntity::Standard(standard) => {
            profile.address_country = standard.country;
            profile.address = Some(SellerAddress::Standard(standard.address));
        }
        LegalEntity::Japan(japan) => {
            profile.address_country = japan.country;
            profile.japan = Some(japan.japan);
            profile.address = Some(SellerAddress::Japan {
                kana: japan.kana,
                kanji: japan.kanji,
            });
        }
        LegalEntity::Unidentified(_) => {}
    }

    profile.unmask()
}

/// Write path: parsed form to provider payload, Puerto Rico masked.
pub fn to_external_payload(form: &AccountForm) -> AccountPayload {
    form.to_external_payload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::AccountSubmission;
    use chrono::NaiveDate;

    fn record(json: &str) -> ProviderAccountRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_standard_account_to_canonical() {
        let record = record(
            r#"{
                "id": "acct_1",
                "legal_entity": {
                    "first_name": "Joan", "last_name": "Smith",
                    "dob": {"day": 1, "month": 6, "year": 1985},
                    "address": {"city": "San Juan", "country": "US", "state": "PR", "line1": "Calle 1", "postal_code": "00901"}
                },
                "external_accounts": {"data": [
                    {"country": "US", "bank_name": "Stripe Test Bank", "currency": "usd", "last4": "6789",
                     "routing_number": "110000000", "default_for_currency": true}
                ]}
            }"#,
        );
        let profile = to_canonical(&record, ApiVersion::Legacy);

        assert_eq!(profile.address_country.as_deref(), Some("PR"));
        assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(1985, 6, 1));
        assert_eq!(profile.contact, None);
        let bank = profile.bank.unwrap();
        assert_eq!(bank.display_info(), "US, STRIPE TEST BANK, USD, ****6789");
        assert_eq!(bank.routing_number.as_deref(), Some("110000000"));
        match profile.address {
            Some(SellerAddress::Standard(address)) => {
                assert_eq!(address.state.as_deref(), Some("PR"))
            }
            other => panic!("unexpected address {other:?}"),
        }
    }

    #[test]
    fn test_current_api_reads_individual_and_contact() {
        let record = record(
            r#"{
                "id": "acct_2",
                "individual": {
                    "first_name": "Taro", "last_name": "Yamada",
                    "email": "taro@example.com", "phone": "+81000000",
                    "first_name_kana": "タロウ", "last_name_kana": "ヤマダ", "gender": "male",
                    "address_kana": {"country": "JP", "postal_code": "1500001", "town": "ジングウマエ"},
                    "address_kanji": {"country": "JP", "postal_code": "1500001", "town": "神宮前"}
                },
                "business_profile": {"mcc": "5734", "url": "https://example.com/taro"}
            }"#,
        );
        let profile = to_canonical(&record, ApiVersion::Current);

        assert_eq!(profile.address_country.as_deref(), Some("JP"));
        assert_eq!(profile.japan.as_ref().unwrap().gender.as_deref(), Some("male"));
        let contact = profile.contact.as_ref().unwrap();
        assert_eq!(contact.email.as_deref(), Some("taro@example.com"));
        assert_eq!(contact.mcc.as_deref(), Some("5734"));
        match &profile.address {
            Some(SellerAddress::Japan { kanji, .. }) => {
                assert_eq!(kanji.town.as_deref(), Some("神宮前"))
            }
            other => panic!("unexpected address {other:?}"),
        }
    }

    #[test]
    fn test_unidentified_entity_only_names() {
        let record = record(
            r#"{"id": "acct_3", "legal_entity": {"first_name": "Joan", "dob": {"day": 1, "month": 1, "year": 1990}}}"#,
        );
        let profile = to_canonical(&record, ApiVersion::Legacy);

        assert_eq!(profile.first_name.as_deref(), Some("Joan"));
        assert!(profile.birth_date.is_some());
        assert_eq!(profile.address_country, None);
        assert_eq!(profile.address, None);
    }

    #[test]
    fn test_to_external_payload_masks() {
        let submission: AccountSubmission =
            serde_json::from_str(r#"{"address_country": "PR", "token": "tok"}"#).unwrap();
        let payload = to_external_payload(&AccountForm::from_submission(submission));
        assert_eq!(payload.fields.address_country.as_deref(), Some("US"));
        assert_eq!(payload.fields.address_state.as_deref(), Some("PR"));
    }
}
