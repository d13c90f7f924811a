use crate::domain::bank::BankAccountPayload;
use crate::domain::forms::{AccountFields, AccountPayload};
use crate::domain::ports::{SellerAccountLink, SellerAccountProvider, SellerAccountStore};
use crate::domain::provider_account::{
    ApiVersion, DateOfBirth, ExternalBankAccount, ProviderAccountRecord, RawAddress, RawPerson,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Datelike;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for seller account links.
///
/// Keyed by `(community_id, person_id)`.
#[derive(Default, Clone)]
pub struct InMemorySellerAccountStore {
    links: Arc<RwLock<HashMap<(u64, String), SellerAccountLink>>>,
}

impl InMemorySellerAccountStore {
    /// Creates a new, empty in-memory link store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SellerAccountStore for InMemorySellerAccountStore {
    async fn get(&self, community_id: u64, person_id: &str) -> Result<Option<SellerAccountLink>> {
        let links = self.links.read().await;
        Ok(links.get(&(community_id, person_id.to_string())).cloned())
    }

    async fn store(&self, link: SellerAccountLink) -> Result<()> {
        let mut links = self.links.write().await;
        links.insert((link.community_id, link.person_id.clone()), link);
        Ok(())
    }

    async fn remove(&self, community_id: u64, person_id: &str) -> Result<()> {
        let mut links = self.links.write().await;
        links.remove(&(community_id, person_id.to_string()));
        Ok(())
    }
}

/// An in-memory stand-in for the payment provider's account API.
///
/// Builds provider records the way the provider would echo them back, in the
/// shape selected by `api_version`. Useful for tests and local runs.
#[derive(Clone)]
pub struct InMemorySellerAccountProvider {
    accounts: Arc<RwLock<HashMap<String, ProviderAccountRecord>>>,
    next_id: Arc<AtomicU64>,
    api_version: ApiVersion,
}

impl InMemorySellerAccountProvider {
    pub fn new(api_version: ApiVersion) -> Self {
        Self {
            accounts: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
            api_version,
        }
    }

    /// Seeds an account record, e.g. one captured from the real provider.
    pub async fn insert(&self, record: ProviderAccountRecord) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(record.id.clone(), record);
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

fn address_from(
    postal_code: &Option<String>,
    state: &Option<String>,
    city: &Option<String>,
    town: &Option<String>,
    line1: &Option<String>,
    country: &Option<String>,
) -> RawAddress {
    RawAddress {
        city: city.clone(),
        country: country.clone(),
        line1: line1.clone(),
        postal_code: postal_code.clone(),
        state: state.clone(),
        town: town.clone(),
    }
}

fn apply_fields(person: &mut RawPerson, fields: &AccountFields) {
    fn merge(target: &mut Option<String>, value: &Option<String>) {
        if value.is_some() {
            *target = value.clone();
        }
    }

    merge(&mut person.first_name, &fields.first_name);
    merge(&mut person.last_name, &fields.last_name);
    merge(&mut person.first_name_kana, &fields.first_name_kana);
    merge(&mut person.last_name_kana, &fields.last_name_kana);
    merge(&mut person.first_name_kanji, &fields.first_name_kanji);
    merge(&mut person.last_name_kanji, &fields.last_name_kanji);
    merge(&mut person.gender, &fields.gender);
    merge(&mut person.phone_number, &fields.phone_number);
    merge(&mut person.email, &fields.email);
    merge(&mut person.phone, &fields.phone);

    let japanese = fields.address_kana_postal_code.is_some()
        || fields.address_kana_city.is_some()
        || fields.address_kana_line1.is_some();
    if japanese {
        person.address = None;
        person.address_kana = Some(address_from(
            &fields.address_kana_postal_code,
            &fields.address_kana_state,
            &fields.address_kana_city,
            &fields.address_kana_town,
            &fields.address_kana_line1,
            &fields.address_country,
        ));
        person.address_kanji = Some(address_from(
            &fields.address_kanji_postal_code,
            &fields.address_kanji_state,
            &fields.address_kanji_city,
            &fields.address_kanji_town,
            &fields.address_kanji_line1,
            &fields.address_country,
        ));
    } else if fields.address_country.is_some() || person.address.is_some() {
        let address = person.address.get_or_insert_with(RawAddress::default);
        merge(&mut address.country, &fields.address_country);
        merge(&mut address.city, &fields.address_city);
        merge(&mut address.line1, &fields.address_line1);
        merge(&mut address.postal_code, &fields.address_postal_code);
        merge(&mut address.state, &fields.address_state);
    }
}

fn person_mut(record: &mut ProviderAccountRecord, api_version: ApiVersion) -> &mut RawPerson {
    let slot = match api_version {
        ApiVersion::Legacy => &mut record.legal_entity,
        ApiVersion::Current => &mut record.individual,
    };
    slot.get_or_insert_with(RawPerson::default)
}

#[async_trait]
impl SellerAccountProvider for InMemorySellerAccountProvider {
    async fn get_account(&self, seller_id: &str) -> Result<ProviderAccountRecord> {
        let accounts = self.accounts.read().await;
        accounts
            .get(seller_id)
            .cloned()
            .ok_or_else(|| PaymentError::ProviderError(format!("No such account: {seller_id}")))
    }

    async fn create_account(&self, payload: &AccountPayload) -> Result<String> {
        let id = self.next_id("acct");
        let mut record = ProviderAccountRecord {
            id: id.clone(),
            ..Default::default()
        };
        let person = person_mut(&mut record, self.api_version);
        apply_fields(person, &payload.fields);
        person.dob = payload.birth_date.map(|date| DateOfBirth {
            day: Some(date.day()),
            month: Some(date.month()),
            year: Some(date.year()),
        });

        self.insert(record).await;
        Ok(id)
    }

    async fn update_account(&self, seller_id: &str, payload: &AccountPayload) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get_mut(seller_id)
            .ok_or_else(|| PaymentError::ProviderError(format!("No such account: {seller_id}")))?;
        let person = person_mut(record, self.api_version);
        apply_fields(person, &payload.fields);
        if let Some(date) = payload.birth_date {
            person.dob = Some(DateOfBirth {
                day: Some(date.day()),
                month: Some(date.month()),
                year: Some(date.year()),
            });
        }
        Ok(())
    }

    async fn create_bank_account(
        &self,
        seller_id: &str,
        payload: &BankAccountPayload,
    ) -> Result<String> {
        let id = self.next_id("ba");
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get_mut(seller_id)
            .ok_or_else(|| PaymentError::ProviderError(format!("No such account: {seller_id}")))?;

        let number = &payload.bank_account_number;
        let last4 = number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(number.as_str(), |(index, _)| &number[index..]);
        for account in &mut record.external_accounts.data {
            account.default_for_currency = false;
        }
        record.external_accounts.data.push(ExternalBankAccount {
            id: Some(id.clone()),
            country: Some(payload.bank_country.clone()),
            bank_name: None,
            currency: Some(payload.bank_currency.to_ascii_lowercase()),
            last4: Some(last4.to_string()),
            routing_number: payload.bank_routing_number.clone(),
            default_for_currency: true,
        });
        Ok(id)
    }
}
