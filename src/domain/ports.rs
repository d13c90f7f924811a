use super::bank::BankAccountPayload;
use super::forms::AccountPayload;
use super::provider_account::ProviderAccountRecord;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Local link between a marketplace member and their provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerAccountLink {
    pub community_id: u64,
    pub person_id: String,
    pub seller_id: Option<String>,
    pub bank_id: Option<String>,
}

#[async_trait]
pub trait SellerAccountStore: Send + Sync {
    async fn get(&self, community_id: u64, person_id: &str) -> Result<Option<SellerAccountLink>>;
    async fn store(&self, link: SellerAccountLink) -> Result<()>;
    async fn remove(&self, community_id: u64, person_id: &str) -> Result<()>;
}

/// Payment provider account API.
///
/// Rejections by the provider are reported as `PaymentError::ProviderError`
/// carrying the provider's message. Retrying is up to the implementation.
#[async_trait]
pub trait SellerAccountProvider: Send + Sync {
    async fn get_account(&self, seller_id: &str) -> Result<ProviderAccountRecord>;
    async fn create_account(&self, payload: &AccountPayload) -> Result<String>;
    async fn update_account(&self, seller_id: &str, payload: &AccountPayload) -> Result<()>;
    async fn create_bank_account(
        &self,
        seller_id: &str,
        payload: &BankAccountPayload,
    ) -> Result<String>;
}

pub type SellerAccountStoreBox = Box<dyn SellerAccountStore>;
pub type SellerAccountProviderBox = Box<dyn SellerAccountProvider>;
