use crate::domain::bank::{BankForm, BankFormInput};
use crate::domain::forms::{AccountForm, AccountSubmission};
use crate::domain::normalizer::{to_canonical, to_external_payload};
use crate::domain::ports::{SellerAccountLink, SellerAccountProviderBox, SellerAccountStoreBox};
use crate::domain::profile::{CanonicalSellerProfile, ContactDetails};
use crate::domain::provider_account::ApiVersion;
use crate::domain::validation::ValidationErrors;
use crate::error::{PaymentError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Who is editing their payment settings, and in which marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerContext {
    pub community_id: u64,
    pub person_id: String,
    /// Confirmed notification address, used for new accounts.
    pub email: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerAccountState {
    pub ready: bool,
    pub seller_id: Option<String>,
    pub profile: CanonicalSellerProfile,
    pub needs_verification: bool,
}

/// The provider refused a call; the message is shown to the seller as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BankUpdate {
    /// No account yet, or no bank form posted.
    Skipped,
    /// The masked placeholder was resubmitted; nothing sent to the provider.
    Unchanged,
    Invalid { errors: ValidationErrors },
    Updated { bank_id: String },
    Failed {
        failure: ProviderFailure,
        /// What the seller typed, kept for redisplay.
        submitted_number: Option<String>,
    },
}

/// Everything the payment settings page needs after a create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsOutcome {
    pub state: SellerAccountState,
    pub account_errors: ValidationErrors,
    pub account_failure: Option<ProviderFailure>,
    pub bank_form: BankForm,
    pub bank: BankUpdate,
    pub just_created: bool,
    pub rolled_back: bool,
}

impl SettingsOutcome {
    fn new(state: SellerAccountState) -> Self {
        Self {
            state,
            account_errors: ValidationErrors::new(),
            account_failure: None,
            bank_form: BankForm::default(),
            bank: BankUpdate::Skipped,
            just_created: false,
            rolled_back: false,
        }
    }
}

/// Splits provider rejections from infrastructure errors.
fn provider_call<T>(result: Result<T>) -> Result<std::result::Result<T, ProviderFailure>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(PaymentError::ProviderError(message)) => Ok(Err(ProviderFailure { message })),
        Err(e) => Err(e),
    }
}

/// Payment settings workflow: opening a seller account with the provider,
/// updating its details, and attaching a payout bank account.
pub struct SellerAccountService {
    store: SellerAccountStoreBox,
    provider: SellerAccountProviderBox,
    api_version: ApiVersion,
}

impl SellerAccountService {
    pub fn new(
        store: SellerAccountStoreBox,
        provider: SellerAccountProviderBox,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            store,
            provider,
            api_version,
        }
    }

    /// Loads the seller's link and, when an account exists, its canonical profile.
    pub async fn load(&self, ctx: &SellerContext) -> Result<SellerAccountState> {
        let seller_id = self
            .store
            .get(ctx.community_id, &ctx.person_id)
            .await?
            .and_then(|link| link.seller_id)
            .filter(|id| !id.is_empty());

        match seller_id {
            Some(seller_id) => {
                let record = self.provider.get_account(&seller_id).await?;
                Ok(SellerAccountState {
                    ready: true,
                    needs_verification: record.needs_verification(self.api_version),
                    profile: to_canonical(&record, self.api_version),
                    seller_id: Some(seller_id),
                })
            }
            None => Ok(SellerAccountState {
                ready: false,
                seller_id: None,
                profile: CanonicalSellerProfile {
                    contact: Some(ContactDetails {
                        email: ctx.email.clone(),
                        url: ctx.profile_url.clone(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                needs_verification: false,
            }),
        }
    }

    /// Opens a seller account, then attaches the bank account if one was posted.
    ///
    /// When the account was created but the bank account was rejected, the local
    /// link is dropped so the seller starts over with both forms.
    pub async fn create(
        &self,
        ctx: &SellerContext,
        submission: AccountSubmission,
        bank_input: Option<BankFormInput>,
    ) -> Result<SettingsOutcome> {
        let mut outcome = SettingsOutcome::new(self.load(ctx).await?);

        if !outcome.state.ready {
            let form = AccountForm::from_submission(submission);
            outcome.account_errors = form.validate_for_create();

            if outcome.account_errors.is_empty() {
                let mut payload = to_external_payload(&form);
                if ctx.email.is_some() {
                    payload.fields.email = ctx.email.clone();
                }

                match provider_call(self.provider.create_account(&payload).await)? {
                    Ok(seller_id) => {
                        info!(
                            community_id = ctx.community_id,
                            person_id = %ctx.person_id,
                            seller_id = %seller_id,
                            "created seller account"
                        );
                        self.store
                            .store(SellerAccountLink {
                                community_id: ctx.community_id,
                                person_id: ctx.person_id.clone(),
                                seller_id: Some(seller_id),
                                bank_id: None,
                            })
                            .await?;
                        outcome.just_created = true;
                        outcome.state = self.load(ctx).await?;
                    }
                    Err(failure) => {
                        warn!(message = %failure.message, "provider rejected seller account");
                        outcome.account_failure = Some(failure);
                    }
                }
            } else {
                debug!(errors = %outcome.account_errors, "seller account form invalid");
            }
        }

        self.update_bank(ctx, bank_input.as_ref(), &mut outcome)
            .await?;

        if outcome.just_created && matches!(outcome.bank, BankUpdate::Failed { .. }) {
            warn!(
                community_id = ctx.community_id,
                person_id = %ctx.person_id,
                "dropping seller account after bank account failure"
            );
            self.store.remove(ctx.community_id, &ctx.person_id).await?;
            outcome.state.ready = false;
            outcome.state.seller_id = None;
            outcome.rolled_back = true;
        }

        Ok(outcome)
    }

    /// Pushes edited account details and, if posted, a new bank account.
    pub async fn update(
        &self,
        ctx: &SellerContext,
        submission: AccountSubmission,
        bank_input: Option<BankFormInput>,
    ) -> Result<SettingsOutcome> {
        let mut outcome = SettingsOutcome::new(self.load(ctx).await?);
        let Some(seller_id) = outcome.state.seller_id.clone() else {
            return Ok(outcome);
        };

        let form = AccountForm::from_submission(submission);
        let payload = to_external_payload(&form);
        match provider_call(self.provider.update_account(&seller_id, &payload).await)? {
            Ok(()) => {
                info!(seller_id = %seller_id, "updated seller account");
                outcome.state = self.load(ctx).await?;
            }
            Err(failure) => {
                warn!(message = %failure.message, "provider rejected account update");
                outcome.account_failure = Some(failure);
            }
        }

        self.update_bank(ctx, bank_input.as_ref(), &mut outcome)
            .await?;
        Ok(outcome)
    }

    async fn update_bank(
        &self,
        ctx: &SellerContext,
        input: Option<&BankFormInput>,
        outcome: &mut SettingsOutcome,
    ) -> Result<()> {
        outcome.bank_form = BankForm::parse(&outcome.state.profile, input);

        let (Some(seller_id), Some(input)) = (outcome.state.seller_id.clone(), input) else {
            outcome.bank = BankUpdate::Skipped;
            return Ok(());
        };

        if outcome.bank_form.is_masked() {
            debug!(seller_id = %seller_id, "masked bank number resubmitted, leaving unchanged");
            outcome.bank = BankUpdate::Unchanged;
            return Ok(());
        }
        let errors = outcome.bank_form.validate();
        if !errors.is_empty() {
            debug!(errors = %errors, "bank form invalid");
            outcome.bank = BankUpdate::Invalid { errors };
            return Ok(());
        }
        let Some(payload) = outcome.bank_form.to_payload() else {
            return Err(PaymentError::MissingData("bank_account_number"));
        };

        match provider_call(self.provider.create_bank_account(&seller_id, &payload).await)? {
            Ok(bank_id) => {
                info!(seller_id = %seller_id, bank_id = %bank_id, "attached bank account");
                self.store
                    .store(SellerAccountLink {
                        community_id: ctx.community_id,
                        person_id: ctx.person_id.clone(),
                        seller_id: Some(seller_id),
                        bank_id: Some(bank_id.clone()),
                    })
                    .await?;
                outcome.state = self.load(ctx).await?;
                outcome.bank = BankUpdate::Updated { bank_id };
            }
            Err(failure) => {
                warn!(message = %failure.message, "provider rejected bank account");
                outcome.bank = BankUpdate::Failed {
                    failure,
                    submitted_number: input.submitted_account_number().map(str::to_string),
                };
            }
        }
        Ok(())
    }
}
