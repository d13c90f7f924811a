use clap::{Parser, Subcommand, ValueEnum};
use marketplace_payments::application::listing_moderation::{on_author_update, on_create, review};
use marketplace_payments::application::receipt::compute;
use marketplace_payments::application::seller_account::{SellerAccountService, SellerContext};
use marketplace_payments::config::AppConfig;
use marketplace_payments::domain::bank::{BankForm, BankFormInput};
use marketplace_payments::domain::forms::AccountSubmission;
use marketplace_payments::domain::listing::{ApprovalState, Listing};
use marketplace_payments::domain::membership::{
    Member, MemberQuery, SortColumn, SortDirection, StatusFilter,
};
use marketplace_payments::domain::normalizer::to_canonical;
use marketplace_payments::domain::ports::{SellerAccountProviderBox, SellerAccountStoreBox};
use marketplace_payments::domain::provider_account::{ApiVersion, ProviderAccountRecord};
use marketplace_payments::domain::receipt::{Audience, PaymentRecord, TransactionRecord};
use marketplace_payments::domain::settings::{GatewaySettings, MarketplaceSettings, SettingsUpdate};
use marketplace_payments::infrastructure::in_memory::{
    InMemorySellerAccountProvider, InMemorySellerAccountStore,
};
use marketplace_payments::interfaces::csv::membership_writer::{ExportColumns, MembershipWriter};
use marketplace_payments::interfaces::receipt_text::{ReceiptContext, SymbolFormatter, render};
use marketplace_payments::telemetry;
use miette::{IntoDiagnostic, Result, miette};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider API shape to read; defaults to PAYMENTS_API_VERSION.
    #[arg(long, global = true)]
    api_version: Option<ApiVersion>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical seller profile for a provider account JSON file.
    Profile { account: PathBuf },
    /// Normalize and validate a payout bank form for a provider account.
    Bank {
        account: PathBuf,
        /// Submitted bank form JSON; without it only the profile-derived
        /// fields are filled.
        #[arg(long)]
        form: Option<PathBuf>,
    },
    /// Render a payment receipt from a transaction/payment JSON file.
    Receipt {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = AudienceArg::Seller)]
        audience: AudienceArg,
        /// Print the fee breakdown and template key as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Open a seller account against the in-memory provider and print the outcome.
    Onboard { input: PathBuf },
    /// Apply a marketplace settings update; limits follow the feature flags.
    Settings { input: PathBuf },
    /// Run a moderation step on a listing and print it with the resulting mails.
    Listing {
        input: PathBuf,
        #[arg(long, value_enum)]
        action: ListingAction,
    },
    /// Export marketplace members as CSV.
    MembersCsv {
        members: PathBuf,
        /// Add the can_post_listings column.
        #[arg(long)]
        can_post_listings: bool,
        /// Custom field column to export; repeatable.
        #[arg(long = "custom-field")]
        custom_fields: Vec<String>,
        /// Only members whose name or email contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Status filter (admin, banned, posting_allowed, accepted,
        /// unconfirmed, pending); repeatable.
        #[arg(long = "status")]
        statuses: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        direction: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AudienceArg {
    Seller,
    Buyer,
}

impl From<AudienceArg> for Audience {
    fn from(value: AudienceArg) -> Self {
        match value {
            AudienceArg::Seller => Audience::Seller,
            AudienceArg::Buyer => Audience::Buyer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListingAction {
    Create,
    AuthorUpdate,
    Approve,
    Reject,
}

#[derive(Deserialize)]
struct SettingsInput {
    #[serde(default)]
    settings: MarketplaceSettings,
    #[serde(default)]
    gateways: Vec<GatewaySettings>,
    update: SettingsUpdate,
}

#[derive(Deserialize)]
struct ListingInput {
    listing: Listing,
    #[serde(default)]
    pre_approved_listings: bool,
    #[serde(default)]
    author_is_admin: bool,
    #[serde(default)]
    admin_ids: Vec<String>,
}

#[derive(Deserialize)]
struct ReceiptInput {
    transaction: TransactionRecord,
    payment: PaymentRecord,
    listing_title: String,
    buyer_name: String,
    seller_name: String,
    service_name: Option<String>,
}

#[derive(Deserialize)]
struct OnboardInput {
    #[serde(default = "default_community")]
    community_id: u64,
    person_id: String,
    email: Option<String>,
    submission: AccountSubmission,
    bank: Option<BankFormInput>,
}

fn default_community() -> u64 {
    1
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).into_diagnostic()?;
    serde_json::from_reader(BufReader::new(file)).into_diagnostic()
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().into_diagnostic()?;
    telemetry::init(&config.telemetry).into_diagnostic()?;

    let api_version = cli.api_version.unwrap_or(config.api_version);

    match cli.command {
        Command::Profile { account } => {
            let record: ProviderAccountRecord = read_json(&account)?;
            print_json(&to_canonical(&record, api_version))?;
        }
        Command::Bank { account, form } => {
            let record: ProviderAccountRecord = read_json(&account)?;
            let input: Option<BankFormInput> = form.as_deref().map(read_json).transpose()?;
            let profile = to_canonical(&record, api_version);
            let bank_form = BankForm::parse(&profile, input.as_ref());
            let errors = bank_form.validate();
            print_json(&serde_json::json!({
                "form": bank_form,
                "errors": errors,
                "payload": bank_form.to_payload(),
            }))?;
        }
        Command::Receipt {
            input,
            audience,
            json,
        } => {
            let input: ReceiptInput = read_json(&input)?;
            let breakdown = compute(&input.transaction, &input.payment).into_diagnostic()?;
            let ctx = ReceiptContext {
                service_name: input.service_name.unwrap_or(config.service_name),
                listing_title: input.listing_title,
                buyer_name: input.buyer_name,
                seller_name: input.seller_name,
            };
            let receipt = render(audience.into(), &breakdown, &ctx, &SymbolFormatter);
            if json {
                print_json(&serde_json::json!({
                    "template": receipt.template,
                    "breakdown": breakdown,
                }))?;
            } else {
                println!("{}", receipt.body());
            }
        }
        Command::Onboard { input } => {
            let input: OnboardInput = read_json(&input)?;
            let store: SellerAccountStoreBox = Box::new(InMemorySellerAccountStore::new());
            let provider: SellerAccountProviderBox =
                Box::new(InMemorySellerAccountProvider::new(api_version));
            let service = SellerAccountService::new(store, provider, api_version);
            let ctx = SellerContext {
                community_id: input.community_id,
                person_id: input.person_id,
                email: input.email,
                profile_url: None,
            };
            let outcome = service
                .create(&ctx, input.submission, input.bank)
                .await
                .into_diagnostic()?;
            info!(ready = outcome.state.ready, "onboarding finished");
            print_json(&outcome)?;
        }
        Command::Settings { input } => {
            let SettingsInput {
                mut settings,
                mut gateways,
                update,
            } = read_json(&input)?;
            let errors = settings.apply(
                &update,
                config.features.settings_capabilities(),
                &mut gateways,
            );
            print_json(&serde_json::json!({
                "settings": settings,
                "gateways": gateways,
                "errors": errors,
            }))?;
        }
        Command::Listing { input, action } => {
            let ListingInput {
                mut listing,
                pre_approved_listings,
                author_is_admin,
                admin_ids,
            } = read_json(&input)?;
            let policy = config.features.moderation_policy(pre_approved_listings);
            let notifications = match action {
                ListingAction::Create => {
                    on_create(&policy, &mut listing, author_is_admin, &admin_ids)
                }
                ListingAction::AuthorUpdate => {
                    on_author_update(&policy, &mut listing, author_is_admin, &admin_ids)
                }
                ListingAction::Approve => review(&mut listing, ApprovalState::Approved)
                    .into_iter()
                    .collect(),
                ListingAction::Reject => review(&mut listing, ApprovalState::ApprovalRejected)
                    .into_iter()
                    .collect(),
            };
            print_json(&serde_json::json!({
                "listing": listing,
                "notifications": notifications,
                "show_approval_link": policy.show_approval_link(&listing, true),
            }))?;
        }
        Command::MembersCsv {
            members,
            can_post_listings,
            custom_fields,
            search,
            statuses,
            sort,
            direction,
        } => {
            let members: Vec<Member> = read_json(&members)?;
            let statuses = statuses
                .iter()
                .map(|status| {
                    StatusFilter::parse(status).ok_or_else(|| miette!("unknown status `{status}`"))
                })
                .collect::<Result<Vec<_>>>()?;
            let query = MemberQuery {
                text: search,
                statuses,
                sort: SortColumn::parse(sort.as_deref()),
                direction: SortDirection::parse(direction.as_deref()),
            };
            let columns = ExportColumns {
                can_post_listings,
                custom_fields,
            };
            let stdout = io::stdout();
            let mut writer = MembershipWriter::new(stdout.lock());
            writer
                .write_members(query.apply(&members), &columns)
                .into_diagnostic()?;
        }
    }

    Ok(())
}
