use super::country::{JAPAN, PUERTO_RICO, Region, UNITED_STATES};
use super::provider_account::RawAddress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// One script variant (kana or kanji) of a Japanese address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JapanAddress {
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub line1: Option<String>,
}

impl From<&RawAddress> for JapanAddress {
    fn from(address: &RawAddress) -> Self {
        Self {
            postal_code: address.postal_code.clone(),
            state: address.state.clone(),
            city: address.city.clone(),
            town: address.town.clone(),
            line1: address.line1.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SellerAddress {
    Standard(PostalAddress),
    Japan {
        kana: JapanAddress,
        kanji: JapanAddress,
    },
}

/// Fields only Japanese individuals carry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JapanIdentity {
    pub first_name_kana: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kanji: Option<String>,
    pub last_name_kanji: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
}

/// The default payout account as the provider reports it. Only the last four
/// digits of the number are ever known.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BankSummary {
    pub country: Option<String>,
    pub bank_name: Option<String>,
    pub currency: Option<String>,
    pub last4: Option<String>,
    pub routing_number: Option<String>,
}

impl BankSummary {
    pub fn masked_account_number(&self) -> String {
        format!("****{}", self.last4.as_deref().unwrap_or_default())
    }

    /// One-line description shown next to the bank form, e.g.
    /// `"FI, NORDEA, EUR, ****1234"`.
    pub fn display_info(&self) -> String {
        [
            self.country.as_deref().unwrap_or_default(),
            self.bank_name.as_deref().unwrap_or_default(),
            self.currency.as_deref().unwrap_or_default(),
            &self.masked_account_number(),
        ]
        .join(", ")
        .to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mcc: Option<String>,
    pub url: Option<String>,
}

/// Provider-agnostic view of a seller's identity and payout details.
///
/// `address_country` is already unmasked: a Puerto Rico seller reads as `PR`
/// here even though the provider stores `US` + state `PR`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanonicalSellerProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address_country: Option<String>,
    pub address: Option<SellerAddress>,
    pub japan: Option<JapanIdentity>,
    pub bank: Option<BankSummary>,
    pub contact: Option<ContactDetails>,
    /// What `mask` had to overwrite or invent, so `unmask` can put it back.
    #[serde(skip)]
    pub(crate) mask_fill: Option<MaskFill>,
}

/// Profile data `mask` replaced when moving a Puerto Rico seller to `US`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MaskFill {
    /// Standard address state before it became `PR`.
    State(Option<String>),
    /// No address existed; `mask` created one to carry the state.
    Address,
    /// Japanese address, which has no state to carry `PR`.
    Country,
}

impl CanonicalSellerProfile {
    fn state(&self) -> Option<String> {
        match &self.address {
            Some(SellerAddress::Standard(address)) => address.state.clone(),
            _ => None,
        }
    }

    pub fn region(&self) -> Region {
        Region::new(self.address_country.clone(), self.state())
    }

    /// Replaces the country and, for standard addresses, the state.
    pub fn with_region(mut self, region: Region) -> Self {
        self.address_country = region.country;
        match &mut self.address {
            Some(SellerAddress::Standard(address)) => address.state = region.state,
            None if region.state.is_some() => {
                self.address = Some(SellerAddress::Standard(PostalAddress {
                    state: region.state,
                    ..Default::default()
                }))
            }
            _ => {}
        }
        self
    }

    /// Outgoing direction. Idempotent.
    pub fn mask(mut self) -> Self {
        if self.address_country.as_deref() != Some(PUERTO_RICO) {
            return self;
        }
        let fill = match &self.address {
            None => MaskFill::Address,
            Some(SellerAddress::Standard(address)) => MaskFill::State(address.state.clone()),
            Some(SellerAddress::Japan { .. }) => MaskFill::Country,
        };
        let region = self.region().mask();
        self.mask_fill = Some(fill);
        self.with_region(region)
    }

    /// Incoming direction, restoring whatever `mask` replaced on this profile.
    pub fn unmask(mut self) -> Self {
        let region = self.region().unmask();
        let fill = self.mask_fill.take();
        let mut profile = self.with_region(region);
        match fill {
            Some(MaskFill::State(state))
                if profile.address_country.as_deref() == Some(PUERTO_RICO) =>
            {
                if let Some(SellerAddress::Standard(address)) = &mut profile.address {
                    address.state = state;
                }
            }
            Some(MaskFill::Address) if profile.address_country.as_deref() == Some(PUERTO_RICO) => {
                profile.address = None;
            }
            Some(MaskFill::Country) if profile.address_country.as_deref() == Some(UNITED_STATES) => {
                profile.address_country = Some(PUERTO_RICO.to_string());
            }
            _ => {}
        }
        profile
    }

    /// Name printed on the payout account: kana names for Japanese banks.
    pub fn bank_holder_name(&self, bank_country: &str) -> Option<String> {
        let (first, last) = match (&self.japan, bank_country) {
            (Some(japan), JAPAN) => (&japan.first_name_kana, &japan.last_name_kana),
            (None, JAPAN) => (&None, &None),
            _ => (&self.first_name, &self.last_name),
        };
        let name = [
            first.as_deref().unwrap_or_default(),
            last.as_deref().unwrap_or_default(),
        ]
        .join(" ");
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}
