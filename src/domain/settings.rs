use super::receipt::Gateway;
use super::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

pub const MAX_CONFIRMATION_DAYS_WITH_STRIPE: u32 = 90;
pub const MAX_CONFIRMATION_DAYS: u32 = 100;

/// Upper bound for automatic order confirmation. Stripe cannot hold funds for
/// longer than 90 days.
pub fn max_automatic_confirmation_after_days(stripe_active: bool) -> u32 {
    if stripe_active {
        MAX_CONFIRMATION_DAYS_WITH_STRIPE
    } else {
        MAX_CONFIRMATION_DAYS
    }
}

/// What the deployment enables for the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsCapabilities {
    /// Stripe is a configured gateway; caps the confirmation period.
    pub stripe_active: bool,
    /// Search configuration is editable.
    pub location_search: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainSearch {
    #[default]
    Keyword,
    Location,
    KeywordAndLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchConfiguration {
    pub main_search: MainSearch,
    pub distance_unit: DistanceUnit,
    pub limit_search_distance: bool,
}

/// Per-gateway payment settings touched by the marketplace settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    pub gateway: Gateway,
    pub confirmation_after_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    pub join_with_invite_only: bool,
    pub users_can_invite_new_users: bool,
    pub private: bool,
    pub require_verification_to_post_listings: bool,
    pub show_category_in_listing_list: bool,
    pub show_listing_publishing_date: bool,
    pub listing_comments_in_use: bool,
    pub automatic_confirmation_after_days: u32,
    pub automatic_newsletters: bool,
    pub default_min_days_between_community_updates: u32,
    pub email_admins_about_new_members: bool,
    pub pre_approved_listings: bool,
    pub search: SearchConfiguration,
}

/// Submitted settings form; absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub join_with_invite_only: Option<bool>,
    pub users_can_invite_new_users: Option<bool>,
    pub private: Option<bool>,
    pub require_verification_to_post_listings: Option<bool>,
    pub show_category_in_listing_list: Option<bool>,
    pub show_listing_publishing_date: Option<bool>,
    pub listing_comments_in_use: Option<bool>,
    pub automatic_confirmation_after_days: Option<u32>,
    pub automatic_newsletters: Option<bool>,
    pub default_min_days_between_community_updates: Option<u32>,
    pub email_admins_about_new_members: Option<bool>,
    pub pre_approved_listings: Option<bool>,
    pub main_search: Option<MainSearch>,
    pub distance_unit: Option<DistanceUnit>,
    /// Checkbox: absent means unchecked.
    pub limit_distance: bool,
}

impl MarketplaceSettings {
    /// Validates and applies an update. The confirmation period is copied to
    /// every configured gateway so payments release on the same schedule.
    /// Search configuration only changes where location search is enabled.
    pub fn apply(
        &mut self,
        update: &SettingsUpdate,
        capabilities: SettingsCapabilities,
        gateways: &mut [GatewaySettings],
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(days) = update.automatic_confirmation_after_days {
            let max = max_automatic_confirmation_after_days(capabilities.stripe_active);
            if days == 0 || days > max {
                errors.add(
                    "automatic_confirmation_after_days",
                    format!("must be between 1 and {max}"),
                );
            }
        }
        if !errors.is_empty() {
            return errors;
        }

        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut self.join_with_invite_only, update.join_with_invite_only);
        set(&mut self.users_can_invite_new_users, update.users_can_invite_new_users);
        set(&mut self.private, update.private);
        set(
            &mut self.require_verification_to_post_listings,
            update.require_verification_to_post_listings,
        );
        set(
            &mut self.show_category_in_listing_list,
            update.show_category_in_listing_list,
        );
        set(
            &mut self.show_listing_publishing_date,
            update.show_listing_publishing_date,
        );
        set(&mut self.listing_comments_in_use, update.listing_comments_in_use);
        set(
            &mut self.automatic_confirmation_after_days,
            update.automatic_confirmation_after_days,
        );
        set(&mut self.automatic_newsletters, update.automatic_newsletters);
        set(
            &mut self.default_min_days_between_community_updates,
            update.default_min_days_between_community_updates,
        );
        set(
            &mut self.email_admins_about_new_members,
            update.email_admins_about_new_members,
        );
        set(&mut self.pre_approved_listings, update.pre_approved_listings);

        if capabilities.location_search {
            set(&mut self.search.main_search, update.main_search);
            set(&mut self.search.distance_unit, update.distance_unit);
            self.search.limit_search_distance = update.limit_distance;
        }

        if let Some(days) = update.automatic_confirmation_after_days {
            for gateway in gateways.iter_mut() {
                gateway.confirmation_after_days = days;
            }
        }
        errors
    }
}
