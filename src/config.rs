use crate::domain::listing::ModerationPolicy;
use crate::domain::provider_account::ApiVersion;
use crate::domain::settings::SettingsCapabilities;
use std::env;
use thiserror::Error;

/// Runtime configuration, read once at startup and passed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_version: ApiVersion,
    pub features: FeatureFlags,
    /// Marketplace name used in receipts.
    pub service_name: String,
    pub telemetry: TelemetryConfig,
}

/// Per-deployment feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    pub approve_listings: bool,
    pub location_search: bool,
    pub stripe_payments: bool,
}

impl FeatureFlags {
    /// Approval rules for a marketplace with the given pre-approval setting.
    pub fn moderation_policy(&self, pre_approved_listings: bool) -> ModerationPolicy {
        ModerationPolicy {
            pre_approved_listings,
            approvals_enabled: self.approve_listings,
        }
    }

    pub fn settings_capabilities(&self) -> SettingsCapabilities {
        SettingsCapabilities {
            stripe_active: self.stripe_payments,
            location_search: self.location_search,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PAYMENTS_API_VERSION must be `legacy` or `current`, got `{0}`")]
    InvalidApiVersion(String),
    #[error("{name} must be a boolean, got `{value}`")]
    InvalidFlag { name: &'static str, value: String },
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_version = match env::var("PAYMENTS_API_VERSION") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidApiVersion(value))?,
            Err(_) => ApiVersion::default(),
        };

        let features = FeatureFlags {
            approve_listings: flag("FEATURE_APPROVE_LISTINGS")?,
            location_search: flag("FEATURE_LOCATION_SEARCH")?,
            stripe_payments: flag("FEATURE_STRIPE_PAYMENTS")?,
        };

        let service_name =
            env::var("MARKETPLACE_SERVICE_NAME").unwrap_or_else(|_| "Marketplace".to_string());
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_version,
            features,
            service_name,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    const VARS: &[&str] = &[
        "PAYMENTS_API_VERSION",
        "FEATURE_APPROVE_LISTINGS",
        "FEATURE_LOCATION_SEARCH",
        "FEATURE_STRIPE_PAYMENTS",
        "MARKETPLACE_SERVICE_NAME",
        "APP_LOG_LEVEL",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in VARS {
            // SAFETY: env access is serialized by `env_guard`.
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    fn test_load_defaults() {
        let _lock = env_guard().lock().unwrap();
        reset_env();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.api_version, ApiVersion::Legacy);
        assert_eq!(config.features, FeatureFlags::default());
        assert_eq!(config.service_name, "Marketplace");
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_load_from_env() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        // SAFETY: env access is serialized by `env_guard`.
        unsafe {
            env::set_var("PAYMENTS_API_VERSION", "current");
            env::set_var("FEATURE_APPROVE_LISTINGS", "true");
            env::set_var("MARKETPLACE_SERVICE_NAME", "Toolshare");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.api_version, ApiVersion::Current);
        assert!(config.features.approve_listings);
        assert!(!config.features.stripe_payments);
        assert_eq!(config.service_name, "Toolshare");
        assert!(config.features.moderation_policy(true).approvals_enabled);
        assert_eq!(
            config.features.settings_capabilities(),
            SettingsCapabilities::default()
        );
        reset_env();
    }

    #[test]
    fn test_rejects_bad_values() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        // SAFETY: env access is serialized by `env_guard`.
        unsafe { env::set_var("FEATURE_LOCATION_SEARCH", "maybe") };
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "FEATURE_LOCATION_SEARCH", .. })
        ));

        reset_env();
        // SAFETY: env access is serialized by `env_guard`.
        unsafe { env::set_var("PAYMENTS_API_VERSION", "v3") };
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidApiVersion(_))
        ));
        reset_env();
    }
}
