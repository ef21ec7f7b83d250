//! Guard settings
//!
//! The settings collaborator only hands out two values the monitor cares
//! about (`organization` and `apiKey`); the rest tune the runtime.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings key for the organization segment of pull-request URLs
pub const ORGANIZATION_KEY: &str = "organization";
/// Settings key for the freeze-status API key
pub const API_KEY_KEY: &str = "apiKey";

const ENV_ORGANIZATION: &str = "FREEZE_GUARD_ORGANIZATION";
const ENV_API_KEY: &str = "FREEZE_GUARD_API_KEY";
const ENV_API_URL: &str = "FREEZE_GUARD_API_URL";

/// Read-only key lookup, the only way the monitor sees settings
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

/// Guard settings loaded from freeze-guard.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Organization whose pull requests are guarded (e.g. "acme")
    #[serde(default)]
    pub organization: Option<String>,

    /// Key sent as `x-api-key` to the freeze-status API
    #[serde(default)]
    pub api_key: Option<String>,

    /// Endpoint listing the services and their freeze status
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Fixed period between freeze re-checks
    #[serde(default = "default_recheck_interval_secs")]
    pub recheck_interval_secs: u64,

    /// Timeout for a single freeze-status HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Document-title fragments identifying the host site rather than the PR
    #[serde(default = "default_brand_tokens")]
    pub brand_tokens: Vec<String>,
}

fn default_api_url() -> String {
    "https://noxhsxrk.com/api/dev/jira/services".to_string()
}

fn default_recheck_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_brand_tokens() -> Vec<String> {
    vec!["Bitbucket".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: None,
            api_key: None,
            api_url: default_api_url(),
            recheck_interval_secs: default_recheck_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            brand_tokens: default_brand_tokens(),
        }
    }
}

impl Settings {
    /// Load settings from the config file and the environment, or use defaults
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }

        let mut settings = match crate::load_config_file() {
            Some(content) => match Self::parse(&content) {
                Ok(settings) => {
                    log::info!("Loaded settings from file");
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                    Self::default()
                }
            },
            None => {
                log::debug!("Using default settings");
                Self::default()
            }
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Parse settings from TOML content
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid freeze-guard settings")
    }

    /// Override file values with whatever `lookup` provides
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(organization) = lookup(ENV_ORGANIZATION) {
            self.organization = Some(organization);
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = Some(api_key);
        }
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.api_url = api_url;
        }
    }

    pub fn recheck_interval(&self) -> Duration {
        Duration::from_secs(self.recheck_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl SettingsStore for Settings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            ORGANIZATION_KEY => self.organization.clone(),
            API_KEY_KEY => self.api_key.clone(),
            _ => None,
        }
    }
}

/// A required setting is absent; monitoring never starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("setting `{0}` is not configured")]
pub struct ConfigurationMissing(pub &'static str);

/// The two values monitoring needs, both present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub organization: String,
    pub api_key: String,
}

impl Credentials {
    pub fn from_store(store: &dyn SettingsStore) -> Result<Self, ConfigurationMissing> {
        let organization = non_empty(store.get(ORGANIZATION_KEY))
            .ok_or(ConfigurationMissing(ORGANIZATION_KEY))?;
        let api_key = non_empty(store.get(API_KEY_KEY)).ok_or(ConfigurationMissing(API_KEY_KEY))?;
        Ok(Self {
            organization,
            api_key,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
