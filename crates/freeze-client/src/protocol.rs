//! Message protocol between the guard and the privileged freeze component
//!
//! Request:  `{ "action": "checkServiceFreeze", "serviceName": ..., "apiKey": ... }`
//! Response: `{ "isFrozen": bool, "serviceData": {...}? }` or `{ "error": "..." }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The only action the privileged component answers
pub const CHECK_SERVICE_FREEZE: &str = "checkServiceFreeze";

/// A request sent across the message boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeRequest {
    pub action: String,
    pub service_name: String,
    pub api_key: String,
}

impl FreezeRequest {
    /// Build a `checkServiceFreeze` request
    pub fn check_service_freeze(service_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            action: CHECK_SERVICE_FREEZE.to_string(),
            service_name: service_name.into(),
            api_key: api_key.into(),
        }
    }
}

/// Descriptive freeze context attached to a frozen service
///
/// Every field is optional; consumers pick their own default when a field is absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceMetadata {
    /// Canonical URL of the one pull request allowed to merge during the freeze
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_url: Option<String>,
    /// Who declared the freeze
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_by_email: Option<String>,
    /// Last change of the freeze record; unparseable timestamps are dropped
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match DateTime::parse_from_rfc3339(s.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            log::debug!("Ignoring unparseable updated_at '{}': {}", s, e);
            None
        }
    }))
}

/// A response sent back across the message boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreezeResponse {
    Failure {
        error: String,
    },
    Status {
        #[serde(rename = "isFrozen")]
        is_frozen: bool,
        #[serde(
            rename = "serviceData",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        service_data: Option<ServiceMetadata>,
    },
}

impl FreezeResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }
}
