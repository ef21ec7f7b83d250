//! Freeze-status HTTP API
//!
//! The API lists every service of the organization with its freeze flag:
//! `{ "services": [ { "service_name": "payments", "status": true, ... } ] }`

use crate::error::ApiError;
use crate::protocol::ServiceMetadata;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// One service entry of the freeze-status listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub service_name: String,
    /// `true` only when the API reports the JSON boolean `true`
    pub status: bool,
    pub metadata: ServiceMetadata,
}

impl ServiceRecord {
    /// Read one listing entry; entries without a string `service_name` are skipped
    fn from_value(value: Value) -> Option<Self> {
        let service_name = value.get("service_name")?.as_str()?.to_string();
        let status = value.get("status").and_then(Value::as_bool) == Some(true);
        let metadata = match serde_json::from_value::<ServiceMetadata>(value) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("Ignoring malformed metadata of '{}': {}", service_name, e);
                ServiceMetadata::default()
            }
        };

        Some(Self {
            service_name,
            status,
            metadata,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ServiceList {
    #[serde(default)]
    services: Vec<Value>,
}

/// Parse the body of the freeze-status listing
///
/// A malformed entry is skipped on its own so it cannot hide its siblings.
pub fn parse_service_list(body: &str) -> Result<Vec<ServiceRecord>, ApiError> {
    let list: ServiceList = serde_json::from_str(body)?;
    Ok(list
        .services
        .into_iter()
        .filter_map(|entry| {
            let record = ServiceRecord::from_value(entry.clone());
            if record.is_none() {
                log::debug!("Skipping service entry without a name: {}", entry);
            }
            record
        })
        .collect())
}

/// Source of service freeze records
#[async_trait]
pub trait FreezeStatusApi: Send + Sync {
    /// Fetch all service records visible to `api_key`
    async fn list_services(&self, api_key: &str) -> Result<Vec<ServiceRecord>, ApiError>;
}

/// reqwest-backed freeze-status API client
#[derive(Debug, Clone)]
pub struct HttpFreezeStatusClient {
    http: reqwest::Client,
    api_url: String,
}

impl HttpFreezeStatusClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("freeze-guard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, api_url))
    }

    /// Use a preconfigured reqwest client
    pub fn with_http(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl FreezeStatusApi for HttpFreezeStatusClient {
    async fn list_services(&self, api_key: &str) -> Result<Vec<ServiceRecord>, ApiError> {
        log::debug!("HttpFreezeStatusClient: GET {}", self.api_url);

        let response = self
            .http
            .get(&self.api_url)
            .header("x-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        log::debug!("HttpFreezeStatusClient: response status {}", status);

        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_service_list(&body)
    }
}
