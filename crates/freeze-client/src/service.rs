//! Privileged freeze component
//!
//! Answers `checkServiceFreeze` messages by looking the service up in the
//! freeze-status API. Every failure is turned into an `{ error }` response so
//! the page side never sees a transport fault.

use crate::api::FreezeStatusApi;
use crate::error::ApiError;
use crate::protocol::{FreezeRequest, FreezeResponse, ServiceMetadata, CHECK_SERVICE_FREEZE};

/// Message handler backed by a freeze-status API
#[derive(Debug, Clone)]
pub struct FreezeService<A> {
    api: A,
}

impl<A: FreezeStatusApi> FreezeService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Look up the freeze state of `service_name`
    ///
    /// Returns `Some(metadata)` while the service is frozen and `None` when it
    /// is not frozen or not listed at all.
    pub async fn check_service_freeze(
        &self,
        service_name: &str,
        api_key: &str,
    ) -> Result<Option<ServiceMetadata>, ApiError> {
        log::debug!("FreezeService: checking service '{}'", service_name);

        let services = self.api.list_services(api_key).await?;
        let frozen = services
            .into_iter()
            .find(|s| s.service_name == service_name)
            .filter(|s| s.status)
            .map(|s| s.metadata);

        log::info!(
            "FreezeService: service '{}' frozen: {}",
            service_name,
            frozen.is_some()
        );
        Ok(frozen)
    }

    /// Answer one message from the guard
    pub async fn handle(&self, request: &FreezeRequest) -> FreezeResponse {
        if request.action != CHECK_SERVICE_FREEZE {
            log::warn!("FreezeService: unsupported action '{}'", request.action);
            return FreezeResponse::failure(format!("unsupported action '{}'", request.action));
        }

        match self
            .check_service_freeze(&request.service_name, &request.api_key)
            .await
        {
            Ok(metadata) => FreezeResponse::Status {
                is_frozen: metadata.is_some(),
                service_data: metadata,
            },
            Err(e) => {
                log::error!("FreezeService: freeze lookup failed: {}", e);
                FreezeResponse::failure(e.to_string())
            }
        }
    }
}
