//! Freeze oracle client
//!
//! The guard never calls the freeze-status API itself: it sends a
//! `checkServiceFreeze` message to the privileged component and interprets
//! the answer.

use crate::domain_models::ServiceFreezeStatus;
use async_trait::async_trait;
use freeze_client::{FreezeRequest, FreezeResponse, FreezeService, FreezeStatusApi};
use thiserror::Error;

/// The freeze status could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The stored API key was rejected; retrying will not help
    #[error("{0}")]
    Unauthorized(String),

    #[error("freeze status lookup failed: {0}")]
    Remote(String),

    /// The message boundary itself failed (host reloaded mid-flight, closed channel)
    #[error("freeze status component unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    /// Classify an `{ error }` payload
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if message.contains("403") || lowered.contains("unauthorized") {
            Self::Unauthorized(message)
        } else {
            Self::Remote(message)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// The message boundary could not deliver a request
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ChannelError(pub String);

/// Asynchronous message boundary to the privileged component
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, request: FreezeRequest) -> Result<FreezeResponse, ChannelError>;
}

/// In-process delivery straight to a [`FreezeService`]
#[async_trait]
impl<A: FreezeStatusApi> MessageChannel for FreezeService<A> {
    async fn send(&self, request: FreezeRequest) -> Result<FreezeResponse, ChannelError> {
        Ok(self.handle(&request).await)
    }
}

/// Source of freeze status for a service
#[async_trait]
pub trait FreezeOracle: Send + Sync {
    async fn query(
        &self,
        service_name: &str,
        api_key: &str,
    ) -> Result<ServiceFreezeStatus, OracleError>;
}

/// [`FreezeOracle`] speaking the message protocol over a [`MessageChannel`]
#[derive(Debug, Clone)]
pub struct MessageOracle<C> {
    channel: C,
}

impl<C: MessageChannel> MessageOracle<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl<C: MessageChannel> FreezeOracle for MessageOracle<C> {
    async fn query(
        &self,
        service_name: &str,
        api_key: &str,
    ) -> Result<ServiceFreezeStatus, OracleError> {
        log::debug!("MessageOracle: querying freeze status of '{}'", service_name);
        let request = FreezeRequest::check_service_freeze(service_name, api_key);
        let response = self
            .channel
            .send(request)
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        interpret(response)
    }
}

/// Turn a protocol response into a freeze status
///
/// `isFrozen` is authoritative; metadata is kept only for frozen services.
pub fn interpret(response: FreezeResponse) -> Result<ServiceFreezeStatus, OracleError> {
    match response {
        FreezeResponse::Failure { error } => Err(OracleError::from_message(error)),
        FreezeResponse::Status {
            is_frozen: true,
            service_data,
        } => Ok(ServiceFreezeStatus::frozen(service_data.unwrap_or_default())),
        FreezeResponse::Status {
            is_frozen: false, ..
        } => Ok(ServiceFreezeStatus::not_frozen()),
    }
}
