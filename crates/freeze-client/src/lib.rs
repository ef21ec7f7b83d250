//! Service freeze status client
//!
//! Two halves of the freeze lookup live here:
//! - the message protocol exchanged between the page-side guard and the
//!   privileged component ([`FreezeRequest`], [`FreezeResponse`])
//! - the privileged component itself ([`FreezeService`]), which calls the
//!   freeze-status HTTP API through a [`FreezeStatusApi`] implementation

mod api;
mod error;
mod protocol;
mod service;

pub use api::{parse_service_list, FreezeStatusApi, HttpFreezeStatusClient, ServiceRecord};
pub use error::ApiError;
pub use protocol::{FreezeRequest, FreezeResponse, ServiceMetadata, CHECK_SERVICE_FREEZE};
pub use service::FreezeService;
