//! Domain models
//!
//! Core domain types of the guard, independent of the page host.

mod freeze_status;
mod resource;
mod session;

pub use freeze_status::{ServiceFreezeStatus, ServiceMetadata};
pub use resource::{ResourcePattern, ResourceRef};
pub use session::{MonitoringSession, SessionId};
