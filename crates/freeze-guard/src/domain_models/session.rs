//! Monitoring session
//!
//! Live state for one frozen pull request. A session is never reused: a new
//! freeze status or a new pull request always produces a new session.

use super::{ResourceRef, ServiceMetadata};
use crate::page::ObserverHandle;
use std::fmt;
use uuid::Uuid;

/// Identifies one session; also written onto the blocked merge control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct MonitoringSession {
    pub id: SessionId,
    pub target: ResourceRef,
    pub metadata: ServiceMetadata,
    /// A definitive bypass answer has been reached
    pub bypass_resolved: bool,
    /// The merge control has been disabled in this session
    pub button_handled: bool,
    /// The freeze notification has been shown in this session
    pub notified: bool,
    /// Mutation observer armed for this session
    pub observer: Option<ObserverHandle>,
}

impl MonitoringSession {
    pub fn new(target: ResourceRef, metadata: ServiceMetadata) -> Self {
        Self {
            id: SessionId::new(),
            target,
            metadata,
            bypass_resolved: false,
            button_handled: false,
            notified: false,
            observer: None,
        }
    }

    /// Value of the marker attribute identifying controls blocked by this session
    pub fn marker(&self) -> String {
        self.id.to_string()
    }
}
