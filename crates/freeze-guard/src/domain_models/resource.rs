//! Pull request resource identification
//!
//! A guarded resource is a pull-request page of the configured organization:
//! `https://<host>/<org>/<service>/pull-requests/<id>[/...]`

use regex::Regex;
use std::fmt;

/// The pull request currently viewed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    /// Repository slug, used as the service name for freeze lookups
    pub service_name: String,
    /// Pull request number, kept as the digits found in the URL
    pub pull_request_id: String,
}

impl ResourceRef {
    pub fn new(service_name: impl Into<String>, pull_request_id: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            pull_request_id: pull_request_id.into(),
        }
    }

    /// Identify the pull request behind `location` for `organization`
    ///
    /// Returns `None` for an empty organization (monitoring disabled) and for
    /// any location that is not a pull-request page of that organization.
    pub fn identify(location: &str, organization: &str) -> Option<Self> {
        ResourcePattern::new(organization)?.identify(location)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.service_name, self.pull_request_id)
    }
}

/// Compiled location pattern for one organization
#[derive(Debug, Clone)]
pub struct ResourcePattern {
    pattern: Regex,
}

impl ResourcePattern {
    /// Compile the pattern; `None` when the organization is empty
    pub fn new(organization: &str) -> Option<Self> {
        if organization.is_empty() {
            return None;
        }

        let source = format!(
            r"^[A-Za-z][A-Za-z0-9+.-]*://[^/?#]+/{}/([^/?#]+)/pull-requests/(\d+)(?:[/?#]|$)",
            regex::escape(organization)
        );
        match Regex::new(&source) {
            Ok(pattern) => Some(Self { pattern }),
            Err(e) => {
                log::warn!(
                    "Cannot build location pattern for organization '{}': {}",
                    organization,
                    e
                );
                None
            }
        }
    }

    pub fn identify(&self, location: &str) -> Option<ResourceRef> {
        let caps = self.pattern.captures(location.trim())?;
        Some(ResourceRef::new(&caps[1], &caps[2]))
    }
}
