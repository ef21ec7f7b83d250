//! Location change detection
//!
//! The page never reloads, so navigation shows up only as a different
//! location string on the next history event or structural mutation.

/// A location change seen by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChange {
    pub from: Option<String>,
    pub to: String,
}

/// Remembers the last location seen
#[derive(Debug, Clone, Default)]
pub struct LocationWatcher {
    last_seen: Option<String>,
}

impl LocationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current`; returns the change when it differs from the last one
    pub fn observe(&mut self, current: &str) -> Option<LocationChange> {
        if self.last_seen.as_deref() == Some(current) {
            return None;
        }
        let from = self.last_seen.replace(current.to_string());
        Some(LocationChange {
            from,
            to: current.to_string(),
        })
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}
