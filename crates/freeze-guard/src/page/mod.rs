//! Page boundary
//!
//! Everything the guard reads from or writes to the live document goes through
//! the [`Page`] trait. A host (browser bridge, webdriver harness) implements it;
//! [`MemoryPage`] is the in-memory implementation used by tests and dry runs.

mod memory;

pub use memory::{MemoryElement, MemoryPage};

use crate::domain_models::{ResourceRef, ServiceMetadata};

/// Fixed element id of the freeze notification; at most one exists at a time
pub const NOTIFICATION_ID: &str = "service-freeze-notification";

/// Opaque handle to a document element, valid until the host re-renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Handle to an armed mutation observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Interaction and visual state applied to a blocked merge control
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBlock {
    /// Advisory tooltip shown on hover
    pub tooltip: String,
    /// Glyph rendered in the blocking overlay
    pub overlay_text: String,
    /// Dimmed opacity of the control
    pub opacity: f32,
}

/// Banner announcing the freeze on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Always [`NOTIFICATION_ID`]
    pub element_id: String,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_freeze(target: &ResourceRef, metadata: &ServiceMetadata) -> Self {
        let mut body = format!(
            "Merging into {} is blocked while the service is frozen.",
            target.service_name
        );
        if let Some(frozen_by) = &metadata.frozen_by {
            body.push_str(&format!(" Frozen by {}", frozen_by));
            if let Some(email) = &metadata.frozen_by_email {
                body.push_str(&format!(" <{}>", email));
            }
            body.push('.');
        }
        if let Some(updated_at) = metadata.updated_at {
            body.push_str(&format!(
                " Last updated {}.",
                updated_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }

        Self {
            element_id: NOTIFICATION_ID.to_string(),
            title: "Service freeze in effect".to_string(),
            body,
        }
    }
}

/// Read/write access to the live document
///
/// Lookups return `None`/empty when nothing matches; a missing element is a
/// normal condition, not an error. Removal and disconnection must be safe to
/// repeat.
pub trait Page {
    /// Current navigable location
    fn location(&self) -> String;

    /// Global document title
    fn document_title(&self) -> String;

    /// First element matching `selector`
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Text content of `element`, `None` once it left the document
    fn text_content(&self, element: ElementId) -> Option<String>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Disable, dim and overlay `element`
    fn block_control(&mut self, element: ElementId, block: &ControlBlock);

    /// Undo [`Page::block_control`]
    fn unblock_control(&mut self, element: ElementId);

    /// Insert the notification, replacing any element with the same id
    fn show_notification(&mut self, notification: &Notification);

    /// Remove the notification with `element_id`; returns whether one existed
    fn remove_notification(&mut self, element_id: &str) -> bool;

    /// Arm a subtree-wide structural mutation observer on the document body
    fn observe_mutations(&mut self) -> ObserverHandle;

    fn disconnect(&mut self, handle: ObserverHandle);

    /// Blocking user-facing alert
    fn alert(&mut self, message: &str);

    /// Text of the first element matching `selector`
    fn query_text(&self, selector: &str) -> Option<String> {
        self.query_selector(selector)
            .and_then(|element| self.text_content(element))
    }
}
