//! Merge gate
//!
//! Finds the merge control and disables it once per session. Called on every
//! mutation tick, so each call queries the page afresh: the control may not be
//! rendered yet, or may have been replaced by a re-render.

use crate::domain_models::{MonitoringSession, ServiceMetadata};
use crate::page::{ControlBlock, ElementId, Notification, Page};

/// Stable test id of the primary merge button
pub const MERGE_BUTTON_SELECTOR: &str = r#"[data-testid="mergeButton-primary"]"#;

/// Attribute carrying the id of the session that blocked the control
pub const SESSION_MARKER_ATTR: &str = "data-freeze-guard-session";

const MERGE_TEXT: &str = "merge";

/// Result of one disable attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// No merge control on the page yet
    NotFound,
    /// Control present and already blocked by this session
    AlreadyHandled,
    /// Control blocked by this call
    Disabled,
}

impl GateOutcome {
    pub fn handled(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

#[derive(Debug, Clone)]
pub struct MergeGate {
    primary_selector: String,
}

impl Default for MergeGate {
    fn default() -> Self {
        Self {
            primary_selector: MERGE_BUTTON_SELECTOR.to_string(),
        }
    }
}

impl MergeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate the merge control: primary test id first, then any button whose
    /// text mentions "merge"
    pub fn locate<P: Page + ?Sized>(&self, page: &P) -> Option<ElementId> {
        page.query_selector(&self.primary_selector).or_else(|| {
            page.query_all("button").into_iter().find(|&button| {
                page.text_content(button)
                    .is_some_and(|text| text.to_lowercase().contains(MERGE_TEXT))
            })
        })
    }

    /// Disable the merge control for `session` if it is present and not yet handled
    ///
    /// Handling is latched per session: once a control was disabled, a control
    /// the host re-renders later in the same session is not blocked again. A
    /// new session (navigation or changed freeze metadata) blocks afresh.
    pub fn try_disable<P: Page + ?Sized>(
        &self,
        page: &mut P,
        session: &mut MonitoringSession,
    ) -> GateOutcome {
        let Some(control) = self.locate(page) else {
            return GateOutcome::NotFound;
        };

        let marker = session.marker();
        if session.button_handled
            || page.attribute(control, SESSION_MARKER_ATTR).as_deref() == Some(marker.as_str())
        {
            session.button_handled = true;
            return GateOutcome::AlreadyHandled;
        }

        // A marker from an older session means the control was never released;
        // re-blocking replaces the stale overlay.
        page.block_control(control, &control_block(&session.metadata));
        page.set_attribute(control, SESSION_MARKER_ATTR, &marker);
        session.button_handled = true;
        log::info!(
            "MergeGate: merge control disabled for {} (session {})",
            session.target,
            session.id
        );

        if !session.notified {
            page.show_notification(&Notification::for_freeze(&session.target, &session.metadata));
            session.notified = true;
        }

        GateOutcome::Disabled
    }

    /// Restore every control blocked by `session`
    pub fn release<P: Page + ?Sized>(&self, page: &mut P, session: &MonitoringSession) {
        let selector = format!(r#"[{}="{}"]"#, SESSION_MARKER_ATTR, session.marker());
        for control in page.query_all(&selector) {
            page.unblock_control(control);
            page.remove_attribute(control, SESSION_MARKER_ATTR);
            log::debug!("MergeGate: merge control released (session {})", session.id);
        }
    }
}

fn control_block(metadata: &ServiceMetadata) -> ControlBlock {
    let tooltip = match metadata.frozen_by.as_deref() {
        Some(frozen_by) => format!("Merging is disabled: service freeze declared by {}", frozen_by),
        None => "Merging is disabled during the service freeze".to_string(),
    };
    ControlBlock {
        tooltip,
        overlay_text: "🚫".to_string(),
        opacity: 0.5,
    }
}
