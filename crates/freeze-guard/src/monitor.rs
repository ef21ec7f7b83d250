//! Freeze Monitor
//!
//! Owns the whole monitoring lifecycle for one page:
//!
//! ```text
//! Idle ──check──▶ Checking ──frozen──▶ Monitoring(session)
//!  ▲                 │ not frozen / error / not a PR  │ exempt / navigation
//!  └─────────────────┴──────────── teardown ◀─────────┘
//! ```
//!
//! Every trigger enters through [`FreezeMonitor::handle`]. Handling is
//! synchronous; the only asynchronous step, the freeze query, is returned to
//! the caller as a [`CheckRequest`] and its answer comes back as
//! [`Action::FreezeStatusLoaded`]. Answers for anything but the latest request
//! are dropped.

use crate::actions::{Action, CheckReason};
use crate::bypass::{self, BypassDecision, TitleResolver};
use crate::domain_models::{MonitoringSession, ResourcePattern, ResourceRef, ServiceFreezeStatus};
use crate::merge_gate::{GateOutcome, MergeGate};
use crate::navigation::LocationWatcher;
use crate::oracle::OracleError;
use crate::page::{Page, NOTIFICATION_ID};
use freeze_guard_config::{Credentials, SettingsStore};
use std::mem;

/// A freeze query the caller must run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub generation: u64,
    pub target: ResourceRef,
    pub api_key: String,
}

#[derive(Debug)]
pub enum MonitorState {
    Idle,
    /// Query in flight. A timer re-check of the monitored pull request keeps
    /// the running session in `previous` until the answer arrives.
    Checking {
        target: ResourceRef,
        generation: u64,
        previous: Option<MonitoringSession>,
    },
    Monitoring(MonitoringSession),
}

enum Navigation {
    Unchanged,
    Changed(Option<CheckRequest>),
}

enum BypassStep {
    Proceed,
    Wait,
    Exempt,
}

pub struct FreezeMonitor<P> {
    page: P,
    credentials: Option<Credentials>,
    pattern: Option<ResourcePattern>,
    titles: TitleResolver,
    gate: MergeGate,
    watcher: LocationWatcher,
    state: MonitorState,
    /// Pull request identified by the last check, whatever its freeze status
    current: Option<ResourceRef>,
    generation: u64,
    unauthorized_alerted: bool,
}

impl<P: Page> FreezeMonitor<P> {
    /// Create a monitor; missing settings leave it permanently idle
    pub fn new(page: P, settings: &dyn SettingsStore, titles: TitleResolver) -> Self {
        let credentials = match Credentials::from_store(settings) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                log::warn!("FreezeMonitor: {}, monitoring disabled", e);
                None
            }
        };
        let pattern = credentials
            .as_ref()
            .and_then(|c| ResourcePattern::new(&c.organization));

        Self {
            page,
            credentials,
            pattern,
            titles,
            gate: MergeGate::new(),
            watcher: LocationWatcher::new(),
            state: MonitorState::Idle,
            current: None,
            generation: 0,
            unauthorized_alerted: false,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Session currently guarding the page, if any
    pub fn session(&self) -> Option<&MonitoringSession> {
        match &self.state {
            MonitorState::Monitoring(session) => Some(session),
            MonitorState::Checking { previous, .. } => previous.as_ref(),
            MonitorState::Idle => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    /// Process one trigger; returns the freeze query to run, if any
    pub fn handle(&mut self, action: Action) -> Option<CheckRequest> {
        match action {
            Action::Bootstrap => {
                let location = self.page.location();
                self.watcher.observe(&location);
                self.request_check(CheckReason::Startup)
            }
            Action::LocationChanged => match self.poll_location() {
                Navigation::Changed(request) => request,
                Navigation::Unchanged => None,
            },
            Action::DomMutated => match self.poll_location() {
                Navigation::Changed(request) => request,
                Navigation::Unchanged => {
                    self.on_mutation();
                    None
                }
            },
            Action::RecheckTick => self.request_check(CheckReason::Timer),
            Action::FreezeStatusLoaded {
                generation,
                target,
                result,
            } => {
                self.apply_status(generation, target, result);
                None
            }
            Action::Shutdown => {
                log::debug!("FreezeMonitor: shutting down");
                self.teardown();
                None
            }
        }
    }

    /// Start a freeze check for the current location
    ///
    /// A no-op while a check for the same pull request is already in flight.
    pub fn request_check(&mut self, reason: CheckReason) -> Option<CheckRequest> {
        let location = self.page.location();
        let target = self.identify(&location);
        self.current = target.clone();

        let api_key = self.credentials.as_ref().map(|c| c.api_key.clone());
        let (Some(target), Some(api_key)) = (target, api_key) else {
            log::debug!(
                "FreezeMonitor: {} is not a guarded pull request ({:?})",
                location,
                reason
            );
            self.teardown();
            return None;
        };

        let carried = match mem::replace(&mut self.state, MonitorState::Idle) {
            MonitorState::Checking {
                target: pending,
                generation,
                previous,
            } if pending == target => {
                log::debug!(
                    "FreezeMonitor: check for {} already in flight ({:?})",
                    target,
                    reason
                );
                self.state = MonitorState::Checking {
                    target: pending,
                    generation,
                    previous,
                };
                return None;
            }
            MonitorState::Checking { previous, .. } => previous,
            MonitorState::Monitoring(session) => Some(session),
            MonitorState::Idle => None,
        };
        let previous = match carried {
            Some(session) if session.target == target => Some(session),
            Some(session) => {
                self.dismantle(session);
                None
            }
            None => None,
        };

        self.generation += 1;
        log::info!(
            "FreezeMonitor: checking freeze status of {} ({:?})",
            target,
            reason
        );
        self.state = MonitorState::Checking {
            target: target.clone(),
            generation: self.generation,
            previous,
        };
        Some(CheckRequest {
            generation: self.generation,
            target,
            api_key,
        })
    }

    fn identify(&self, location: &str) -> Option<ResourceRef> {
        self.pattern.as_ref()?.identify(location)
    }

    fn poll_location(&mut self) -> Navigation {
        let location = self.page.location();
        let Some(change) = self.watcher.observe(&location) else {
            return Navigation::Unchanged;
        };

        if self.identify(&location) == self.current {
            log::debug!(
                "FreezeMonitor: location changed to {} within the same resource",
                change.to
            );
            return Navigation::Unchanged;
        }

        log::info!(
            "FreezeMonitor: navigated from {} to {}",
            change.from.as_deref().unwrap_or("<none>"),
            change.to
        );
        self.teardown();
        Navigation::Changed(self.request_check(CheckReason::Navigation))
    }

    fn apply_status(
        &mut self,
        generation: u64,
        target: ResourceRef,
        result: Result<ServiceFreezeStatus, OracleError>,
    ) {
        let previous = match mem::replace(&mut self.state, MonitorState::Idle) {
            MonitorState::Checking {
                target: pending,
                generation: current,
                previous,
            } if current == generation && pending == target => previous,
            other => {
                log::debug!(
                    "FreezeMonitor: dropping stale freeze status for {} (generation {})",
                    target,
                    generation
                );
                self.state = other;
                return;
            }
        };

        let status = match result {
            Ok(status) => {
                self.unauthorized_alerted = false;
                status
            }
            Err(e) => {
                self.report_oracle_error(&e);
                self.discard(previous);
                return;
            }
        };

        if !status.is_frozen {
            log::info!("FreezeMonitor: {} is not frozen", target);
            self.discard(previous);
            return;
        }

        let metadata = status.metadata.unwrap_or_default();
        if let Some(session) = previous {
            if session.metadata == metadata {
                log::debug!("FreezeMonitor: freeze of {} unchanged", target);
                self.state = MonitorState::Monitoring(session);
                return;
            }
            self.dismantle(session);
        }

        log::warn!("FreezeMonitor: {} is frozen, guarding the merge control", target);
        let mut session = MonitoringSession::new(target, metadata);
        session.observer = Some(self.page.observe_mutations());
        self.state = MonitorState::Monitoring(session);
        // The control may already be rendered; no mutation would report it
        self.on_mutation();
    }

    fn report_oracle_error(&mut self, error: &OracleError) {
        if !error.is_unauthorized() {
            log::warn!(
                "FreezeMonitor: {}; assuming not frozen until the next check",
                error
            );
            return;
        }

        log::error!("FreezeMonitor: {}", error);
        if !self.unauthorized_alerted {
            self.page
                .alert(&format!("Service Freeze Guard error:\n\n{}", error));
            self.unauthorized_alerted = true;
        }
    }

    fn on_mutation(&mut self) {
        match self.resolve_bypass() {
            BypassStep::Proceed => {}
            BypassStep::Wait => return,
            BypassStep::Exempt => {
                self.teardown();
                return;
            }
        }

        let session = match &mut self.state {
            MonitorState::Monitoring(session) => session,
            MonitorState::Checking {
                previous: Some(session),
                ..
            } => session,
            _ => return,
        };
        if self.gate.try_disable(&mut self.page, session) == GateOutcome::NotFound {
            log::trace!("FreezeMonitor: merge control not rendered yet");
        }
    }

    fn resolve_bypass(&mut self) -> BypassStep {
        let session = match &mut self.state {
            MonitorState::Monitoring(session) => session,
            MonitorState::Checking {
                previous: Some(session),
                ..
            } => session,
            _ => return BypassStep::Wait,
        };
        if session.bypass_resolved {
            return BypassStep::Proceed;
        }

        let title = self.titles.resolve(&self.page);
        let location = self.page.location();
        match bypass::evaluate(&title, &location, &session.metadata) {
            BypassDecision::Exempt(reason) => {
                log::info!(
                    "FreezeMonitor: {} is exempt from the freeze ({:?})",
                    session.target,
                    reason
                );
                BypassStep::Exempt
            }
            BypassDecision::Undetermined => BypassStep::Wait,
            BypassDecision::NotExempt => {
                session.bypass_resolved = true;
                BypassStep::Proceed
            }
        }
    }

    fn discard(&mut self, previous: Option<MonitoringSession>) {
        if let Some(session) = previous {
            self.dismantle(session);
        }
        self.teardown();
    }

    /// Drop whatever session is live and return to `Idle`; safe to repeat
    fn teardown(&mut self) {
        match mem::replace(&mut self.state, MonitorState::Idle) {
            MonitorState::Monitoring(session)
            | MonitorState::Checking {
                previous: Some(session),
                ..
            } => self.dismantle(session),
            MonitorState::Checking { previous: None, .. } | MonitorState::Idle => {}
        }
        self.page.remove_notification(NOTIFICATION_ID);
    }

    fn dismantle(&mut self, mut session: MonitoringSession) {
        if let Some(observer) = session.observer.take() {
            self.page.disconnect(observer);
        }
        self.gate.release(&mut self.page, &session);
        self.page.remove_notification(NOTIFICATION_ID);
        log::debug!(
            "FreezeMonitor: session {} for {} torn down",
            session.id,
            session.target
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::ServiceMetadata;
    use crate::page::{ElementId, MemoryPage};
    use freeze_guard_config::Settings;

    const PR_7: &str = "https://bitbucket.org/acme/payments/pull-requests/7";
    const PR_8: &str = "https://bitbucket.org/acme/payments/pull-requests/8";

    fn settings() -> Settings {
        Settings {
            organization: Some("acme".into()),
            api_key: Some("key".into()),
            ..Settings::default()
        }
    }

    fn monitor(page: &MemoryPage) -> FreezeMonitor<MemoryPage> {
        FreezeMonitor::new(page.clone(), &settings(), TitleResolver::default())
    }

    /// Pull request page with a heading and a merge button
    fn pr_page(location: &str, heading: &str) -> (MemoryPage, ElementId) {
        let page = MemoryPage::new(location);
        page.append("h1", heading, &[]);
        let button = page.append("button", "Merge", &[("data-testid", "mergeButton-primary")]);
        (page, button)
    }

    fn frozen_by(name: &str) -> Result<ServiceFreezeStatus, OracleError> {
        Ok(ServiceFreezeStatus::frozen(ServiceMetadata {
            frozen_by: Some(name.into()),
            ..ServiceMetadata::default()
        }))
    }

    fn complete(
        monitor: &mut FreezeMonitor<MemoryPage>,
        request: &CheckRequest,
        result: Result<ServiceFreezeStatus, OracleError>,
    ) {
        let follow_up = monitor.handle(Action::FreezeStatusLoaded {
            generation: request.generation,
            target: request.target.clone(),
            result,
        });
        assert!(follow_up.is_none());
    }

    fn frozen_pr_7() -> (MemoryPage, ElementId, FreezeMonitor<MemoryPage>) {
        let (page, button) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, frozen_by("Dana"));
        (page, button, monitor)
    }

    #[test]
    fn test_non_pull_request_page_is_never_queried() {
        let page = MemoryPage::new("https://bitbucket.org/acme/payments/src/main");
        let mut monitor = monitor(&page);

        assert!(monitor.handle(Action::Bootstrap).is_none());
        assert!(monitor.handle(Action::RecheckTick).is_none());
        assert!(monitor.handle(Action::DomMutated).is_none());
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_missing_settings_disable_monitoring() {
        let (page, button) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = FreezeMonitor::new(
            page.clone(),
            &Settings {
                organization: Some("acme".into()),
                ..Settings::default()
            },
            TitleResolver::default(),
        );

        assert!(!monitor.is_enabled());
        assert!(monitor.handle(Action::Bootstrap).is_none());
        assert!(monitor.handle(Action::RecheckTick).is_none());
        assert!(!page.element(button).unwrap().disabled);
    }

    #[test]
    fn test_check_request_carries_service_and_key() {
        let (page, _) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);

        let request = monitor.handle(Action::Bootstrap).unwrap();
        assert_eq!(request.target, ResourceRef::new("payments", "7"));
        assert_eq!(request.api_key, "key");
        assert!(matches!(monitor.state(), MonitorState::Checking { .. }));
    }

    #[test]
    fn test_frozen_pull_request_is_blocked() {
        let (page, button, monitor) = frozen_pr_7();

        let element = page.element(button).unwrap();
        assert!(element.disabled);
        assert!(element.tooltip.unwrap().contains("Dana"));
        assert_eq!(page.notifications_shown(), 1);
        assert!(page.notification().is_some());
        assert_eq!(page.active_observers(), 1);
        let session = monitor.session().unwrap();
        assert!(session.bypass_resolved);
        assert!(session.button_handled);
    }

    #[test]
    fn test_not_frozen_leaves_page_untouched() {
        let (page, button) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, Ok(ServiceFreezeStatus::not_frozen()));

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert_eq!(page.active_observers(), 0);
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_oracle_error_never_disables() {
        let (page, button) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(
            &mut monitor,
            &request,
            Err(OracleError::Remote("API returned 500".into())),
        );

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert!(page.alerts().is_empty());
        assert!(matches!(monitor.state(), MonitorState::Idle));

        // Retried on the next timer tick
        assert!(monitor.handle(Action::RecheckTick).is_some());
    }

    #[test]
    fn test_unauthorized_alerts_once() {
        let (page, _) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);
        let unauthorized = || Err(OracleError::Unauthorized("API returned 403".into()));

        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, unauthorized());
        let request = monitor.handle(Action::RecheckTick).unwrap();
        complete(&mut monitor, &request, unauthorized());

        assert_eq!(page.alerts().len(), 1);
        assert!(page.alerts()[0].contains("403"));
    }

    #[test]
    fn test_merge_control_rendered_later() {
        let page = MemoryPage::new(PR_7);
        page.append("h1", "Fix rounding bug", &[]);
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, frozen_by("Dana"));
        assert!(page.notification().is_none());

        let button = page.append("button", "Merge", &[]);
        monitor.handle(Action::DomMutated);

        assert!(page.element(button).unwrap().disabled);
        assert_eq!(page.notifications_shown(), 1);
    }

    #[test]
    fn test_repeated_mutations_are_idempotent() {
        let (page, button, mut monitor) = frozen_pr_7();
        for _ in 0..5 {
            monitor.handle(Action::DomMutated);
        }

        assert_eq!(page.element(button).unwrap().overlays, 1);
        assert_eq!(page.notifications_shown(), 1);
        assert_eq!(page.active_observers(), 1);
    }

    #[test]
    fn test_navigation_to_unfrozen_pull_request_clears_page() {
        let (page, button, mut monitor) = frozen_pr_7();

        page.set_location(PR_8);
        let request = monitor.handle(Action::LocationChanged).unwrap();
        assert_eq!(request.target, ResourceRef::new("payments", "8"));
        // Torn down before the new check is answered
        assert!(page.notification().is_none());
        assert_eq!(page.active_observers(), 0);
        assert!(!page.element(button).unwrap().disabled);

        complete(&mut monitor, &request, Ok(ServiceFreezeStatus::not_frozen()));
        assert!(page.notification().is_none());
        assert!(!page.element(button).unwrap().disabled);
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_navigation_between_frozen_pull_requests() {
        let (page, button, mut monitor) = frozen_pr_7();
        let first_session = monitor.session().unwrap().id;

        page.set_location(PR_8);
        let request = monitor.handle(Action::DomMutated).unwrap();
        complete(&mut monitor, &request, frozen_by("Dana"));

        let session = monitor.session().unwrap();
        assert_ne!(session.id, first_session);
        assert_eq!(session.target, ResourceRef::new("payments", "8"));
        assert!(page.element(button).unwrap().disabled);
        assert_eq!(page.element(button).unwrap().overlays, 1);
        assert!(page.notification().is_some());
        assert_eq!(page.active_observers(), 1);
    }

    #[test]
    fn test_navigation_within_same_pull_request_is_ignored() {
        let (page, button, mut monitor) = frozen_pr_7();
        let session = monitor.session().unwrap().id;

        page.set_location(format!("{}/diff", PR_7));
        assert!(monitor.handle(Action::LocationChanged).is_none());
        assert_eq!(monitor.session().unwrap().id, session);
        assert!(page.element(button).unwrap().disabled);
    }

    #[test]
    fn test_navigation_away_from_pull_requests() {
        let (page, button, mut monitor) = frozen_pr_7();

        page.set_location("https://bitbucket.org/acme/payments/src/main");
        assert!(monitor.handle(Action::LocationChanged).is_none());
        assert!(matches!(monitor.state(), MonitorState::Idle));
        assert!(page.notification().is_none());
        assert!(!page.element(button).unwrap().disabled);
    }

    #[test]
    fn test_duplicate_check_is_not_stacked() {
        let (page, _) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);

        let request = monitor.handle(Action::Bootstrap).unwrap();
        assert!(monitor.handle(Action::RecheckTick).is_none());
        match monitor.state() {
            MonitorState::Checking { generation, .. } => assert_eq!(*generation, request.generation),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_stale_answer_is_dropped() {
        let (page, button) = pr_page(PR_7, "Fix rounding bug");
        let mut monitor = monitor(&page);
        let stale = monitor.handle(Action::Bootstrap).unwrap();

        page.set_location(PR_8);
        let current = monitor.handle(Action::LocationChanged).unwrap();

        complete(&mut monitor, &stale, frozen_by("Dana"));
        assert!(!page.element(button).unwrap().disabled);
        assert!(matches!(monitor.state(), MonitorState::Checking { .. }));

        complete(&mut monitor, &current, Ok(ServiceFreezeStatus::not_frozen()));
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_changelog_title_is_exempt() {
        let (page, button) = pr_page(PR_7, "Release changelog for v2");
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, frozen_by("Dana"));

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert_eq!(page.active_observers(), 0);
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_changelog_url_is_exempt() {
        let (page, button) = pr_page(&format!("{}/overview", PR_7), "Fix rounding bug");
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(
            &mut monitor,
            &request,
            Ok(ServiceFreezeStatus::frozen(ServiceMetadata {
                changelog_url: Some(PR_7.into()),
                ..ServiceMetadata::default()
            })),
        );

        assert!(!page.element(button).unwrap().disabled);
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_gating_waits_for_title() {
        let page = MemoryPage::new(PR_7);
        let button = page.append("button", "Merge", &[]);
        let mut monitor = monitor(&page);
        let request = monitor.handle(Action::Bootstrap).unwrap();
        complete(&mut monitor, &request, frozen_by("Dana"));

        // No heading yet: bypass undetermined, nothing gated
        assert!(!page.element(button).unwrap().disabled);
        assert!(!monitor.session().unwrap().bypass_resolved);

        page.append("h1", "Fix rounding bug", &[]);
        monitor.handle(Action::DomMutated);
        assert!(monitor.session().unwrap().bypass_resolved);
        assert!(page.element(button).unwrap().disabled);
    }

    #[test]
    fn test_recheck_with_unchanged_freeze_keeps_session() {
        let (page, button, mut monitor) = frozen_pr_7();
        let session = monitor.session().unwrap().id;

        let request = monitor.handle(Action::RecheckTick).unwrap();
        // Still gating while the re-check is in flight
        assert_eq!(monitor.session().unwrap().id, session);
        complete(&mut monitor, &request, frozen_by("Dana"));

        assert_eq!(monitor.session().unwrap().id, session);
        assert!(page.element(button).unwrap().disabled);
        assert_eq!(page.notifications_shown(), 1);
        assert_eq!(page.active_observers(), 1);
    }

    #[test]
    fn test_recheck_with_changed_freeze_rebuilds_session() {
        let (page, button, mut monitor) = frozen_pr_7();
        let session = monitor.session().unwrap().id;

        let request = monitor.handle(Action::RecheckTick).unwrap();
        complete(&mut monitor, &request, frozen_by("Sam"));

        assert_ne!(monitor.session().unwrap().id, session);
        let element = page.element(button).unwrap();
        assert!(element.disabled);
        assert_eq!(element.overlays, 1);
        assert!(element.tooltip.unwrap().contains("Sam"));
        assert_eq!(page.notifications_shown(), 2);
        assert_eq!(page.active_observers(), 1);
    }

    #[test]
    fn test_recheck_unfreeze_releases_control() {
        let (page, button, mut monitor) = frozen_pr_7();

        let request = monitor.handle(Action::RecheckTick).unwrap();
        complete(&mut monitor, &request, Ok(ServiceFreezeStatus::not_frozen()));

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert_eq!(page.active_observers(), 0);
    }

    #[test]
    fn test_recheck_failure_fails_safe() {
        let (page, button, mut monitor) = frozen_pr_7();

        let request = monitor.handle(Action::RecheckTick).unwrap();
        complete(
            &mut monitor,
            &request,
            Err(OracleError::Unavailable("channel closed".into())),
        );

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert!(matches!(monitor.state(), MonitorState::Idle));
    }

    #[test]
    fn test_shutdown_tears_down_twice_safely() {
        let (page, button, mut monitor) = frozen_pr_7();

        monitor.handle(Action::Shutdown);
        monitor.handle(Action::Shutdown);

        assert!(!page.element(button).unwrap().disabled);
        assert!(page.notification().is_none());
        assert_eq!(page.active_observers(), 0);
    }
}
