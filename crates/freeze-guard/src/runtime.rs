//! Monitor event loop
//!
//! Runs the [`FreezeMonitor`] on one task: actions are handled strictly one at
//! a time, freeze queries run as spawned tasks whose answers are dispatched
//! back into the queue, and a fixed-period timer dispatches re-checks.

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::monitor::{CheckRequest, FreezeMonitor};
use crate::oracle::FreezeOracle;
use crate::page::Page;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct MonitorRuntime<P, O> {
    monitor: FreezeMonitor<P>,
    oracle: Arc<O>,
    dispatcher: Dispatcher,
    recheck_interval: Duration,
}

impl<P, O> MonitorRuntime<P, O>
where
    P: Page,
    O: FreezeOracle + 'static,
{
    pub fn new(monitor: FreezeMonitor<P>, oracle: O, recheck_interval: Duration) -> Self {
        Self {
            monitor,
            oracle: Arc::new(oracle),
            dispatcher: Dispatcher::new(),
            recheck_interval,
        }
    }

    /// Handle for hosts to push navigation and mutation events
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Run until [`Action::Shutdown`] is dispatched; returns the monitor
    pub async fn run(mut self) -> FreezeMonitor<P> {
        log::info!(
            "MonitorRuntime: starting (re-check every {:?})",
            self.recheck_interval
        );
        self.dispatcher.dispatch(Action::Bootstrap);

        let mut recheck = time::interval_at(
            Instant::now() + self.recheck_interval,
            self.recheck_interval,
        );
        recheck.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            while let Some(action) = self.dispatcher.pop() {
                let shutdown = matches!(action, Action::Shutdown);
                if let Some(request) = self.monitor.handle(action) {
                    self.spawn_check(request);
                }
                if shutdown {
                    log::info!("MonitorRuntime: stopped");
                    return self.monitor;
                }
            }

            tokio::select! {
                _ = recheck.tick() => self.dispatcher.dispatch(Action::RecheckTick),
                _ = self.dispatcher.wait() => {}
            }
        }
    }

    fn spawn_check(&self, request: CheckRequest) {
        let oracle = Arc::clone(&self.oracle);
        let dispatcher = self.dispatcher.clone();

        tokio::spawn(async move {
            let result = oracle
                .query(&request.target.service_name, &request.api_key)
                .await;
            if let Err(e) = &result {
                log::debug!("MonitorRuntime: query for {} failed: {}", request.target, e);
            }
            dispatcher.dispatch(Action::FreezeStatusLoaded {
                generation: request.generation,
                target: request.target,
                result,
            });
        });
    }
}
