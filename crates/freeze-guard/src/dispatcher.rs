use crate::actions::Action;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Queue feeding actions into the monitor loop
///
/// Clones share the queue, so hosts and spawned queries can dispatch from
/// anywhere while the loop processes actions one at a time.
#[derive(Clone)]
pub struct Dispatcher {
    queue: Arc<Mutex<VecDeque<Action>>>,
    wake: Arc<Notify>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Dispatch an action to be processed
    pub fn dispatch(&self, action: Action) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(action);
        }
        self.wake.notify_one();
    }

    /// Pop a single action from the queue (FIFO)
    pub fn pop(&self) -> Option<Action> {
        if let Ok(mut queue) = self.queue.lock() {
            queue.pop_front()
        } else {
            None
        }
    }

    /// Wait until something is dispatched
    pub async fn wait(&self) {
        self.wake.notified().await;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
