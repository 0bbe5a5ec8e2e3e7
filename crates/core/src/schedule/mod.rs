//! Scheduled tasks
//!
//! A [`TaskSlot`] owns at most one repeating task. Arming it again replaces
//! the previous task, and cancelling or dropping the slot aborts whatever is
//! running, so a logical concern never ends up with two live timers.

use std::{ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

mod countdown;

pub use countdown::CountdownTicker;

/// Holder for a single repeating task.
#[derive(Debug)]
pub struct TaskSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// An empty slot. `name` only shows up in logs.
    pub const fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Run `tick` every `period`, starting immediately, until it breaks.
    ///
    /// Any task already in the slot is aborted first. Must be called from
    /// within a Tokio runtime.
    pub fn arm_repeating<F>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.cancel();

        let name = self.name;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if tick().is_break() {
                    debug!(task = name, "scheduled task finished");
                    break;
                }
            }
        }));

        debug!(task = name, period_ms = period.as_millis(), "scheduled task armed");
    }

    /// Abort the current task. Returns whether one was still running.
    pub fn cancel(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        let was_running = !handle.is_finished();

        handle.abort();

        if was_running {
            debug!(task = self.name, "scheduled task cancelled");
        }

        was_running
    }

    /// Whether a task is armed and has not finished.
    pub fn is_armed(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
