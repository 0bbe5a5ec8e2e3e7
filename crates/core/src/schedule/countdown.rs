//! Countdown ticker

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    availability::{Countdown, Discount},
    clock::Clock,
    schedule::TaskSlot,
};

/// Re-evaluates a discount's countdown once per second.
///
/// Each tick is sent on the returned channel. The ticker stops on its own
/// after sending any state that is not [`Countdown::Remaining`], or after its
/// first tick when the discount has no day windows. It also stops when the
/// receiver is dropped or the ticker itself is stopped or dropped.
#[derive(Debug)]
pub struct CountdownTicker {
    slot: TaskSlot,
}

impl CountdownTicker {
    /// Tick period.
    pub const PERIOD: Duration = Duration::from_secs(1);

    /// Start ticking for `discount`. Must be called from within a Tokio runtime.
    pub fn start(
        discount: Discount,
        clock: Arc<dyn Clock>,
    ) -> (Self, UnboundedReceiver<Countdown>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let restricted = discount.is_restricted();
        let mut slot = TaskSlot::new("countdown");

        slot.arm_repeating(Self::PERIOD, move || {
            let countdown = discount.countdown_at(&clock.now());
            let pending = countdown.is_pending();

            // Unrestricted discounts report once and never tick down.
            if sender.send(countdown).is_err() || !pending || !restricted {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        (Self { slot }, receiver)
    }

    /// Stop ticking.
    pub fn stop(&mut self) {
        self.slot.cancel();
    }

    /// Whether ticks are still being produced.
    pub fn is_running(&self) -> bool {
        self.slot.is_armed()
    }
}
