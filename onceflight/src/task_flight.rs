// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-flight coordinator for the cooperative task scheduling model.

use crate::round::Round;
use event_listener::Event;
use futures::lock::Mutex as FutureMutex;
use onceflight_core::{Measurement, Result, Sensor, SensorError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Coalesces concurrent task reads of one sensor into single flights.
///
/// Cooperative counterpart of [`ThreadFlight`](crate::ThreadFlight): any
/// number of tasks may call [`coalesced_read`] on clones of one instance
/// (cloning shares the round state). The suspension points are acquiring
/// the cooperative round lock, awaiting the offloaded acquisition and
/// awaiting the publish notification — none of them blocks the scheduler
/// thread, because the physical `get_data` call is dispatched to a blocking
/// worker via `tokio::task::spawn_blocking`.
///
/// The acquisition itself runs in a round task spawned onto the runtime, so
/// the caller that opened the round is cancellable exactly like any waiter:
/// dropping a caller's future detaches it without disturbing the round, and
/// the round still publishes for the remaining waiters.
///
/// [`coalesced_read`]: TaskFlight::coalesced_read
#[derive(Debug)]
pub struct TaskFlight<S: Sensor + 'static> {
    shared: Arc<Shared<S>>,
}

#[derive(Debug)]
struct Shared<S> {
    sensor: Arc<S>,
    round: FutureMutex<Round>,
    published: Event,
}

impl<S: Sensor + 'static> TaskFlight<S> {
    /// Wrap an already-validated sensor.
    pub fn new(sensor: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                sensor: Arc::new(sensor),
                round: FutureMutex::new(Round::default()),
                published: Event::new(),
            }),
        }
    }

    /// Access the wrapped sensor.
    pub fn sensor(&self) -> &S {
        &self.shared.sensor
    }

    /// Get the current measurement, coalescing concurrent callers.
    ///
    /// The first task to find no round in flight marks the round open and
    /// spawns its acquisition; every task that arrives before the outcome
    /// is published — the opener included — suspends until the round
    /// closes and receives the same result. A failed acquisition closes
    /// the round too and is handed to every caller as the same error.
    ///
    /// # Cancellation
    ///
    /// Dropping this future mid-wait only drops its event listener. Other
    /// callers of the round are unaffected, and an in-flight acquisition
    /// runs to completion on its worker and still publishes.
    ///
    /// # Errors
    ///
    /// [`SensorError::Acquisition`] when the round's physical read failed
    /// or its blocking worker panicked.
    pub async fn coalesced_read(&self) -> Result<Measurement> {
        let joined_epoch = {
            let mut round = self.shared.round.lock().await;
            let joined_epoch = round.joined_epoch();
            if round.try_open() {
                self.spawn_round();
            }
            joined_epoch
        };

        self.wait_for_publish(joined_epoch).await
    }

    /// Acquire one measurement and persist it under `base_path`, offloaded
    /// so the scheduler is not blocked. Best-effort; see
    /// [`Sensor::dump_file`].
    pub async fn dump_file(&self, base_path: impl Into<PathBuf>) {
        let sensor = self.shared.sensor.clone();
        let base_path = base_path.into();

        let dump = tokio::task::spawn_blocking(move || sensor.dump_file(&base_path));
        if let Err(error) = dump.await {
            warn!(%error, "dump worker failed");
        }
    }

    /// Spawn the round task: offload the blocking acquisition, then publish
    /// under the round lock and wake every listener.
    ///
    /// Runs detached from the opening caller so cancelling that caller
    /// cannot leave the round permanently open.
    fn spawn_round(&self) {
        let shared = self.shared.clone();

        tokio::spawn(async move {
            debug!(sensor = shared.sensor.name(), "round opened");

            let sensor = shared.sensor.clone();
            let outcome = match tokio::task::spawn_blocking(move || sensor.get_data()).await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(SensorError::acquisition(
                    shared.sensor.name(),
                    format!("acquisition worker failed: {join_error}"),
                )),
            };

            let ok = outcome.is_ok();
            let mut round = shared.round.lock().await;
            round.publish(outcome);
            drop(round);
            shared.published.notify(usize::MAX);

            debug!(sensor = shared.sensor.name(), ok, "round closed");
        });
    }

    /// Waiter path. The listener is registered *before* the final state
    /// check, so a publish landing between the check and the suspension
    /// still wakes this task; after every wakeup the joined epoch is
    /// re-checked, so a wakeup meant for a different condition is re-slept.
    async fn wait_for_publish(&self, joined_epoch: u64) -> Result<Measurement> {
        loop {
            let listener = self.shared.published.listen();

            {
                let round = self.shared.round.lock().await;
                if round.closed_since(joined_epoch) {
                    return round.latest(self.shared.sensor.name());
                }
            }

            listener.await;
        }
    }
}

impl<S: Sensor + 'static> Clone for TaskFlight<S> {
    /// Clones share the sensor and the round state.
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}
