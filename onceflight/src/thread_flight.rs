// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-flight coordinator for the thread scheduling model.

use crate::round::Round;
use onceflight_core::{Measurement, Result, Sensor, SensorError};
use parking_lot::{Condvar, Mutex};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default bound on a waiter's blocking wait.
///
/// The bound exists so a missed notification degrades into an observable
/// [`SensorError::WaitTimeout`] instead of an indefinite block. Pair a
/// slower sensor with [`ThreadFlight::with_wait_timeout`].
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Coalesces concurrent blocking reads of one sensor into single flights.
///
/// Any number of worker threads may call [`coalesced_read`] on a shared
/// (`Arc`-wrapped) instance. The first thread to find no round in flight
/// becomes the reader and performs the physical acquisition with the round
/// lock released; every thread that arrives before the reader publishes
/// becomes a waiter on the condition variable and receives the same
/// outcome. The round state is owned by this instance, so coordinators for
/// different sensors are fully independent.
///
/// [`coalesced_read`]: ThreadFlight::coalesced_read
///
/// # Example
///
/// ```
/// use onceflight::ThreadFlight;
/// use onceflight_test_utils::StaticSensor;
/// use std::sync::Arc;
///
/// let flight = Arc::new(ThreadFlight::new(StaticSensor::new("cam", b"frame-1")));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let flight = flight.clone();
///         std::thread::spawn(move || flight.coalesced_read())
///     })
///     .collect();
///
/// for handle in handles {
///     let measurement = handle.join().unwrap().unwrap();
///     assert_eq!(measurement.as_bytes(), b"frame-1");
/// }
/// ```
#[derive(Debug)]
pub struct ThreadFlight<S: Sensor> {
    sensor: S,
    round: Mutex<Round>,
    published: Condvar,
    wait_timeout: Duration,
}

impl<S: Sensor> ThreadFlight<S> {
    /// Wrap an already-validated sensor.
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            round: Mutex::new(Round::default()),
            published: Condvar::new(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    /// Replace the default bound on a waiter's blocking wait.
    #[must_use]
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Access the wrapped sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Unwrap the coordinator, recovering the sensor.
    pub fn into_sensor(self) -> S {
        self.sensor
    }

    /// Get the current measurement, coalescing concurrent callers.
    ///
    /// Blocks the calling thread: either for the duration of its own
    /// acquisition (reader path) or until the active round's outcome is
    /// published (waiter path). All callers of one round receive the same
    /// result — a failed acquisition is published to the waiters as the
    /// same error the reader propagates.
    ///
    /// # Errors
    ///
    /// [`SensorError::Acquisition`] when the round's physical read failed,
    /// [`SensorError::WaitTimeout`] when a waiter's bounded wait elapsed
    /// before the round closed.
    pub fn coalesced_read(&self) -> Result<Measurement> {
        let joined_epoch = {
            let mut round = self.round.lock();
            if round.try_open() {
                drop(round);
                return self.read_and_publish();
            }
            round.joined_epoch()
        };

        self.wait_for_publish(joined_epoch)
    }

    /// Acquire one measurement and persist it under `base_path`,
    /// independent of any round in flight. Best-effort; see
    /// [`Sensor::dump_file`].
    pub fn dump_file(&self, base_path: &Path) {
        self.sensor.dump_file(base_path);
    }

    /// Reader path. The round lock is not held across `get_data`; holding
    /// it would stop other callers from joining the round.
    fn read_and_publish(&self) -> Result<Measurement> {
        debug!(sensor = self.sensor.name(), "round opened");
        let outcome = self.sensor.get_data();

        let mut round = self.round.lock();
        round.publish(outcome.clone());
        // Broadcast while still holding the lock; a waiter cannot slip
        // between the publish and the notification.
        self.published.notify_all();
        drop(round);

        debug!(
            sensor = self.sensor.name(),
            ok = outcome.is_ok(),
            "round closed"
        );
        outcome
    }

    /// Waiter path: block until the joined round closes or the bound
    /// elapses, re-checking the epoch on every wakeup.
    fn wait_for_publish(&self, joined_epoch: u64) -> Result<Measurement> {
        let deadline = Instant::now() + self.wait_timeout;
        let mut round = self.round.lock();

        while !round.closed_since(joined_epoch) {
            let now = Instant::now();
            if now >= deadline {
                return Err(SensorError::WaitTimeout {
                    waited: self.wait_timeout,
                });
            }
            // Timeouts and spurious wakeups are both handled by the epoch
            // re-check at the top of the loop.
            let _ = self.published.wait_for(&mut round, deadline - now);
        }

        round.latest(self.sensor.name())
    }
}
