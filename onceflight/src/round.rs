// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scheduler-agnostic round state shared by both coordinator drivers.
//!
//! A *round* is one coalesced acquisition cycle. The drivers differ only in
//! which mutual-exclusion and notification primitives guard this state; the
//! open → publish → reset lifecycle lives here so the two cannot drift
//! apart.

use onceflight_core::{Measurement, Result, SensorError};
use tracing::error;

/// Round state. Must only ever be touched under the owning driver's lock.
#[derive(Debug, Default)]
pub(crate) struct Round {
    /// Reader flag: a round is currently in flight.
    in_flight: bool,
    /// Count of closed rounds. Waiters compare against the value they saw
    /// when joining, so a wakeup belonging to a different condition is
    /// re-slept instead of returning a stale or missing outcome.
    epoch: u64,
    /// Most recently published outcome, overwritten each round.
    outcome: Option<Result<Measurement>>,
}

impl Round {
    /// Test-and-set the reader flag. Returns `true` when the caller has
    /// become this round's reader.
    pub(crate) fn try_open(&mut self) -> bool {
        if self.in_flight {
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Epoch a joining caller should remember.
    pub(crate) fn joined_epoch(&self) -> u64 {
        self.epoch
    }

    /// Publish the reader's outcome and close the round.
    ///
    /// The reader flag resets here, on the success and the failure path
    /// alike; a failing reader must never leave the round open.
    pub(crate) fn publish(&mut self, outcome: Result<Measurement>) {
        self.outcome = Some(outcome);
        self.epoch = self.epoch.wrapping_add(1);
        self.in_flight = false;
    }

    /// Whether at least one round has closed since `joined_epoch`.
    pub(crate) fn closed_since(&self, joined_epoch: u64) -> bool {
        self.epoch != joined_epoch
    }

    /// Outcome for a waiter that has observed its round close.
    pub(crate) fn latest(&self, sensor: &str) -> Result<Measurement> {
        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => {
                // Unreachable via the drivers: closed_since implies publish.
                error!(sensor, "round closed without a published outcome");
                Err(SensorError::acquisition(
                    sensor,
                    "round closed without a published outcome",
                ))
            }
        }
    }
}
