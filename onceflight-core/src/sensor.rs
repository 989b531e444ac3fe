// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The lifecycle contract every concrete sensor implements.

use crate::error::Result;
use crate::filename::{dump_filename, DEFAULT_DELTA_HOURS};
use crate::measurement::Measurement;
use std::path::Path;
use tracing::warn;

/// Abstract lifecycle of a measurement source.
///
/// Lifecycle: constructed → [`setup`](Sensor::setup) →
/// [`test_sensor`](Sensor::test_sensor) → usable for repeated reads until
/// process exit. The [`validate`] helper drives the last two steps and is
/// what configuration collaborators use to compute a sensor's validity; a
/// sensor that fails either step must not be handed to a coordinator.
///
/// A sensor owns no concurrency state. [`get_data`](Sensor::get_data)
/// performs exactly one physical acquisition with no internal coalescing;
/// collapsing concurrent requests is the coordinator's job. Implementations
/// must tolerate `get_data` running off the main scheduling thread, because
/// the task-model coordinator dispatches it to a blocking worker.
pub trait Sensor: Send + Sync {
    /// Sensor name for identification. Immutable after construction.
    fn name(&self) -> &str;

    /// Apply sensor-specific initialization (open a device, compile a
    /// pattern). Called once, before any read.
    fn setup(&mut self) -> Result<()>;

    /// Perform exactly one physical acquisition.
    fn get_data(&self) -> Result<Measurement>;

    /// Report whether the sensor produces well-formed data.
    ///
    /// The default implementation performs one acquisition and treats a
    /// non-empty payload as well-formed. Sensors with a cheaper probe may
    /// override this.
    fn test_sensor(&self) -> Result<bool> {
        Ok(!self.get_data()?.is_empty())
    }

    /// File extension (without the dot) for persisted measurements.
    fn file_extension(&self) -> &str;

    /// Acquire one measurement and persist it under
    /// `<base_path>/data_<name>_<timestamp>.<ext>`.
    ///
    /// Best-effort by design: acquisition and write failures are logged and
    /// swallowed. Persistence is independent of the coalesced-read path and
    /// never fails the caller.
    fn dump_file(&self, base_path: &Path) {
        let data = match self.get_data() {
            Ok(data) => data,
            Err(error) => {
                warn!(sensor = self.name(), %error, "dump skipped, acquisition failed");
                return;
            }
        };

        let stem = dump_filename(self.name(), DEFAULT_DELTA_HOURS);
        let path = base_path.join(format!("{stem}.{}", self.file_extension()));

        if let Err(error) = std::fs::write(&path, data.as_bytes()) {
            warn!(
                sensor = self.name(),
                path = %path.display(),
                %error,
                "dump skipped, write failed",
            );
        }
    }
}

/// Run the post-construction lifecycle steps and report validity.
///
/// Returns `Ok(true)` when [`setup`](Sensor::setup) succeeded and
/// [`test_sensor`](Sensor::test_sensor) judged the data well-formed. A
/// `false` or an error marks the sensor invalid; configuration collaborators
/// exclude such sensors instead of aborting the process.
pub fn validate<S: Sensor + ?Sized>(sensor: &mut S) -> Result<bool> {
    sensor.setup()?;
    sensor.test_sensor()
}
