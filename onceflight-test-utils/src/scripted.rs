// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A sensor whose acquisitions follow a pre-written script.

use onceflight_core::{Measurement, Result, Sensor, SensorError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

/// Handle that releases one gated acquisition per [`Gate::open`] call.
pub struct Gate {
    tx: mpsc::Sender<()>,
}

impl Gate {
    /// Allow one pending (or future) acquisition to proceed.
    pub fn open(&self) {
        let _ = self.tx.send(());
    }
}

/// Scripted [`Sensor`] fixture.
///
/// Each `get_data` call consumes the next entry of the script, in order,
/// after sleeping the configured latency and (if gated) waiting for one
/// [`Gate::open`]. An exhausted script fails the acquisition, which makes
/// unexpected extra reads visible as test failures rather than silent
/// repeats.
pub struct ScriptedSensor {
    name: String,
    latency: Duration,
    script: Mutex<VecDeque<Result<Vec<u8>>>>,
    acquisitions: AtomicUsize,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl ScriptedSensor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            acquisitions: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Sleep this long inside every acquisition.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Gate every acquisition on an explicit [`Gate::open`] call.
    ///
    /// An acquisition whose gate is not opened within five seconds fails
    /// instead of hanging the whole test run.
    #[must_use]
    pub fn gated(mut self) -> (Self, Gate) {
        let (tx, rx) = mpsc::channel();
        self.gate = Mutex::new(Some(rx));
        (self, Gate { tx })
    }

    /// Append a successful acquisition to the script.
    #[must_use]
    pub fn push_ok(self, payload: &[u8]) -> Self {
        self.script.lock().push_back(Ok(payload.to_vec()));
        self
    }

    /// Append a failing acquisition to the script.
    #[must_use]
    pub fn push_err(self, context: &str) -> Self {
        let error = SensorError::acquisition(self.name.clone(), context);
        self.script.lock().push_back(Err(error));
        self
    }

    /// How many acquisitions have been performed so far.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl Sensor for ScriptedSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_data(&self) -> Result<Measurement> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);

        {
            let gate = self.gate.lock();
            if let Some(rx) = gate.as_ref() {
                if rx.recv_timeout(Duration::from_secs(5)).is_err() {
                    return Err(SensorError::acquisition(&self.name, "gate never opened"));
                }
            }
        }

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        match self.script.lock().pop_front() {
            Some(Ok(payload)) => Ok(Measurement::from(payload)),
            Some(Err(error)) => Err(error),
            None => Err(SensorError::acquisition(&self.name, "script exhausted")),
        }
    }

    /// Scripted probes never consume a frame; the script belongs to the test.
    fn test_sensor(&self) -> Result<bool> {
        Ok(true)
    }

    fn file_extension(&self) -> &str {
        "bin"
    }
}
