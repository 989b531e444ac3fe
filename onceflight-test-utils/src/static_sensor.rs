// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use onceflight_core::{Measurement, Result, Sensor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A sensor that always returns the same payload. Useful for benchmarks and
/// for tests that only care about coordination, not data.
pub struct StaticSensor {
    name: String,
    payload: Vec<u8>,
    latency: Duration,
    reads: AtomicUsize,
}

impl StaticSensor {
    pub fn new(name: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            name: name.into(),
            payload: payload.to_vec(),
            latency: Duration::ZERO,
            reads: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every acquisition.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// How many acquisitions have been performed so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Sensor for StaticSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_data(&self) -> Result<Measurement> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        Ok(Measurement::from(self.payload.clone()))
    }

    fn file_extension(&self) -> &str {
        "bin"
    }
}
