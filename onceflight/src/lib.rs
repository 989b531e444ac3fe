// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-flight read coordination for slow shared sensors.
//!
//! Many independent callers may want "the current measurement" from one
//! possibly slow sensor. Coalescing collapses all callers that arrive while
//! an acquisition is in flight into a single physical read: exactly one
//! caller (the *reader*) drives [`Sensor::get_data`], every other caller of
//! that *round* (the *waiters*) blocks until the reader publishes, and all
//! of them receive the same [`Measurement`].
//!
//! Two drivers share one round-state description:
//!
//! - [`ThreadFlight`] — for a pool of parallel worker threads. The round
//!   state sits behind a `parking_lot` mutex/condvar pair and waiters use a
//!   bounded wait.
//! - [`TaskFlight`] — for cooperatively scheduled tasks. The round state
//!   sits behind a cooperative mutex, waiters suspend on an
//!   `event_listener::Event`, and the blocking acquisition is offloaded to
//!   a worker via `tokio::task::spawn_blocking` so the scheduler thread is
//!   never stalled.
//!
//! Both uphold the same invariants: at most one reader per coordinator at
//! any instant, every caller that joined a round observes that round's
//! outcome, and a failing reader still closes the round (the failure is
//! published to the waiters rather than leaving them behind or feeding
//! them stale data).
//!
//! # Example
//!
//! ```
//! use onceflight::{Measurement, Result, Sensor, TaskFlight};
//!
//! struct Probe;
//!
//! impl Sensor for Probe {
//!     fn name(&self) -> &str {
//!         "probe"
//!     }
//!
//!     fn setup(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn get_data(&self) -> Result<Measurement> {
//!         Ok(Measurement::from(b"frame-1".to_vec()))
//!     }
//!
//!     fn file_extension(&self) -> &str {
//!         "bin"
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let flight = TaskFlight::new(Probe);
//!
//! let a = flight.clone();
//! let b = flight.clone();
//! let (left, right) = tokio::join!(a.coalesced_read(), b.coalesced_read());
//!
//! assert_eq!(left?.as_bytes(), right?.as_bytes());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

mod round;
pub mod task_flight;
pub mod thread_flight;

pub use self::task_flight::TaskFlight;
pub use self::thread_flight::{ThreadFlight, DEFAULT_WAIT_TIMEOUT};

pub use onceflight_core::{Measurement, Result, Sensor, SensorError};
