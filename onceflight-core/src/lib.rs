// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the onceflight workspace: the [`Sensor`] contract, the
//! [`Measurement`] payload and the [`SensorError`] taxonomy.
//!
//! This crate carries no concurrency logic. Coalescing lives in the
//! `onceflight` crate; concrete sensors live in `onceflight-sensors`. The
//! contract here is the narrow seam both sides agree on: a sensor knows how
//! to produce exactly one measurement, and everything about *who* asked for
//! it is somebody else's problem.

#![allow(clippy::multiple_crate_versions)]

pub mod error;
pub mod filename;
pub mod measurement;
pub mod sensor;

pub use self::error::{Result, SensorError};
pub use self::filename::{dump_filename, DEFAULT_DELTA_HOURS};
pub use self::measurement::Measurement;
pub use self::sensor::{validate, Sensor};
