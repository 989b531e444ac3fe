// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test fixtures for the onceflight workspace.
//!
//! Designed for use in development and testing only, not for production
//! code. The central fixture is [`ScriptedSensor`]: a [`Sensor`] whose
//! acquisitions follow a pre-written script of payloads and failures, with
//! an optional latency and an optional gate so tests can hold a round open
//! deterministically while callers pile up behind it.
//!
//! [`Sensor`]: onceflight_core::Sensor

pub mod helpers;
pub mod scripted;
pub mod static_sensor;

pub use self::helpers::wait_until;
pub use self::scripted::{Gate, ScriptedSensor};
pub use self::static_sensor::StaticSensor;
