// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Concrete sensors and the configuration/discovery collaborator.
//!
//! The sensors here conform to the [`Sensor`] contract and carry no
//! synchronization responsibility; wrap them in a coordinator from the
//! `onceflight` crate when concurrent callers are expected.
//!
//! Configuration is an explicit, enumerated schema: each sensor kind has
//! named, typed fields and raw values pass through a closed set of
//! [`Converter`]s. There is deliberately no way to configure arbitrary
//! expressions.
//!
//! [`Sensor`]: onceflight_core::Sensor

#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod convert;
pub mod system_resource;

pub use self::config::{build_sensors, load_config, Config, SensorSpec};
pub use self::convert::Converter;
pub use self::system_resource::SystemResourceSensor;
