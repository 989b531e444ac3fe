// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration/discovery collaborator: TOML file → validated sensors.
//!
//! Example config:
//!
//! ```toml
//! [sensors.cpu_temp]
//! kind = "system_resource"
//! files = ["/sys/class/thermal/thermal_zone0/temp"]
//! pattern = "(\\d+)"
//! converter = { type = "integer_scaled", divisor = 1000 }
//! ```
//!
//! Sensors failing validation are excluded from the result with a warning,
//! never fatal to the process. Coordinators only ever receive sensors that
//! survived this step.

use crate::convert::Converter;
use crate::system_resource::SystemResourceSensor;
use onceflight_core::{validate, Result, SensorError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Whole configuration file: sensor name → parameter table.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensors: BTreeMap<String, SensorSpec>,
}

/// Typed parameter table for one sensor, discriminated by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorSpec {
    SystemResource {
        files: Vec<PathBuf>,
        pattern: String,
        #[serde(default)]
        converter: Converter,
    },
}

impl SensorSpec {
    fn build(self, name: &str) -> SystemResourceSensor {
        match self {
            Self::SystemResource {
                files,
                pattern,
                converter,
            } => SystemResourceSensor::new(name, files, pattern, converter),
        }
    }
}

/// Read and parse a TOML configuration file.
///
/// # Errors
///
/// [`SensorError::InvalidConfig`] when the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SensorError::invalid_config(format!("{}: {e}", path.display())))?;

    toml::from_str(&text).map_err(SensorError::invalid_config)
}

/// Construct, set up and probe every configured sensor.
///
/// Returns the sensors whose `setup` and `test_sensor` both passed, in
/// config order. Failures mark the sensor invalid and exclude it with a
/// warning; a misconfigured sensor is never fatal to the process.
pub fn build_sensors(config: Config) -> Vec<SystemResourceSensor> {
    let mut sensors = Vec::new();

    for (name, spec) in config.sensors {
        let mut sensor = spec.build(&name);

        match validate(&mut sensor) {
            Ok(true) => {
                info!(sensor = %name, "sensor configured");
                sensors.push(sensor);
            }
            Ok(false) => {
                warn!(sensor = %name, "sensor produced no valid data, excluded");
            }
            Err(error) => {
                warn!(sensor = %name, %error, "sensor configuration failed, excluded");
            }
        }
    }

    sensors
}
