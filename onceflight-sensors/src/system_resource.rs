// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sensor reading system-resource files (sysfs, procfs) by pattern.

use crate::convert::Converter;
use onceflight_core::{Measurement, Result, Sensor, SensorError};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reads one or more system files, extracts a raw value from each with a
/// regex capture group and converts it through a named [`Converter`].
///
/// One measurement is a JSON object with a slot per configured file, keyed
/// `<name>_<index>`. A file that cannot be read, matched or converted
/// yields JSON `null` for its slot (and a warning); the measurement as a
/// whole still succeeds, so one dead thermal zone does not blind the
/// remaining ones.
#[derive(Debug)]
pub struct SystemResourceSensor {
    name: String,
    files: Vec<PathBuf>,
    pattern: String,
    converter: Converter,
    regex: Option<Regex>,
}

impl SystemResourceSensor {
    /// Construct an unconfigured sensor. [`setup`](Sensor::setup) compiles
    /// the pattern and must run before any read.
    pub fn new(
        name: impl Into<String>,
        files: Vec<PathBuf>,
        pattern: impl Into<String>,
        converter: Converter,
    ) -> Self {
        Self {
            name: name.into(),
            files,
            pattern: pattern.into(),
            converter,
            regex: None,
        }
    }

    fn read_file(&self, file: &Path) -> Result<Value> {
        let regex = self
            .regex
            .as_ref()
            .ok_or_else(|| SensorError::setup(&self.name, "setup has not been run"))?;

        let raw = std::fs::read_to_string(file)
            .map_err(|e| SensorError::acquisition(&self.name, format!("{}: {e}", file.display())))?;

        let extracted = regex
            .captures(&raw)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| {
                SensorError::acquisition(
                    &self.name,
                    format!("{}: pattern matched nothing", file.display()),
                )
            })?;

        self.converter.apply(extracted.as_str())
    }
}

impl Sensor for SystemResourceSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self) -> Result<()> {
        self.converter.check()?;

        let regex = Regex::new(&self.pattern).map_err(|e| SensorError::setup(&self.name, e))?;
        if regex.captures_len() < 2 {
            return Err(SensorError::setup(
                &self.name,
                "pattern must contain one capture group",
            ));
        }

        self.regex = Some(regex);
        Ok(())
    }

    fn get_data(&self) -> Result<Measurement> {
        let mut data = Map::new();

        for (index, file) in self.files.iter().enumerate() {
            let value = match self.read_file(file) {
                Ok(value) => value,
                Err(error) => {
                    warn!(
                        sensor = %self.name,
                        file = %file.display(),
                        %error,
                        "resource read failed",
                    );
                    Value::Null
                }
            };
            data.insert(format!("{}_{index}", self.name), value);
        }

        let payload = serde_json::to_vec(&Value::Object(data))
            .map_err(|e| SensorError::acquisition(&self.name, e))?;
        Ok(Measurement::from(payload))
    }

    /// Well-formed means every configured file currently yields a value.
    /// Stricter than the default non-empty check: a sensor whose every slot
    /// is `null` at validation time is not worth reading.
    fn test_sensor(&self) -> Result<bool> {
        if self.files.is_empty() {
            return Ok(false);
        }
        Ok(self.files.iter().all(|file| self.read_file(file).is_ok()))
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
