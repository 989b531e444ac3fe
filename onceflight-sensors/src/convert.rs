// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Closed set of conversions from an extracted raw string to a JSON value.

use onceflight_core::{Result, SensorError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named conversion applied to the raw value a sensor extracted.
///
/// The set is deliberately closed: a config file can pick a conversion by
/// name but can never inject code. `IntegerScaled` covers the common sysfs
/// idiom of fixed-point integers (e.g. millidegrees scaled by 1000 into
/// degrees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Converter {
    /// Pass the raw string through unchanged.
    Raw,
    /// Parse as a signed integer.
    Integer,
    /// Parse as a signed integer, then divide by `divisor`.
    IntegerScaled {
        /// Fixed-point scale; must be non-zero.
        divisor: i64,
    },
    /// Parse as a floating-point number.
    Float,
}

impl Default for Converter {
    fn default() -> Self {
        Self::Raw
    }
}

impl Converter {
    /// Reject configurations that could never convert anything.
    pub fn check(&self) -> Result<()> {
        match self {
            Self::IntegerScaled { divisor: 0 } => Err(SensorError::invalid_config(
                "integer_scaled divisor must be non-zero",
            )),
            _ => Ok(()),
        }
    }

    /// Apply the conversion to one extracted raw string.
    pub fn apply(&self, raw: &str) -> Result<Value> {
        let raw = raw.trim();

        match self {
            Self::Raw => Ok(Value::from(raw)),
            Self::Integer => {
                let value: i64 = raw
                    .parse()
                    .map_err(|e| SensorError::conversion(format!("'{raw}' as integer: {e}")))?;
                Ok(Value::from(value))
            }
            Self::IntegerScaled { divisor } => {
                let value: i64 = raw
                    .parse()
                    .map_err(|e| SensorError::conversion(format!("'{raw}' as integer: {e}")))?;
                Ok(Value::from(value as f64 / *divisor as f64))
            }
            Self::Float => {
                let value: f64 = raw
                    .parse()
                    .map_err(|e| SensorError::conversion(format!("'{raw}' as float: {e}")))?;
                Ok(Value::from(value))
            }
        }
    }
}
