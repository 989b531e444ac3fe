// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error taxonomy for sensor configuration, acquisition and coalescing.
//!
//! All variants are `Clone`: a coalesced round produces a single outcome
//! that is handed to every caller of that round, so a failed acquisition
//! must be distributable the same way a successful measurement is.

use core::time::Duration;

/// Root error type for all sensor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// Sensor-specific initialization failed.
    ///
    /// A sensor that fails setup is invalid and must not be driven through
    /// a coordinator.
    #[error("sensor '{sensor}' setup failed: {context}")]
    Setup {
        /// Name of the sensor that failed to initialize
        sensor: String,
        /// Description of the initialization failure
        context: String,
    },

    /// A physical acquisition failed.
    ///
    /// Inside a coalesced round this is published as the round's outcome,
    /// so the reader and every waiter observe the same failure.
    #[error("sensor '{sensor}' acquisition failed: {context}")]
    Acquisition {
        /// Name of the sensor whose read failed
        sensor: String,
        /// Description of the acquisition failure
        context: String,
    },

    /// Raw data could not be converted to the configured output format.
    #[error("conversion failed: {context}")]
    Conversion {
        /// Description of the conversion failure
        context: String,
    },

    /// A configuration file or parameter table was rejected.
    #[error("invalid sensor configuration: {context}")]
    InvalidConfig {
        /// Description of the rejected configuration
        context: String,
    },

    /// A waiter's bounded wait elapsed before the round closed.
    ///
    /// Only produced by the thread-model coordinator; the task model relies
    /// on guaranteed notification delivery instead of a timeout.
    #[error("timed out after {waited:?} waiting for the active round to close")]
    WaitTimeout {
        /// How long the waiter blocked before giving up
        waited: Duration,
    },
}

impl SensorError {
    /// Setup failure for `sensor` with a displayable cause.
    pub fn setup(sensor: impl Into<String>, context: impl ToString) -> Self {
        Self::Setup {
            sensor: sensor.into(),
            context: context.to_string(),
        }
    }

    /// Acquisition failure for `sensor` with a displayable cause.
    pub fn acquisition(sensor: impl Into<String>, context: impl ToString) -> Self {
        Self::Acquisition {
            sensor: sensor.into(),
            context: context.to_string(),
        }
    }

    /// Conversion failure with a displayable cause.
    pub fn conversion(context: impl ToString) -> Self {
        Self::Conversion {
            context: context.to_string(),
        }
    }

    /// Configuration rejection with a displayable cause.
    pub fn invalid_config(context: impl ToString) -> Self {
        Self::InvalidConfig {
            context: context.to_string(),
        }
    }
}

/// Result alias used across the onceflight workspace.
pub type Result<T> = core::result::Result<T, SensorError>;
