// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filename convention for persisted measurements.

use chrono::{Duration, Utc};

/// Default shift, in hours, added to UTC when stamping dump files.
pub const DEFAULT_DELTA_HOURS: i64 = 1;

/// Build the stem of a dump filename: `data_<name>_<timestamp>`.
///
/// The timestamp is UTC shifted by `delta_hours`, formatted as
/// `%Y%m%d-%H%M%S`. The concrete sensor's file extension is appended by the
/// caller.
///
/// # Example
///
/// ```
/// use onceflight_core::dump_filename;
///
/// let stem = dump_filename("webcam", 1);
/// assert!(stem.starts_with("data_webcam_"));
/// ```
pub fn dump_filename(name: &str, delta_hours: i64) -> String {
    let timestamp = (Utc::now() + Duration::hours(delta_hours)).format("%Y%m%d-%H%M%S");

    format!("data_{name}_{timestamp}")
}
