// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The opaque payload produced by one physical acquisition.

use std::sync::Arc;

/// One sensor measurement: an immutable, cheaply clonable byte payload.
///
/// The format of the bytes is defined by the concrete sensor (a JPEG frame,
/// a JSON document). Once published into a round, a measurement is shared
/// read-only by the reader and every waiter of that round; cloning only
/// bumps a reference count.
///
/// # Example
///
/// ```
/// use onceflight_core::Measurement;
///
/// let m = Measurement::from(b"frame-1".to_vec());
/// let shared = m.clone();
/// assert_eq!(m.as_bytes(), shared.as_bytes());
/// assert_eq!(m.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    payload: Arc<[u8]>,
}

impl Measurement {
    /// Number of bytes in the payload.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    ///
    /// Empty payloads are what the default [`test_sensor`] check treats as
    /// "not well-formed".
    ///
    /// [`test_sensor`]: crate::Sensor::test_sensor
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Borrow the raw payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }
}

impl From<Vec<u8>> for Measurement {
    fn from(payload: Vec<u8>) -> Self {
        Self {
            payload: Arc::from(payload),
        }
    }
}

impl From<&[u8]> for Measurement {
    fn from(payload: &[u8]) -> Self {
        Self {
            payload: Arc::from(payload),
        }
    }
}

impl From<String> for Measurement {
    fn from(payload: String) -> Self {
        Self::from(payload.into_bytes())
    }
}

impl AsRef<[u8]> for Measurement {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
