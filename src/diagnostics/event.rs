//! Raw key transition events

use crate::matrix::KeyPosition;
use serde::{Deserialize, Serialize};

/// One key transition as reported by the scan driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// Logical key position
    pub position: KeyPosition,
    /// `true` for press, `false` for release
    pub pressed: bool,
    /// Driver uptime in milliseconds
    pub timestamp_ms: u64,
}

impl KeyEvent {
    pub fn new(position: KeyPosition, pressed: bool, timestamp_ms: u64) -> Self {
        Self {
            position,
            pressed,
            timestamp_ms,
        }
    }

    pub fn press(position: KeyPosition, timestamp_ms: u64) -> Self {
        Self::new(position, true, timestamp_ms)
    }

    pub fn release(position: KeyPosition, timestamp_ms: u64) -> Self {
        Self::new(position, false, timestamp_ms)
    }
}
