//! Shared fixtures for diagnostics unit tests

use super::Diagnostics;
use crate::config::EngineConfig;
use crate::matrix::{KeyPosition, LineMapper, Topology};

/// Engine over a charlieplex of `lines` lines, monitoring stopped.
pub fn engine(lines: usize) -> Diagnostics {
    Diagnostics::new(
        LineMapper::new(&Topology::charlieplex(lines)),
        &EngineConfig::default(),
    )
}

/// Engine over a charlieplex of `lines` lines, already monitoring.
pub fn active_engine(lines: usize) -> Diagnostics {
    active_engine_with_capacity(lines, EngineConfig::default().event_buffer_capacity)
}

/// Engine with a custom event buffer size, already monitoring.
pub fn active_engine_with_capacity(lines: usize, capacity: usize) -> Diagnostics {
    Diagnostics::new(
        LineMapper::new(&Topology::charlieplex(lines)),
        &EngineConfig {
            start_active: true,
            event_buffer_capacity: capacity,
            ..EngineConfig::default()
        },
    )
}

/// Press then release `position`, 100 ms apart, starting at `at_ms`.
pub fn tap(engine: &Diagnostics, position: KeyPosition, at_ms: u64) {
    engine.record_event(position, true, at_ms);
    engine.record_event(position, false, at_ms + 100);
}
