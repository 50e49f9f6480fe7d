//! Response assembly from copied diagnostic state
//!
//! [`SnapshotBuilder`] owns scratch tables sized at construction. Copying
//! the shared state into them under the lock never allocates; responses are
//! built from the copy once the lock is released.

use super::{ChatterAlert, KeyStatus, LineStatus, SnapshotResponse};
use crate::diagnostics::{
    summarize_lines, DiagnosticState, KeyEvent, KeyStat, LineActivity, MonitoringState,
};
use crate::matrix::LineMapper;

/// Reusable copy of the shared state
#[derive(Debug)]
pub struct SnapshotBuilder {
    keys: Vec<KeyStat>,
    lines: Vec<LineActivity>,
    events: Vec<KeyEvent>,
    monitoring: Option<MonitoringState>,
    total_events: u64,
    overflow: bool,
}

impl SnapshotBuilder {
    pub fn new(mapper: &LineMapper, event_capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(mapper.key_count()),
            lines: Vec::with_capacity(mapper.line_count()),
            events: Vec::with_capacity(event_capacity),
            monitoring: None,
            total_events: 0,
            overflow: false,
        }
    }

    /// Copy statistics and counters. Call with the state lock held.
    pub fn capture_stats(&mut self, state: &DiagnosticState) {
        self.keys.clear();
        self.keys.extend_from_slice(state.stats.keys());
        self.lines.clear();
        self.lines.extend_from_slice(state.stats.lines());
        self.capture_counters(state);
    }

    /// Copy up to `max_count` recent events. Call with the state lock held.
    pub fn capture_events(&mut self, state: &DiagnosticState, max_count: usize) {
        self.events.clear();
        let limit = max_count.min(self.events.capacity());
        state.events.copy_recent_into(&mut self.events, limit);
        self.capture_counters(state);
    }

    fn capture_counters(&mut self, state: &DiagnosticState) {
        self.monitoring = Some(state.monitoring);
        self.total_events = state.total_events;
        self.overflow = state.events.overflowed();
    }

    pub fn monitoring(&self) -> Option<MonitoringState> {
        self.monitoring
    }

    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Full per-key and per-line dump of the last captured stats
    pub fn snapshot(&self, mapper: &LineMapper) -> SnapshotResponse {
        let monitoring = self.monitoring.unwrap_or(MonitoringState {
            active: false,
            chatter_window_ms: 0,
            chatter_burst_threshold: 0,
        });

        let keys = self
            .keys
            .iter()
            .enumerate()
            .map(|(position, stat)| {
                let pair = mapper.pair_for(position);
                KeyStatus {
                    position,
                    pressed: stat.pressed,
                    press_count: stat.press_count,
                    release_count: stat.release_count,
                    chatter_count: stat.chatter_count,
                    last_change_ms: stat.last_change_ms,
                    never_seen: stat.never_seen,
                    line_drive: pair.map(|p| p.drive as u32),
                    line_sense: pair.map(|p| p.sense as u32),
                    shape: mapper.shape(position),
                }
            })
            .collect();

        let lines = summarize_lines(mapper, &self.keys, &self.lines)
            .into_iter()
            .map(|health| {
                let (port, pin) = mapper
                    .line(health.index)
                    .map_or((String::new(), 0), |l| (l.port.clone(), l.pin));
                LineStatus {
                    index: health.index as u32,
                    port,
                    pin,
                    activity: health.activity,
                    involved_keys: health.involved_keys,
                    chatter_keys: health.chatter_keys,
                    missing_keys: health.missing_keys,
                    suspected_fault: health.suspected_fault(),
                }
            })
            .collect();

        SnapshotResponse {
            matrix_kind: mapper.kind(),
            keys,
            lines,
            chatter_window_ms: monitoring.chatter_window_ms,
            chatter_burst_threshold: monitoring.chatter_burst_threshold,
            monitoring_active: monitoring.active,
            total_events: self.total_events,
        }
    }

    /// Keys with at least one chattering episode in the last captured stats
    pub fn chatter_alerts(&self) -> Vec<ChatterAlert> {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, stat)| stat.is_chattering())
            .map(|(position, stat)| ChatterAlert {
                position,
                event_count: stat.event_count(),
                chatter_count: stat.chatter_count,
                first_event_ms: stat.first_change_ms.unwrap_or(stat.last_change_ms),
                last_event_ms: stat.last_change_ms,
                min_interval_ms: stat.min_interval_ms,
            })
            .collect()
    }
}
