//! Shared mutable diagnostic state
//!
//! Everything in here lives behind the single lock owned by
//! [`Diagnostics`](super::Diagnostics). Methods never log, block or
//! allocate.

use super::{ChatterDetector, EventBuffer, KeyEvent, StatStore};
use crate::matrix::LineMapper;

/// Monitoring switch and chatter parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitoringState {
    pub active: bool,
    pub chatter_window_ms: u64,
    pub chatter_burst_threshold: u32,
}

impl MonitoringState {
    pub fn detector(&self) -> ChatterDetector {
        ChatterDetector::new(self.chatter_window_ms, self.chatter_burst_threshold)
    }
}

/// What happened to one recorded event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Position outside `[0, key_count)`
    OutOfRange,
    /// Monitoring is stopped
    Inactive,
    /// Event applied to the statistics
    Recorded {
        /// This event completed a chattering episode
        chatter_detected: bool,
    },
}

/// Statistics, event log and monitoring settings
#[derive(Debug, Clone)]
pub struct DiagnosticState {
    pub monitoring: MonitoringState,
    pub stats: StatStore,
    pub events: EventBuffer,
    pub total_events: u64,
}

impl DiagnosticState {
    pub fn new(mapper: &LineMapper, event_capacity: usize, monitoring: MonitoringState) -> Self {
        Self {
            monitoring,
            stats: StatStore::new(mapper.key_count(), mapper.line_count()),
            events: EventBuffer::new(event_capacity),
            total_events: 0,
        }
    }

    /// Apply one event to every table.
    pub fn record(&mut self, mapper: &LineMapper, event: KeyEvent) -> IngestOutcome {
        if !self.monitoring.active {
            return IngestOutcome::Inactive;
        }

        let detector = self.monitoring.detector();
        let Some(stat) = self.stats.key_mut(event.position) else {
            return IngestOutcome::OutOfRange;
        };

        stat.record_transition(event.pressed, event.timestamp_ms);
        let chatter_detected = detector.observe(stat, event.timestamp_ms);

        if let Some(pair) = mapper.pair_for(event.position) {
            self.stats.touch_lines(pair);
        }

        self.events.push(event);
        self.total_events = self.total_events.saturating_add(1);

        IngestOutcome::Recorded { chatter_detected }
    }

    /// Zero key and line counters and the total. The event log survives.
    pub fn reset_counters(&mut self) {
        self.stats.reset();
        self.total_events = 0;
    }

    /// Zero statistics, event log and total. Monitoring settings survive.
    pub fn reset_data(&mut self) {
        self.reset_counters();
        self.events.clear();
    }
}
