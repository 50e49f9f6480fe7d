//! Diagnostics context: the line map plus the lock-guarded state
//!
//! The producer (scan driver) calls [`Diagnostics::record_event`]; the
//! consumer (request handling) reads through [`Diagnostics::with_state`].
//! Both hold the lock only for the copy or update itself; all logging
//! happens after the guard is dropped.

use super::{DiagnosticState, IngestOutcome, KeyEvent, MonitoringState};
use crate::config::{Config, EngineConfig};
use crate::matrix::{KeyPosition, LineMapper};
use log::{info, trace, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Diagnostics engine shared between the event producer and the query side
#[derive(Debug)]
pub struct Diagnostics {
    mapper: LineMapper,
    defaults: EngineConfig,
    state: Mutex<DiagnosticState>,
}

impl Diagnostics {
    pub fn new(mapper: LineMapper, engine: &EngineConfig) -> Self {
        let monitoring = MonitoringState {
            active: engine.start_active,
            chatter_window_ms: engine.chatter_window_ms,
            // A zero threshold would flag every transition
            chatter_burst_threshold: engine.chatter_burst_threshold.max(1),
        };
        let state = DiagnosticState::new(&mapper, engine.event_buffer_capacity, monitoring);

        info!(
            "Keyscan diagnostics initialized: {} matrix, {} lines, {} keys",
            mapper.kind().name(),
            mapper.line_count(),
            mapper.key_count()
        );

        Self {
            mapper,
            defaults: engine.clone(),
            state: Mutex::new(state),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mapper = LineMapper::new(&config.topology.topology());
        Self::new(mapper, &config.engine)
    }

    pub fn mapper(&self) -> &LineMapper {
        &self.mapper
    }

    /// Configured defaults the engine was built with
    pub fn defaults(&self) -> &EngineConfig {
        &self.defaults
    }

    pub fn event_capacity(&self) -> usize {
        self.defaults.event_buffer_capacity
    }

    fn lock(&self) -> MutexGuard<'_, DiagnosticState> {
        // State is plain counters; a panicked holder cannot leave it torn
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the state.
    ///
    /// `f` must not log, block or allocate.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut DiagnosticState) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Record one key transition from the scan driver.
    ///
    /// Never fails: out-of-range positions and events arriving while
    /// monitoring is stopped are dropped.
    pub fn record_event(
        &self,
        position: KeyPosition,
        pressed: bool,
        timestamp_ms: u64,
    ) -> IngestOutcome {
        if !self.mapper.contains(position) {
            trace!("Dropping event for unknown position {}", position);
            return IngestOutcome::OutOfRange;
        }

        let event = KeyEvent::new(position, pressed, timestamp_ms);
        let outcome = self.with_state(|state| state.record(&self.mapper, event));

        if let IngestOutcome::Recorded {
            chatter_detected: true,
        } = outcome
        {
            warn!("Chatter detected on position {}", position);
        }
        outcome
    }

    /// Start monitoring and reset all collected data.
    ///
    /// A non-zero `chatter_window_ms` overrides the window; zero restores the
    /// configured default.
    pub fn start(&self, chatter_window_ms: u32) -> MonitoringState {
        let window = if chatter_window_ms > 0 {
            u64::from(chatter_window_ms)
        } else {
            self.defaults.chatter_window_ms
        };

        let monitoring = self.with_state(|state| {
            state.monitoring.active = true;
            state.monitoring.chatter_window_ms = window;
            state.reset_data();
            state.monitoring
        });

        info!(
            "Keyscan diagnostics monitoring started (chatter window: {} ms, burst: {})",
            monitoring.chatter_window_ms, monitoring.chatter_burst_threshold
        );
        monitoring
    }

    pub fn stop(&self) {
        self.with_state(|state| state.monitoring.active = false);
        info!("Keyscan diagnostics monitoring stopped");
    }

    /// Zero all statistics and the event log. Topology and monitoring
    /// settings are kept.
    pub fn clear(&self) {
        self.with_state(DiagnosticState::reset_data);
        info!("Keyscan diagnostics data cleared");
    }

    pub fn monitoring(&self) -> MonitoringState {
        self.with_state(|state| state.monitoring)
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring().active
    }

    pub fn total_events(&self) -> u64 {
        self.with_state(|state| state.total_events)
    }
}
