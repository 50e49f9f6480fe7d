//! Per-key statistics and per-line activity counters

use crate::matrix::{KeyPosition, LinePair};
use crate::utils::MinExt;

/// Statistics for a single key position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStat {
    /// Current contact state
    pub pressed: bool,
    /// Total press transitions
    pub press_count: u32,
    /// Total release transitions
    pub release_count: u32,
    /// Chattering episodes detected
    pub chatter_count: u32,
    /// Timestamp of the latest transition
    pub last_change_ms: u64,
    /// Timestamp of the first transition since the last reset
    pub first_change_ms: Option<u64>,
    /// Shortest gap seen between two consecutive transitions
    pub min_interval_ms: Option<u64>,
    /// Start of the open burst window, if any
    pub burst_start_ms: Option<u64>,
    /// Transitions counted in the open burst window
    pub burst_length: u32,
    /// No transition observed since the last reset
    pub never_seen: bool,
}

impl Default for KeyStat {
    fn default() -> Self {
        Self {
            pressed: false,
            press_count: 0,
            release_count: 0,
            chatter_count: 0,
            last_change_ms: 0,
            first_change_ms: None,
            min_interval_ms: None,
            burst_start_ms: None,
            burst_length: 0,
            never_seen: true,
        }
    }
}

impl KeyStat {
    /// Record a press or release at `timestamp_ms`.
    ///
    /// Burst accounting is left to [`ChatterDetector`](super::ChatterDetector).
    pub fn record_transition(&mut self, pressed: bool, timestamp_ms: u64) {
        if self.never_seen {
            self.never_seen = false;
            self.first_change_ms = Some(timestamp_ms);
        } else {
            self.min_interval_ms
                .update_min(timestamp_ms.saturating_sub(self.last_change_ms));
        }

        if pressed {
            self.press_count = self.press_count.saturating_add(1);
        } else {
            self.release_count = self.release_count.saturating_add(1);
        }

        self.pressed = pressed;
        self.last_change_ms = timestamp_ms;
    }

    /// Press plus release transitions
    pub fn event_count(&self) -> u32 {
        self.press_count.saturating_add(self.release_count)
    }

    pub fn is_chattering(&self) -> bool {
        self.chatter_count > 0
    }

    /// Drop chatter accounting, keep press/release history
    pub fn clear_chatter(&mut self) {
        self.chatter_count = 0;
        self.burst_start_ms = None;
        self.burst_length = 0;
    }
}

/// Activity counter for one physical scan line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineActivity {
    /// Events that touched this line
    pub activity_count: u32,
}

/// Fixed-size tables of [`KeyStat`] and [`LineActivity`]
///
/// Both tables are sized once at construction and never grow.
#[derive(Debug, Clone)]
pub struct StatStore {
    keys: Box<[KeyStat]>,
    lines: Box<[LineActivity]>,
}

impl StatStore {
    pub fn new(key_count: usize, line_count: usize) -> Self {
        Self {
            keys: vec![KeyStat::default(); key_count].into_boxed_slice(),
            lines: vec![LineActivity::default(); line_count].into_boxed_slice(),
        }
    }

    pub fn key(&self, position: KeyPosition) -> Option<&KeyStat> {
        self.keys.get(position)
    }

    pub fn key_mut(&mut self, position: KeyPosition) -> Option<&mut KeyStat> {
        self.keys.get_mut(position)
    }

    pub fn keys(&self) -> &[KeyStat] {
        &self.keys
    }

    pub fn lines(&self) -> &[LineActivity] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&LineActivity> {
        self.lines.get(index)
    }

    /// Count one event on both lines of `pair`
    pub fn touch_lines(&mut self, pair: LinePair) {
        for index in pair.lines() {
            if let Some(line) = self.lines.get_mut(index) {
                line.activity_count = line.activity_count.saturating_add(1);
            }
        }
    }

    /// Zero every counter in place
    pub fn reset(&mut self) {
        self.keys.fill(KeyStat::default());
        self.lines.fill(LineActivity::default());
    }

    /// Zero chatter accounting on every key
    pub fn clear_chatter(&mut self) {
        for stat in self.keys.iter_mut() {
            stat.clear_chatter();
        }
    }
}
