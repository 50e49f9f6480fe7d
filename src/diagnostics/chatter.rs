//! Burst-window chatter detection
//!
//! A run of `burst_threshold` transitions on one key inside `window_ms`
//! counts as a single chattering episode. After an episode the burst
//! restarts at the triggering event, so the next episode needs a full new
//! run of transitions.

use super::KeyStat;

/// Burst-window chatter detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatterDetector {
    /// Burst window length in milliseconds
    pub window_ms: u64,
    /// Transitions within one window that make an episode
    pub burst_threshold: u32,
}

impl ChatterDetector {
    pub fn new(window_ms: u64, burst_threshold: u32) -> Self {
        Self {
            window_ms,
            burst_threshold,
        }
    }

    /// Feed one transition of `stat` into the burst window.
    ///
    /// Returns `true` when this transition completes a chattering episode.
    pub fn observe(&self, stat: &mut KeyStat, timestamp_ms: u64) -> bool {
        let expired = match stat.burst_start_ms {
            None => true,
            Some(start) => timestamp_ms.saturating_sub(start) > self.window_ms,
        };
        if expired {
            stat.burst_start_ms = Some(timestamp_ms);
            stat.burst_length = 0;
        }

        stat.burst_length = stat.burst_length.saturating_add(1);

        if stat.burst_length >= self.burst_threshold {
            stat.chatter_count = stat.chatter_count.saturating_add(1);
            stat.burst_start_ms = Some(timestamp_ms);
            stat.burst_length = 0;
            return true;
        }

        false
    }
}

impl Default for ChatterDetector {
    fn default() -> Self {
        Self::new(30, 3)
    }
}
