//! Per-line fault heuristic
//!
//! Computed from the key statistics at snapshot time; nothing here is
//! maintained incrementally.

use super::{KeyStat, LineActivity};
use crate::matrix::LineMapper;

/// Health summary of one physical scan line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineHealth {
    pub index: usize,
    /// Events that touched this line
    pub activity: u32,
    /// Keys wired to this line
    pub involved_keys: u32,
    /// Wired keys with at least one chattering episode
    pub chatter_keys: u32,
    /// Wired keys never seen since the last reset
    pub missing_keys: u32,
}

impl LineHealth {
    /// A line that should carry traffic but is silent, or is shared by
    /// chattering or missing keys.
    pub fn suspected_fault(&self) -> bool {
        self.involved_keys > 0
            && (self.activity == 0 || self.chatter_keys > 0 || self.missing_keys > 0)
    }
}

/// Summarize every line of `mapper` from copied key and line tables.
pub fn summarize_lines(
    mapper: &LineMapper,
    keys: &[KeyStat],
    lines: &[LineActivity],
) -> Vec<LineHealth> {
    let mut summary: Vec<LineHealth> = (0..mapper.line_count())
        .map(|index| LineHealth {
            index,
            activity: lines.get(index).map_or(0, |l| l.activity_count),
            ..LineHealth::default()
        })
        .collect();

    for (position, stat) in keys.iter().enumerate() {
        let Some(pair) = mapper.pair_for(position) else {
            continue;
        };
        for line in pair.lines() {
            let Some(entry) = summary.get_mut(line) else {
                continue;
            };
            entry.involved_keys += 1;
            if stat.is_chattering() {
                entry.chatter_keys += 1;
            }
            if stat.never_seen {
                entry.missing_keys += 1;
            }
        }
    }

    summary
}
