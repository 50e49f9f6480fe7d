//! Logical key position to physical line pair mapping
//!
//! Positions are assigned by walking `drive` over `[0, N)` and, for each
//! drive line, `sense` over `[0, N)`. Every valid pair takes the next free
//! position. This order is the identity of every key position in the crate:
//! a 4-line charlieplex yields `0 = (0,1)`, `1 = (0,2)`, `2 = (0,3)`,
//! `3 = (1,0)`, and so on.

use super::{KeyShape, LineInfo, MatrixKind, Topology};
use serde::{Deserialize, Serialize};

/// Logical key identifier in `[0, key_count)`
pub type KeyPosition = usize;

/// Physical lines a key sits between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinePair {
    pub drive: usize,
    pub sense: usize,
}

impl LinePair {
    pub fn new(drive: usize, sense: usize) -> Self {
        Self { drive, sense }
    }

    /// Whether this pair includes `line`
    pub fn touches(&self, line: usize) -> bool {
        self.drive == line || self.sense == line
    }

    pub fn lines(&self) -> [usize; 2] {
        [self.drive, self.sense]
    }
}

/// Immutable position table derived from a [`Topology`]
#[derive(Debug, Clone)]
pub struct LineMapper {
    kind: MatrixKind,
    lines: Vec<LineInfo>,
    pairs: Vec<Option<LinePair>>,
    layout: Vec<KeyShape>,
}

impl LineMapper {
    pub fn new(topology: &Topology) -> Self {
        let n = topology.line_count();
        let mut pairs: Vec<Option<LinePair>> = Vec::new();

        for drive in 0..n {
            for sense in 0..n {
                if topology.is_valid_pair(drive, sense) {
                    pairs.push(Some(LinePair::new(drive, sense)));
                }
            }
        }

        if let Some(declared) = topology.declared_key_count() {
            pairs.resize(declared, None);
        }

        Self {
            kind: topology.kind(),
            lines: topology.lines().to_vec(),
            layout: topology.layout().iter().copied().take(pairs.len()).collect(),
            pairs,
        }
    }

    /// Mapper with no lines and no keys
    pub fn unconfigured() -> Self {
        Self::new(&Topology::unavailable())
    }

    pub fn pair_for(&self, position: KeyPosition) -> Option<LinePair> {
        self.pairs.get(position).copied().flatten()
    }

    /// Physical shape of `position`, when the layout covers it
    pub fn shape(&self, position: KeyPosition) -> Option<KeyShape> {
        self.layout.get(position).copied()
    }

    pub fn contains(&self, position: KeyPosition) -> bool {
        position < self.pairs.len()
    }

    pub fn key_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn is_configured(&self) -> bool {
        self.kind != MatrixKind::Unknown
    }

    pub fn line(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    /// Positions whose line pair includes `line`, in position order
    pub fn keys_on_line(&self, line: usize) -> impl Iterator<Item = KeyPosition> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .filter(move |(_, pair)| pair.is_some_and(|p| p.touches(line)))
            .map(|(position, _)| position)
    }

    /// Position assigned to `(drive, sense)`, if that pair carries a key
    pub fn position_of(&self, pair: LinePair) -> Option<KeyPosition> {
        self.pairs.iter().position(|p| *p == Some(pair))
    }
}
