//! Scan-matrix topology descriptors
//!
//! A topology names how many physical scan lines exist, what each line is
//! wired to, and which `(drive, sense)` line pairs can carry a key.

use serde::{Deserialize, Serialize};

/// Wiring scheme of the scan matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixKind {
    /// Every ordered pair of distinct lines can carry a key
    Charlieplex,
    /// Conventional matrix: row lines drive, column lines sense
    RowColumn,
    /// No matrix configured
    #[default]
    #[serde(alias = "none")]
    Unknown,
}

impl MatrixKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Charlieplex => "charlieplex",
            Self::RowColumn => "row-column",
            Self::Unknown => "unknown",
        }
    }
}

/// Port/pin identity of one physical scan line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    /// GPIO controller name
    pub port: String,
    /// Pin number on that controller
    pub pin: u32,
}

impl LineInfo {
    pub fn new(port: impl Into<String>, pin: u32) -> Self {
        Self {
            port: port.into(),
            pin,
        }
    }
}

/// Physical placement of one key on the board, in layout units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyShape {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl KeyShape {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Default identity for line `index` when the board does not name its pins.
fn default_line(index: usize) -> LineInfo {
    LineInfo::new("gpio0", index as u32)
}

/// Topology descriptor consumed by [`LineMapper`](super::LineMapper)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    kind: MatrixKind,
    /// Number of drive lines; only meaningful for row/column matrices
    rows: usize,
    lines: Vec<LineInfo>,
    key_count: Option<usize>,
    /// Shape per key position, in position order
    layout: Vec<KeyShape>,
}

impl Topology {
    /// Charlieplexed matrix over `line_count` lines, diagonal excluded.
    pub fn charlieplex(line_count: usize) -> Self {
        Self {
            kind: MatrixKind::Charlieplex,
            rows: 0,
            lines: (0..line_count).map(default_line).collect(),
            key_count: None,
            layout: Vec::new(),
        }
    }

    /// Row/column matrix. Lines `[0, rows)` are rows, `[rows, rows + cols)`
    /// are columns.
    pub fn row_column(rows: usize, cols: usize) -> Self {
        Self {
            kind: MatrixKind::RowColumn,
            rows,
            lines: (0..rows + cols).map(default_line).collect(),
            key_count: None,
            layout: Vec::new(),
        }
    }

    /// No matrix configured.
    pub fn unavailable() -> Self {
        Self {
            kind: MatrixKind::Unknown,
            rows: 0,
            lines: Vec::new(),
            key_count: None,
            layout: Vec::new(),
        }
    }

    /// Replace the port/pin identity of the first `lines.len()` lines.
    ///
    /// Identities beyond the topology's line count are ignored.
    pub fn with_lines(mut self, lines: Vec<LineInfo>) -> Self {
        for (slot, info) in self.lines.iter_mut().zip(lines) {
            *slot = info;
        }
        self
    }

    /// Declare the number of logical keys. Fewer than the derived pairs
    /// truncates the table; more adds positions without a line pair.
    pub fn with_key_count(mut self, key_count: usize) -> Self {
        self.key_count = Some(key_count);
        self
    }

    /// Attach the physical layout. Entry `i` describes key position `i`.
    pub fn with_layout(mut self, layout: Vec<KeyShape>) -> Self {
        self.layout = layout;
        self
    }

    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn declared_key_count(&self) -> Option<usize> {
        self.key_count
    }

    pub fn layout(&self) -> &[KeyShape] {
        &self.layout
    }

    /// Whether a key can sit between `drive` and `sense`.
    pub fn is_valid_pair(&self, drive: usize, sense: usize) -> bool {
        let n = self.line_count();
        if drive >= n || sense >= n || drive == sense {
            return false;
        }
        match self.kind {
            MatrixKind::Charlieplex => true,
            MatrixKind::RowColumn => drive < self.rows && sense >= self.rows,
            MatrixKind::Unknown => false,
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::unavailable()
    }
}
