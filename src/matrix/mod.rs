//! Scan-matrix topology and key position mapping

mod line_map;
mod topology;

pub use line_map::{KeyPosition, LineMapper, LinePair};
pub use topology::{KeyShape, LineInfo, MatrixKind, Topology};
