//! Keyscan statistics, chatter detection and event ingestion

mod chatter;
mod engine;
mod event;
mod event_buffer;
mod line_health;
mod state;
mod stats;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use chatter::ChatterDetector;
pub use engine::Diagnostics;
pub use event::KeyEvent;
pub use event_buffer::EventBuffer;
pub use line_health::{summarize_lines, LineHealth};
pub use state::{DiagnosticState, IngestOutcome, MonitoringState};
pub use stats::{KeyStat, LineActivity, StatStore};
