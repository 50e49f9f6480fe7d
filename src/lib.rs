//! Keyscan Diagnostics - scan-matrix health monitoring
//!
//! Collects key transitions from a keyboard scan matrix into fixed-size
//! tables, detects chattering contacts, derives per-line fault heuristics
//! for multiplexed matrices and answers diagnostic queries over a
//! request/response protocol.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gpio;
pub mod matrix;
pub mod protocol;
pub mod report;
pub mod utils;

pub use config::Config;
pub use diagnostics::{Diagnostics, KeyEvent};
pub use error::DiagnosticsError;
pub use protocol::{Request, RequestRouter, Response};
