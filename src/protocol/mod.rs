//! Diagnostic request/response protocol

pub mod codec;
mod messages;
mod router;
mod snapshot;

pub use messages::*;
pub use router::RequestRouter;
pub use snapshot::SnapshotBuilder;
