//! Checkpointing support for run state persistence
//!
//! Populations are encoded to canonical JSON, and a whole run can be
//! snapshotted, saved to disk and restored into an orchestrator to resume.

mod codec;
mod recovery;

pub use codec::*;
pub use recovery::*;

/// Prelude for checkpoint module
pub mod prelude {
    pub use super::codec::*;
    pub use super::recovery::*;
}
