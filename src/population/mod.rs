//! Population management
//!
//! Individuals, fixed-size populations and the population set evolved by
//! the orchestrator.

pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::individual::*;
    pub use super::population::*;
}
