//! Genome abstractions
//!
//! This module provides the genome contract and a reference implementation.

pub mod real_vector;
pub mod traits;

pub mod prelude {
    pub use super::real_vector::*;
    pub use super::traits::*;
}
