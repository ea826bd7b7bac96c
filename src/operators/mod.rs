//! Genetic operators
//!
//! This module provides the parent selection operators shared by models.

pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::selection::*;
    pub use super::traits::*;
}
