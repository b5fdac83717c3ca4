//! # drape-types
//!
//! Shared error types and simulation constants
//! for the Drape garment simulator.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other Drape crates share.

pub mod constants;
pub mod error;

pub use error::{DrapeError, DrapeResult};
