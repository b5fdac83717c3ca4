//! # drape-sim
//!
//! Ties garment, solver and body collision together behind one
//! per-frame entry point, [`Simulator::step`].

pub mod frame;
pub mod simulator;

pub use frame::{FrameInput, TickReport};
pub use simulator::Simulator;
