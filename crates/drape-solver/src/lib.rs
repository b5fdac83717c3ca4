//! # drape-solver
//!
//! Sub-stepped, iterated Jacobi position-based-dynamics solver.
//!
//! ## Key Types
//!
//! - [`PbdSolver`] — runs one sub-step: integrate → predict → iterate → commit
//! - [`SolverState`] — transient per-sub-step buffers (predicted positions,
//!   voxel ids, contact normals, correction accumulators)
//! - [`SolverConfig`] — world-space parameters, presets and TOML loading
//! - [`CollisionStage`] — seam through which body collision is injected
//! - Phase objects: [`IntegrateForces`], [`PredictPositions`],
//!   [`DistanceConstraintPass`], [`CommitPositions`]

pub mod collision;
pub mod commit;
pub mod config;
pub mod constraint;
pub mod integrate;
pub mod pbd_solver;
pub mod predict;
pub mod state;

pub use collision::{CollisionStage, CollisionSummary};
pub use commit::CommitPositions;
pub use config::{LocalParameters, SolverConfig};
pub use constraint::DistanceConstraintPass;
pub use integrate::IntegrateForces;
pub use pbd_solver::{PbdSolver, StepResult};
pub use predict::PredictPositions;
pub use state::{SolverState, NO_VOXEL};
