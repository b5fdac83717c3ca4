//! Position-based-dynamics sub-step driver.
//!
//! One sub-step:
//! 1. **Integrate** — gravity, damping, velocity clamp
//! 2. **Predict** — `next = p + v·dt`
//! 3. **Iterate** K times — accumulate + project distance constraints;
//!    after the first projection, run the collision stage once
//! 4. **Commit** — derive velocities, write positions, then copy every
//!    representative onto its welded duplicates
//!
//! Welded-away duplicates own no edges. They follow their representative
//! sub-step by sub-step and the collision stage sees them as pinned.

use std::time::Instant;

use drape_garment::Garment;
use drape_types::{DrapeError, DrapeResult};

use crate::collision::{CollisionStage, CollisionSummary};
use crate::commit::CommitPositions;
use crate::config::{LocalParameters, SolverConfig};
use crate::constraint::DistanceConstraintPass;
use crate::integrate::IntegrateForces;
use crate::predict::PredictPositions;
use crate::state::SolverState;

/// Result of a solver sub-step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Constraint iterations performed.
    pub iterations: u32,
    /// Collision counters, `None` when collision was skipped.
    pub collision: Option<CollisionSummary>,
    /// Wall-clock time for this sub-step (seconds).
    pub wall_time: f64,
}

/// Jacobi PBD solver for one garment.
pub struct PbdSolver {
    config: SolverConfig,
    params: LocalParameters,
    state: SolverState,
    /// `inv_mass` with welded duplicates zeroed, as handed to collision.
    collision_inv_mass: Vec<f32>,
}

impl PbdSolver {
    /// Creates a solver with buffers for `vertex_count` vertices.
    pub fn new(config: SolverConfig, vertex_count: usize) -> DrapeResult<Self> {
        config.validate()?;
        let params = config.to_local(&drape_math::Mat4::IDENTITY);
        Ok(Self {
            config,
            params,
            state: SolverState::new(vertex_count),
            collision_inv_mass: Vec::with_capacity(vertex_count),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn params(&self) -> &LocalParameters {
        &self.params
    }

    /// Installs the garment-space parameters for the coming sub-steps.
    pub fn set_local_parameters(&mut self, params: LocalParameters) {
        self.params = params;
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    /// Advances `garment` by one sub-step of length `dt`.
    pub fn substep(
        &mut self,
        garment: &mut Garment,
        dt: f32,
        mut collision: Option<&mut dyn CollisionStage>,
    ) -> DrapeResult<StepResult> {
        let start = Instant::now();

        if garment.vertex_count() != self.state.vertex_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "Solver sized for {} vertices, garment has {}",
                self.state.vertex_count(),
                garment.vertex_count()
            )));
        }

        let params = self.params;
        self.refresh_collision_inv_mass(garment);
        let (edges, garment_state) = garment.solver_parts();

        // 1. Integrate
        IntegrateForces::from_params(&params).run(
            &mut garment_state.velocities,
            &garment_state.inv_mass,
            dt,
        );

        // 2. Predict
        PredictPositions.run(
            &garment_state.positions,
            &garment_state.velocities,
            &mut self.state,
            dt,
        );

        // 3. Constraint iterations
        let pass = DistanceConstraintPass::new(params.epsilon);
        let mut summary = None;
        for iteration in 0..self.config.iterations {
            pass.accumulate(
                edges,
                &garment_state.inv_mass,
                &self.state.next_positions,
                &self.state.deltas,
            );
            pass.project(&mut self.state.next_positions, &self.state.deltas);

            if iteration == 0 {
                if let Some(stage) = collision.as_deref_mut() {
                    summary = stage.resolve(&mut self.state, &self.collision_inv_mass, &params)?;
                    if summary.is_none() {
                        tracing::trace!(stage = stage.name(), "Collision skipped this sub-step");
                    }
                }
            }
        }

        // 4. Commit
        CommitPositions.run(
            &mut garment_state.positions,
            &mut garment_state.velocities,
            &self.state,
            dt,
        );
        garment.sync_welded_duplicates();

        Ok(StepResult {
            iterations: self.config.iterations,
            collision: summary,
            wall_time: start.elapsed().as_secs_f64(),
        })
    }

    fn refresh_collision_inv_mass(&mut self, garment: &Garment) {
        let representatives = &garment.topology().representatives;
        self.collision_inv_mass.clear();
        self.collision_inv_mass.extend(
            garment
                .state()
                .inv_mass
                .iter()
                .zip(representatives)
                .enumerate()
                .map(|(v, (&w, &r))| if r as usize == v { w } else { 0.0 }),
        );
    }
}
