//! The simulator: one garment, an optional body, and a PBD solver.
//!
//! Per tick:
//! 1. Rescale solver parameters into garment space
//! 2. Apply a pending position reset once it is due
//! 3. Pose the body from its skin
//! 4. Run `sub_steps` solver sub-steps of `dt / sub_steps`
//! 5. Copy representatives onto welded duplicates, recompute normals

use std::time::Instant;

use drape_contact::{Body, CollisionPipeline};
use drape_garment::{BlendShapeSet, Garment};
use drape_mesh::{SkinSource, TriangleMesh};
use drape_solver::{CollisionStage, PbdSolver, SolverConfig};
use drape_telemetry::{EventBus, EventKind};
use drape_types::{DrapeError, DrapeResult};

use crate::frame::{FrameInput, TickReport};

/// Garment simulator driven once per frame by the host.
pub struct Simulator {
    config: SolverConfig,
    garment: Option<Garment>,
    solver: Option<PbdSolver>,
    pipeline: Option<CollisionPipeline>,
    events: Option<EventBus>,
    tick: u64,
}

impl Simulator {
    /// Creates an uninitialized simulator.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            garment: None,
            solver: None,
            pipeline: None,
            events: None,
            tick: 0,
        }
    }

    /// Builds the garment, the solver and (with a body mesh) the
    /// collision pipeline.
    ///
    /// A second call on a ready simulator does nothing.
    pub fn init(
        &mut self,
        garment_mesh: &TriangleMesh,
        blend_shapes: BlendShapeSet,
        body_mesh: Option<&TriangleMesh>,
    ) -> DrapeResult<()> {
        if self.is_ready() {
            tracing::debug!("Simulator already initialized");
            return Ok(());
        }

        self.config.validate()?;
        let garment = Garment::init(garment_mesh, blend_shapes)?;
        let solver = PbdSolver::new(self.config.clone(), garment.vertex_count())?;
        let pipeline = match body_mesh {
            Some(mesh) => Some(CollisionPipeline::new(
                Body::init(mesh)?,
                self.config.voxel_resolution,
                garment.vertex_count(),
            )),
            None => None,
        };

        tracing::info!(
            vertices = garment.vertex_count(),
            edges = garment.edge_count(),
            body = pipeline.is_some(),
            sub_steps = self.config.sub_steps,
            iterations = self.config.iterations,
            "Simulator ready"
        );

        self.garment = Some(garment);
        self.solver = Some(solver);
        self.pipeline = pipeline;
        self.tick = 0;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.garment.is_some() && self.solver.is_some()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn garment(&self) -> Option<&Garment> {
        self.garment.as_ref()
    }

    pub fn garment_mut(&mut self) -> Option<&mut Garment> {
        self.garment.as_mut()
    }

    pub fn pipeline(&self) -> Option<&CollisionPipeline> {
        self.pipeline.as_ref()
    }

    /// Number of ticks run since `init`.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Attaches a telemetry bus; events are flushed at the end of every tick.
    pub fn set_event_bus(&mut self, bus: EventBus) {
        self.events = Some(bus);
    }

    pub fn event_bus_mut(&mut self) -> Option<&mut EventBus> {
        self.events.as_mut()
    }

    /// Detaches and returns the telemetry bus.
    pub fn take_event_bus(&mut self) -> Option<EventBus> {
        self.events.take()
    }

    /// Drops all simulation buffers. Safe to call at any time.
    pub fn teardown(&mut self) {
        if self.is_ready() {
            tracing::info!(ticks = self.tick, "Simulator torn down");
        }
        self.garment = None;
        self.solver = None;
        self.pipeline = None;
        self.tick = 0;
        if let Some(bus) = self.events.as_mut() {
            bus.finalize();
        }
    }

    /// Pins garment vertex `i` in place.
    pub fn pin(&mut self, i: usize) -> DrapeResult<()> {
        self.garment_or_err()?.pin(i)
    }

    // ─── Blend shapes ─────────────────────────────────────────

    /// Blend shape names; empty before `init`.
    pub fn blend_shape_names(&self) -> &[String] {
        self.garment
            .as_ref()
            .map(|g| g.blend_shape_names())
            .unwrap_or(&[])
    }

    pub fn blend_shape_weight(&self, index: usize) -> DrapeResult<f32> {
        self.garment
            .as_ref()
            .ok_or_else(not_ready)?
            .blend_shape_weight(index)
    }

    /// Stores a weight (0–100) and recomputes every rest length.
    pub fn set_blend_shape_weight(&mut self, index: usize, weight: f32) -> DrapeResult<()> {
        let garment = self.garment.as_mut().ok_or_else(not_ready)?;
        garment.set_blend_shape_weight(index, weight)?;
        let edges = garment.edge_count();
        self.emit(EventKind::RestShapeRecomputed { edges });
        Ok(())
    }

    /// Arms a position reset that fires on the first tick at least
    /// `RESET_SETTLE_MS` after `now`.
    pub fn request_reset_position(
        &mut self,
        now: Instant,
        skin: Option<&mut dyn SkinSource>,
    ) -> DrapeResult<()> {
        self.garment_or_err()?.request_reset_position(now, skin);
        Ok(())
    }

    // ─── Stepping ─────────────────────────────────────────────

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32, frame: &mut FrameInput<'_>) -> DrapeResult<TickReport> {
        self.step_at(dt, frame, Instant::now())
    }

    /// [`Simulator::step`] with an explicit clock reading for the reset timer.
    pub fn step_at(
        &mut self,
        dt: f32,
        frame: &mut FrameInput<'_>,
        now: Instant,
    ) -> DrapeResult<TickReport> {
        let start = Instant::now();

        if !(dt.is_finite() && dt > 0.0) {
            return Err(DrapeError::InvalidConfig(format!(
                "Tick duration must be positive, got {dt}"
            )));
        }
        let (Some(garment), Some(solver)) = (self.garment.as_mut(), self.solver.as_mut()) else {
            return Err(not_ready());
        };

        let tick = self.tick;
        let emit = |kind: EventKind| {
            if let Some(bus) = self.events.as_ref() {
                bus.emit_kind(tick, kind);
            }
        };
        emit(EventKind::TickBegin { dt });

        let world_to_garment = frame.garment_to_world.inverse();
        solver.set_local_parameters(self.config.to_local(&frame.garment_to_world));

        let reset_applied =
            garment.reset_position_if_needed(frame.garment_skin, &world_to_garment, now)?;
        if reset_applied {
            emit(EventKind::PositionReset {
                vertices: garment.vertex_count(),
            });
        }

        let body_posed = match self.pipeline.as_mut() {
            Some(pipeline) => pipeline.begin_frame(frame.body_skin, &world_to_garment)?,
            None => false,
        };

        let sub_steps = self.config.sub_steps;
        let h = dt / sub_steps as f32;
        let mut report = TickReport {
            tick,
            sub_steps,
            body_posed,
            reset_applied,
            ..Default::default()
        };

        for index in 0..sub_steps {
            let stage = self
                .pipeline
                .as_mut()
                .map(|p| p as &mut dyn CollisionStage);
            let result = solver.substep(garment, h, stage)?;
            report.iterations += result.iterations;

            if let Some(summary) = result.collision {
                report.collision_sub_steps += 1;
                report.contacts += summary.contacts;
                report.active_voxels = summary.active_voxels;
                report.triangle_refs = summary.triangle_refs;
                emit(EventKind::CollisionBinning {
                    active_voxels: summary.active_voxels,
                    triangle_refs: summary.triangle_refs,
                    contacts: summary.contacts,
                });
                if let Some(capacity) = summary.grown_capacity {
                    emit(EventKind::BufferGrowth { capacity });
                }
            }
            emit(EventKind::Substep {
                index,
                iterations: result.iterations,
                wall_time: result.wall_time,
            });
        }

        garment.sync_welded_duplicates();
        garment.recompute_normals();

        report.kinetic_energy = garment.state().kinetic_energy();
        report.wall_time = start.elapsed().as_secs_f64();
        emit(EventKind::TickEnd {
            wall_time: report.wall_time,
            kinetic_energy: report.kinetic_energy,
        });

        tracing::debug!(
            tick,
            contacts = report.contacts,
            active_voxels = report.active_voxels,
            kinetic_energy = report.kinetic_energy,
            wall_ms = report.wall_time * 1000.0,
            "Tick complete"
        );

        if let Some(bus) = self.events.as_mut() {
            bus.flush();
        }
        self.tick += 1;
        Ok(report)
    }

    fn garment_or_err(&mut self) -> DrapeResult<&mut Garment> {
        self.garment.as_mut().ok_or_else(not_ready)
    }

    fn emit(&mut self, kind: EventKind) {
        if let Some(bus) = self.events.as_mut() {
            bus.emit_kind(self.tick, kind);
            bus.flush();
        }
    }
}

fn not_ready() -> DrapeError {
    DrapeError::NotReady("Simulator::init has not completed".into())
}
