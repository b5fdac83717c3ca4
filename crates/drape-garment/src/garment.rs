//! A simulated garment.

use std::time::Instant;

use drape_math::Mat4;
use drape_mesh::normals::compute_vertex_normals;
use drape_mesh::{Edge, GarmentTopology, SkinSource, TriangleMesh};
use drape_types::{DrapeError, DrapeResult};

use crate::blend_shape::BlendShapeSet;
use crate::reset::PositionReset;
use crate::rest_shape::RestShape;
use crate::state::GarmentState;

/// Garment topology, blend shapes, rest shape and simulation state.
#[derive(Debug, Clone)]
pub struct Garment {
    topology: GarmentTopology,
    blend_shapes: BlendShapeSet,
    rest: RestShape,
    state: GarmentState,
    reset: PositionReset,
}

impl Garment {
    /// Welds `mesh`, extracts edges and evaluates the initial rest shape.
    ///
    /// `blend_shapes` must describe the same vertices as `mesh`.
    pub fn init(mesh: &TriangleMesh, blend_shapes: BlendShapeSet) -> DrapeResult<Self> {
        let topology = GarmentTopology::build(mesh)?;

        if blend_shapes.vertex_count() != mesh.vertex_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "Blend shape base has {} vertices, garment mesh has {}",
                blend_shapes.vertex_count(),
                mesh.vertex_count()
            )));
        }

        let mut garment = Self {
            rest: RestShape::new(mesh.vertex_count()),
            state: GarmentState::from_mesh(mesh),
            topology,
            blend_shapes,
            reset: PositionReset::default(),
        };
        garment.recompute_rest_shape();

        tracing::info!(
            blend_shapes = garment.blend_shapes.shape_count(),
            vertices = garment.vertex_count(),
            edges = garment.edge_count(),
            triangles = garment.topology.triangle_count(),
            "Garment initialized"
        );

        Ok(garment)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.state.vertex_count()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.topology.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.topology.edges
    }

    pub fn topology(&self) -> &GarmentTopology {
        &self.topology
    }

    pub fn rest_shape(&self) -> &RestShape {
        &self.rest
    }

    pub fn state(&self) -> &GarmentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GarmentState {
        &mut self.state
    }

    /// Edges and mutable state at once, for the solver.
    pub fn solver_parts(&mut self) -> (&[Edge], &mut GarmentState) {
        (&self.topology.edges, &mut self.state)
    }

    /// Pins vertex `i` (and every vertex welded onto the same representative).
    pub fn pin(&mut self, i: usize) -> DrapeResult<()> {
        if i >= self.vertex_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "Cannot pin vertex {} of {}",
                i,
                self.vertex_count()
            )));
        }
        let rep = self.topology.representatives[i];
        for (v, &r) in self.topology.representatives.iter().enumerate() {
            if r == rep {
                self.state.inv_mass[v] = 0.0;
                self.state.velocities[v] = drape_math::Vec3::ZERO;
            }
        }
        Ok(())
    }

    // ─── Blend shapes ─────────────────────────────────────────

    pub fn blend_shape_names(&self) -> &[String] {
        self.blend_shapes.names()
    }

    pub fn blend_shape_weight(&self, index: usize) -> DrapeResult<f32> {
        self.blend_shapes.weight(index)
    }

    /// Stores a weight (0–100, clamped) and recomputes the rest shape.
    pub fn set_blend_shape_weight(&mut self, index: usize, weight: f32) -> DrapeResult<()> {
        self.blend_shapes.set_weight(index, weight)?;
        self.recompute_rest_shape();
        Ok(())
    }

    /// Re-evaluates rest positions and every edge's rest length.
    pub fn recompute_rest_shape(&mut self) {
        self.rest.compute(&self.blend_shapes);
        self.rest.update_edge_lengths(&mut self.topology.edges);
        tracing::debug!(edges = self.edge_count(), "Rest shape recomputed");
    }

    // ─── Position reset ───────────────────────────────────────

    /// Arms a position reset and pushes the current weights to `skin`.
    pub fn request_reset_position(&mut self, now: Instant, skin: Option<&mut dyn SkinSource>) {
        self.reset.request(now);
        if let Some(skin) = skin {
            for (i, &w) in self.blend_shapes.weights().iter().enumerate() {
                skin.set_blend_shape_weight(i, w);
            }
        }
        tracing::debug!("Position reset requested");
    }

    pub fn reset_pending(&self) -> bool {
        self.reset.is_armed()
    }

    /// Snaps positions onto the skinned pose once the reset is due.
    ///
    /// Returns `Ok(true)` when the snap happened.
    pub fn reset_position_if_needed(
        &mut self,
        skin: Option<&dyn SkinSource>,
        world_to_garment: &Mat4,
        now: Instant,
    ) -> DrapeResult<bool> {
        let applied =
            self.reset
                .apply_if_due(skin, world_to_garment, now, &mut self.state.positions)?;
        if applied {
            tracing::info!(vertices = self.vertex_count(), "Garment position reset to skinned pose");
        }
        Ok(applied)
    }

    // ─── Post-step bookkeeping ────────────────────────────────

    /// Copies every representative's position and velocity onto the
    /// vertices welded to it.
    pub fn sync_welded_duplicates(&mut self) {
        let state = &mut self.state;
        for (v, &r) in self.topology.representatives.iter().enumerate() {
            let r = r as usize;
            if r != v {
                state.positions[v] = state.positions[r];
                state.velocities[v] = state.velocities[r];
            }
        }
    }

    /// Recomputes normals over the welded triangles; duplicates copy
    /// their representative's normal.
    pub fn recompute_normals(&mut self) {
        compute_vertex_normals(
            &self.state.positions,
            &self.topology.welded_indices,
            &mut self.state.normals,
        );
        for (v, &r) in self.topology.representatives.iter().enumerate() {
            let r = r as usize;
            if r != v {
                self.state.normals[v] = self.state.normals[r];
            }
        }
    }
}
