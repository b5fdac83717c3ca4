//! Body collision behind the solver's `CollisionStage` seam.
//!
//! Body triangles are refreshed from the skin once per frame
//! ([`CollisionPipeline::begin_frame`]); everything else runs once per
//! sub-step on the predicted positions.

use drape_math::{Mat4, Vec3};
use drape_mesh::SkinSource;
use drape_solver::{CollisionStage, CollisionSummary, LocalParameters, SolverState};
use drape_types::DrapeResult;

use crate::binner::BodyTriangleBinner;
use crate::body::Body;
use crate::bounds::BoundsReduction;
use crate::collision::BodyCollisionPass;
use crate::voxel_grid::VoxelGrid;

/// Bounds → voxel grid → binning → resolve.
pub struct CollisionPipeline {
    body: Body,
    bounds: BoundsReduction,
    grid: VoxelGrid,
    binner: BodyTriangleBinner,
    /// Whether the body triangles reflect the current frame's skin.
    body_posed: bool,
}

impl CollisionPipeline {
    /// Creates a pipeline for `body` against a garment of
    /// `garment_vertex_count` vertices.
    pub fn new(body: Body, voxel_resolution: u32, garment_vertex_count: usize) -> Self {
        Self {
            body,
            bounds: BoundsReduction::new(),
            grid: VoxelGrid::new(voxel_resolution, garment_vertex_count),
            binner: BodyTriangleBinner::new(),
            body_posed: false,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn binner(&self) -> &BodyTriangleBinner {
        &self.binner
    }

    pub fn body_posed(&self) -> bool {
        self.body_posed
    }

    /// Pulls the body pose for this frame.
    ///
    /// Skinned positions are in root-bone space; they are taken to garment
    /// space with `world_to_garment · TRS(root, 1)`. Returns `false` (and
    /// disables collision for the frame) when no pose is available.
    pub fn begin_frame(
        &mut self,
        skin: Option<&dyn SkinSource>,
        world_to_garment: &Mat4,
    ) -> DrapeResult<bool> {
        let Some(skin) = skin else {
            self.body_posed = false;
            return Ok(false);
        };
        let Some(skinned) = skin.skinned_positions() else {
            tracing::trace!("Body skin stream not ready, collision disabled this frame");
            self.body_posed = false;
            return Ok(false);
        };

        let body_to_garment = *world_to_garment * skin.root_transform().to_matrix();
        self.body.update_triangles(skinned, &body_to_garment)?;
        self.body_posed = true;
        Ok(true)
    }

    /// Poses the body directly from garment-space positions.
    pub fn set_body_positions(&mut self, positions: &[Vec3]) -> DrapeResult<()> {
        self.body.update_triangles(positions, &Mat4::IDENTITY)?;
        self.body_posed = true;
        Ok(())
    }
}

impl CollisionStage for CollisionPipeline {
    fn resolve(
        &mut self,
        state: &mut SolverState,
        inv_mass: &[f32],
        params: &LocalParameters,
    ) -> DrapeResult<Option<CollisionSummary>> {
        if !self.body_posed || self.body.triangle_count() == 0 {
            return Ok(None);
        }

        // 1. Bounds
        self.bounds.reset();
        self.bounds.accumulate(&state.next_positions);

        // 2. Voxel grid
        let active_voxels = self.grid.analyze(
            self.bounds.bounds(),
            params.epsilon,
            &state.next_positions,
            &mut state.voxel_ids,
        );
        if active_voxels == 0 {
            return Ok(None);
        }

        // 3. Binning
        let margin = params.front_radius.max(params.back_radius);
        BodyTriangleBinner::refresh_voxel_bounds(self.body.triangles_mut(), &self.grid, margin);
        let report = self.binner.bin(self.body.triangles(), &mut self.grid);

        // 4. Resolve
        let pass = BodyCollisionPass::new(params.front_radius, params.back_radius);
        let contacts = pass.run(
            &mut state.next_positions,
            &state.voxel_ids,
            &mut state.contact_normals,
            inv_mass,
            &self.grid,
            &self.binner,
            self.body.triangles(),
        );

        Ok(Some(CollisionSummary {
            active_voxels,
            triangle_refs: report.triangle_refs,
            contacts,
            grown_capacity: report.grown_capacity,
        }))
    }

    fn name(&self) -> &str {
        "voxel_body_collision"
    }
}
