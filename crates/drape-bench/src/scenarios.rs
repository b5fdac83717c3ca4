//! Benchmark scenarios: procedural garment, body, pinning and config.
//!
//! Two canonical scenarios for regression testing:
//! 1. **Hanging sheet** — Cloth pinned along one edge, swings down under gravity
//! 2. **Sphere drape** — Cloth falls onto a sphere

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use drape_math::Vec3;
use drape_mesh::generators::{quad_grid, uv_sphere};
use drape_mesh::TriangleMesh;
use drape_solver::SolverConfig;
use drape_types::constants::DEFAULT_DT;
use drape_types::DrapeError;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Cloth pinned along one edge, hanging under gravity.
    HangingSheet,
    /// Cloth draped over a sphere.
    SphereDrape,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[ScenarioKind::HangingSheet, ScenarioKind::SphereDrape]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HangingSheet => "hanging_sheet",
            ScenarioKind::SphereDrape => "sphere_drape",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = DrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| DrapeError::InvalidConfig(format!("Unknown scenario '{s}'")))
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Garment mesh.
    pub garment: TriangleMesh,
    /// Optional collision body (sphere for the drape scenario).
    pub body: Option<TriangleMesh>,
    /// Garment vertices held in place.
    pub pinned: Vec<usize>,
    /// Solver configuration.
    pub config: SolverConfig,
    /// Number of ticks to simulate.
    pub ticks: u32,
    /// Tick length (seconds).
    pub dt: f32,
}

impl Scenario {
    /// Create the hanging sheet scenario.
    ///
    /// A 1m × 1m cloth at 20×20 resolution lying flat at `y = 1`, pinned
    /// along one edge, swinging down for 2 seconds at 60fps.
    pub fn hanging_sheet() -> Self {
        let cols = 20;
        let garment = horizontal(quad_grid(cols, 20, 1.0, 1.0), 1.0);

        Self {
            kind: ScenarioKind::HangingSheet,
            garment,
            body: None,
            pinned: (0..=cols).collect(),
            config: SolverConfig::default(),
            ticks: 120,
            dt: DEFAULT_DT,
        }
    }

    /// Create the sphere drape scenario.
    ///
    /// A 1.5m × 1.5m cloth at 20×20 resolution falls from just above a
    /// sphere of radius 0.3m centered at the origin.
    pub fn sphere_drape() -> Self {
        let garment = horizontal(quad_grid(20, 20, 1.5, 1.5), 0.35);
        let body = uv_sphere(0.3, 16, 32);

        Self {
            kind: ScenarioKind::SphereDrape,
            garment,
            body: Some(body),
            pinned: Vec::new(),
            config: SolverConfig::default(),
            ticks: 180,
            dt: DEFAULT_DT,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HangingSheet => Self::hanging_sheet(),
            ScenarioKind::SphereDrape => Self::sphere_drape(),
        }
    }

    /// Overrides the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the tick count and tick length.
    pub fn with_timing(mut self, ticks: u32, dt: f32) -> Self {
        self.ticks = ticks;
        self.dt = dt;
        self
    }
}

/// Lays an XY-plane grid flat in the XZ plane at height `y`, facing up.
fn horizontal(mut mesh: TriangleMesh, y: f32) -> TriangleMesh {
    for (p, n) in mesh.positions.iter_mut().zip(mesh.normals.iter_mut()) {
        *p = Vec3::new(p.x, y, p.y);
        *n = Vec3::Y;
    }
    mesh
}
