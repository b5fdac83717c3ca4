//! Garment constraint topology.
//!
//! Authoring tools split vertices along UV and normal seams, so a garment
//! mesh usually contains several vertices at the same location. Those
//! copies are welded onto one representative before edges are extracted;
//! otherwise the cloth would tear apart along every seam.
//!
//! The builder produces:
//! - a representative for every vertex (lowest earlier index within
//!   the weld radius),
//! - the triangle index buffer remapped onto representatives,
//! - the canonical (`start < end`), deduplicated, sorted edge list.

use std::collections::{HashMap, HashSet};

use drape_math::Vec3;
use drape_types::constants::WELD_DISTANCE_SQ;
use drape_types::DrapeResult;
use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

/// A distance constraint between two welded vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Lower vertex index.
    pub start: u32,
    /// Higher vertex index.
    pub end: u32,
    /// Rest length, refreshed whenever the rest shape changes.
    pub length: f32,
}

impl Edge {
    /// Creates an edge with canonical orientation (`start < end`).
    #[inline]
    pub fn new(a: u32, b: u32, length: f32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
            length,
        }
    }

    #[inline]
    pub fn key(&self) -> (u32, u32) {
        (self.start, self.end)
    }
}

/// Welded topology of a garment mesh.
#[derive(Debug, Clone)]
pub struct GarmentTopology {
    /// `representatives[i]` is the vertex `i` was welded onto (`i` itself
    /// for representatives).
    pub representatives: Vec<u32>,

    /// Triangle indices remapped onto representatives.
    pub welded_indices: Vec<u32>,

    /// Canonical unique edges sorted by `(start, end)`.
    pub edges: Vec<Edge>,

    /// For each vertex, the welded triangles that reference it.
    /// Empty for welded-away duplicates.
    pub vertex_triangles: Vec<Vec<u32>>,
}

impl GarmentTopology {
    /// Welds `mesh` and derives its constraint edges.
    ///
    /// Edge rest lengths start at `0.0`; the rest-shape engine fills them in.
    pub fn build(mesh: &TriangleMesh) -> DrapeResult<Self> {
        mesh.validate()?;
        mesh.require_non_empty("Garment")?;

        let representatives = weld_vertices(&mesh.positions);

        let welded_indices: Vec<u32> = mesh
            .indices
            .iter()
            .map(|&i| representatives[i as usize])
            .collect();

        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); mesh.vertex_count()];

        for (t, tri) in welded_indices.chunks_exact(3).enumerate() {
            let (a, b, c) = (tri[0], tri[1], tri[2]);

            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                // Collapsed by welding
                if v0 == v1 {
                    continue;
                }
                let edge = Edge::new(v0, v1, 0.0);
                if seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }

            let mut corners = [a, b, c];
            corners.sort_unstable();
            for (k, &v) in corners.iter().enumerate() {
                if k == 0 || corners[k - 1] != v {
                    vertex_triangles[v as usize].push(t as u32);
                }
            }
        }

        edges.sort_unstable_by_key(Edge::key);

        let topology = Self {
            representatives,
            welded_indices,
            edges,
            vertex_triangles,
        };

        tracing::debug!(
            vertices = mesh.vertex_count(),
            unique = topology.unique_vertex_count(),
            edges = topology.edges.len(),
            "Garment topology built"
        );

        Ok(topology)
    }

    /// Number of vertices that are their own representative.
    pub fn unique_vertex_count(&self) -> usize {
        self.representatives
            .iter()
            .enumerate()
            .filter(|&(i, &r)| i as u32 == r)
            .count()
    }

    #[inline]
    pub fn is_representative(&self, i: usize) -> bool {
        self.representatives[i] as usize == i
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.welded_indices.len() / 3
    }

    /// Welded indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [
            self.welded_indices[base],
            self.welded_indices[base + 1],
            self.welded_indices[base + 2],
        ]
    }
}

/// Welds coincident vertices.
///
/// Returns `representative[i]`: the lowest-index earlier representative
/// whose squared distance to vertex `i` is at most `WELD_DISTANCE_SQ`,
/// or `i` itself. Representatives are bucketed in a uniform hash grid
/// whose cells are twice the weld radius, so every candidate lies in the
/// 27-cell neighborhood of the query cell.
pub fn weld_vertices(positions: &[Vec3]) -> Vec<u32> {
    let cell_size = 2.0 * WELD_DISTANCE_SQ.sqrt();
    let inv_cell = 1.0 / cell_size as f64;
    let cell_of = |p: Vec3| -> (i64, i64, i64) {
        (
            (p.x as f64 * inv_cell).floor() as i64,
            (p.y as f64 * inv_cell).floor() as i64,
            (p.z as f64 * inv_cell).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut representatives = Vec::with_capacity(positions.len());

    for (i, &p) in positions.iter().enumerate() {
        let (cx, cy, cz) = cell_of(p);

        let mut best: Option<u32> = None;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &r in bucket {
                        if best.is_some_and(|b| b <= r) {
                            continue;
                        }
                        if (positions[r as usize] - p).length_squared() <= WELD_DISTANCE_SQ {
                            best = Some(r);
                        }
                    }
                }
            }
        }

        match best {
            Some(r) => representatives.push(r),
            None => {
                representatives.push(i as u32);
                grid.entry((cx, cy, cz)).or_default().push(i as u32);
            }
        }
    }

    representatives
}

/// Reference O(V²) weld with the same result as [`weld_vertices`].
pub fn weld_vertices_naive(positions: &[Vec3]) -> Vec<u32> {
    let mut representatives: Vec<u32> = Vec::with_capacity(positions.len());
    for (i, &p) in positions.iter().enumerate() {
        let found = (0..i).find(|&j| {
            representatives[j] as usize == j
                && (positions[j] - p).length_squared() <= WELD_DISTANCE_SQ
        });
        representatives.push(found.unwrap_or(i) as u32);
    }
    representatives
}
