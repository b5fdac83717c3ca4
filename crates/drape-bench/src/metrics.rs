//! Benchmark metrics: data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Number of ticks executed.
    pub ticks: u32,
    /// Average wall-clock time per tick (seconds).
    pub avg_tick_time: f64,
    /// Minimum tick time.
    pub min_tick_time: f64,
    /// Maximum tick time.
    pub max_tick_time: f64,
    /// Final kinetic energy (should approach zero for stable drape).
    pub final_kinetic_energy: f32,
    /// Maximum vertex displacement from initial position.
    pub max_displacement: f32,
    /// Largest relative edge stretch `|len - rest| / rest` at the end.
    pub max_stretch: f32,
    /// Body contacts resolved over the whole run.
    pub total_contacts: usize,
    /// Vertex count.
    pub vertex_count: usize,
    /// Triangle count.
    pub triangle_count: usize,
}

impl BenchmarkMetrics {
    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,vertex_count,triangle_count,ticks,total_wall_time_s,avg_tick_ms,min_tick_ms,max_tick_ms,final_ke,max_displacement,max_stretch,contacts".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.6e},{:.6},{:.6},{}",
            self.scenario,
            self.vertex_count,
            self.triangle_count,
            self.ticks,
            self.total_wall_time,
            self.avg_tick_time * 1000.0,
            self.min_tick_time * 1000.0,
            self.max_tick_time * 1000.0,
            self.final_kinetic_energy,
            self.max_displacement,
            self.max_stretch,
            self.total_contacts,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
