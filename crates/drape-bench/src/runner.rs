//! Benchmark runner: executes scenarios through the simulator and
//! collects metrics.

use std::time::Instant;

use drape_garment::BlendShapeSet;
use drape_math::Mat4;
use drape_mesh::StaticSkin;
use drape_sim::{FrameInput, Simulator};
use drape_types::DrapeResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Builds a ready simulator for `scenario`: garment initialized,
    /// body attached, pins applied.
    pub fn prepare(scenario: &Scenario) -> DrapeResult<Simulator> {
        let mut sim = Simulator::new(scenario.config.clone());
        sim.init(
            &scenario.garment,
            BlendShapeSet::neutral(&scenario.garment),
            scenario.body.as_ref(),
        )?;
        for &i in &scenario.pinned {
            sim.pin(i)?;
        }
        Ok(sim)
    }

    /// The body skin for `scenario`: its rest pose, rooted at the origin.
    pub fn body_skin(scenario: &Scenario) -> Option<StaticSkin> {
        scenario
            .body
            .as_ref()
            .map(|body| StaticSkin::new(body.positions.clone()))
    }

    /// Run a single scenario.
    ///
    /// Returns metrics for the completed run.
    pub fn run(scenario: &Scenario) -> DrapeResult<BenchmarkMetrics> {
        let (metrics, _) = Self::run_with_simulator(scenario)?;
        Ok(metrics)
    }

    /// Like [`BenchmarkRunner::run`], also returning the final simulator.
    pub fn run_with_simulator(scenario: &Scenario) -> DrapeResult<(BenchmarkMetrics, Simulator)> {
        let mut sim = Self::prepare(scenario)?;
        let skin = Self::body_skin(scenario);

        let mut tick_times: Vec<f64> = Vec::with_capacity(scenario.ticks as usize);
        let mut total_contacts = 0;

        let total_start = Instant::now();
        for _ in 0..scenario.ticks {
            let mut frame = FrameInput::new(Mat4::IDENTITY);
            if let Some(skin) = skin.as_ref() {
                frame = frame.with_body(skin);
            }
            let report = sim.step(scenario.dt, &mut frame)?;
            tick_times.push(report.wall_time);
            total_contacts += report.contacts;
        }
        let total_wall_time = total_start.elapsed().as_secs_f64();

        let metrics = Self::collect(scenario, &sim, &tick_times, total_wall_time, total_contacts);
        tracing::info!(
            scenario = scenario.kind.name(),
            ticks = scenario.ticks,
            wall_s = total_wall_time,
            "Benchmark complete"
        );
        Ok((metrics, sim))
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> DrapeResult<Vec<BenchmarkMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind)))
            .collect()
    }

    fn collect(
        scenario: &Scenario,
        sim: &Simulator,
        tick_times: &[f64],
        total_wall_time: f64,
        total_contacts: usize,
    ) -> BenchmarkMetrics {
        let (final_kinetic_energy, max_displacement, max_stretch) = match sim.garment() {
            Some(garment) => {
                let state = garment.state();
                let displacement = state
                    .positions
                    .iter()
                    .zip(&scenario.garment.positions)
                    .map(|(p, p0)| p.distance(*p0))
                    .fold(0.0f32, f32::max);
                let stretch = garment
                    .edges()
                    .iter()
                    .filter(|e| e.length > 0.0)
                    .map(|e| {
                        let len = state.positions[e.start as usize]
                            .distance(state.positions[e.end as usize]);
                        (len - e.length).abs() / e.length
                    })
                    .fold(0.0f32, f32::max);
                (state.kinetic_energy(), displacement, stretch)
            }
            None => (0.0, 0.0, 0.0),
        };

        let avg = if tick_times.is_empty() {
            0.0
        } else {
            tick_times.iter().sum::<f64>() / tick_times.len() as f64
        };
        let min = tick_times.iter().copied().fold(f64::MAX, f64::min);
        let max = tick_times.iter().copied().fold(0.0, f64::max);

        BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            total_wall_time,
            ticks: scenario.ticks,
            avg_tick_time: avg,
            min_tick_time: if tick_times.is_empty() { 0.0 } else { min },
            max_tick_time: max,
            final_kinetic_energy,
            max_displacement,
            max_stretch,
            total_contacts,
            vertex_count: scenario.garment.vertex_count(),
            triangle_count: scenario.garment.triangle_count(),
        }
    }
}
