//! CLI command implementations.

use drape_bench::config::RunConfig;
use drape_bench::metrics::BenchmarkMetrics;
use drape_bench::runner::BenchmarkRunner;
use drape_bench::scenarios::{Scenario, ScenarioKind};
use drape_debug::snapshot::StateSnapshot;
use drape_debug::voxels::{active_voxel_wireframes, wireframes_to_json};
use drape_mesh::TriangleMesh;
use drape_sim::FrameInput;
use drape_solver::SolverConfig;
use drape_telemetry::{EventBus, TracingSink};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Run a simulation from config file.
pub fn simulate(config_path: &str, snapshot_path: Option<&str>) -> CliResult {
    println!("Drape Simulation");
    println!("────────────────");

    let config = RunConfig::load(config_path)?;
    let scenario = config.scenario();
    println!("Config:    {config_path}");
    println!(
        "Scenario:  {} ({} verts, {} tris, {} ticks)",
        scenario.kind,
        scenario.garment.vertex_count(),
        scenario.garment.triangle_count(),
        scenario.ticks,
    );
    println!();

    let mut sim = BenchmarkRunner::prepare(&scenario)?;
    sim.set_event_bus(EventBus::new().with_sink(Box::new(TracingSink::new(tracing::Level::INFO))));

    let skin = BenchmarkRunner::body_skin(&scenario);
    let mut contacts = 0;
    let mut wall_time = 0.0;
    for _ in 0..scenario.ticks {
        let mut frame = FrameInput::identity();
        if let Some(skin) = skin.as_ref() {
            frame = frame.with_body(skin);
        }
        let report = sim.step(scenario.dt, &mut frame)?;
        contacts += report.contacts;
        wall_time += report.wall_time;
    }

    let garment = sim.garment().ok_or("Simulator lost its garment")?;
    let state = garment.state();
    println!("  Wall time:     {wall_time:.3}s");
    println!("  Contacts:      {contacts}");
    println!("  Final KE:      {:.6e}", state.kinetic_energy());
    println!("  Max speed:     {:.4}m/s", state.max_speed());

    if let Some(path) = snapshot_path {
        let sim_time = f64::from(scenario.dt) * f64::from(scenario.ticks);
        StateSnapshot::capture(sim.tick_count(), sim_time, state).save(path)?;
        println!("Snapshot written to: {path}");
    }

    sim.teardown();
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, output_path: Option<&str>) -> CliResult {
    println!("Drape Benchmark Suite");
    println!("═════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        vec![scenario_name.parse()?]
    };

    let mut all_metrics = Vec::new();
    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind);
        println!(
            "Running: {} ({} verts, {} tris, {} ticks)",
            kind.name(),
            scenario.garment.vertex_count(),
            scenario.garment.triangle_count(),
            scenario.ticks,
        );

        let metrics =
            BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg tick:      {:.3}ms", metrics.avg_tick_time * 1000.0);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Max displace:  {:.4}m", metrics.max_displacement);
        println!("  Max stretch:   {:.3}%", metrics.max_stretch * 100.0);
        println!("  Contacts:      {}", metrics.total_contacts);
        println!();

        all_metrics.push(metrics);
    }

    let csv = BenchmarkMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }

    Ok(())
}

/// Inspect a state snapshot.
pub fn inspect(path: &str) -> CliResult {
    println!("Drape Snapshot Inspector");
    println!("────────────────────────");
    println!();

    let snapshot = StateSnapshot::load(path)?;

    println!("Tick:         {}", snapshot.tick);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!("Vertices:     {}", snapshot.vertex_count());

    if !snapshot.positions.is_empty() {
        let (min_y, max_y) = snapshot
            .positions
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let max_speed = snapshot
            .velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max);
        println!("Y range:      [{min_y:.4}, {max_y:.4}]");
        println!("Max speed:    {max_speed:.4}m/s");
    }

    Ok(())
}

/// Validate a run config or a mesh.
pub fn validate(path: &str) -> CliResult {
    println!("Drape Validator");
    println!("───────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating config: {path}");
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        if table.contains_key("scenario") || table.contains_key("solver") {
            RunConfig::from_toml_str(&content)?;
            println!("✅ Run config is valid.");
        } else {
            SolverConfig::from_toml_str(&content)?;
            println!("✅ Solver config is valid.");
        }
    } else if path.ends_with(".json") {
        println!("Validating mesh: {path}");
        let content = std::fs::read_to_string(path)?;
        let mesh: TriangleMesh = serde_json::from_str(&content)?;
        match mesh.validate().and_then(|()| mesh.require_non_empty("Mesh")) {
            Ok(()) => println!(
                "✅ Mesh is valid ({} verts, {} tris).",
                mesh.vertex_count(),
                mesh.triangle_count()
            ),
            Err(e) => println!("❌ Mesh validation failed: {e}"),
        }
    } else {
        println!("Unsupported file format. Use .toml (config) or .json (mesh).");
    }

    Ok(())
}

/// Run one tick of a scenario and dump its active voxels.
pub fn voxels(scenario_name: &str, output_path: &str) -> CliResult {
    let kind: ScenarioKind = scenario_name.parse()?;
    let scenario = Scenario::from_kind(kind);
    let skin = BenchmarkRunner::body_skin(&scenario)
        .ok_or_else(|| format!("Scenario '{kind}' has no collision body"))?;

    let mut sim = BenchmarkRunner::prepare(&scenario)?;
    let report = sim.step(scenario.dt, &mut FrameInput::identity().with_body(&skin))?;

    let pipeline = sim.pipeline().ok_or("Simulator has no collision pipeline")?;
    let wireframes = active_voxel_wireframes(pipeline.grid());
    std::fs::write(output_path, wireframes_to_json(&wireframes)?)?;

    println!(
        "{} active voxels ({} triangle refs, {} contacts) written to: {output_path}",
        wireframes.len(),
        report.triangle_refs,
        report.contacts,
    );
    Ok(())
}
