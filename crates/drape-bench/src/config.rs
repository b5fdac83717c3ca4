//! TOML run configuration for the `simulate` command.
//!
//! ```toml
//! scenario = "sphere_drape"
//! ticks = 240
//! dt = 0.016666668
//!
//! [solver]
//! iterations = 40
//! front_radius = 0.005
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use drape_solver::SolverConfig;
use drape_types::constants::DEFAULT_DT;
use drape_types::{DrapeError, DrapeResult};

use crate::scenarios::{Scenario, ScenarioKind};

/// One simulation run: which scenario, for how long, with which solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub scenario: ScenarioKind,
    pub ticks: u32,
    /// Tick length (seconds).
    pub dt: f32,
    pub solver: SolverConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioKind::HangingSheet,
            ticks: 120,
            dt: DEFAULT_DT,
            solver: SolverConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> DrapeResult<()> {
        if self.ticks == 0 {
            return Err(DrapeError::InvalidConfig("ticks must be > 0".into()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(DrapeError::InvalidConfig(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        self.solver.validate()
    }

    /// Parses and validates a TOML run configuration.
    pub fn from_toml_str(source: &str) -> DrapeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| DrapeError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> DrapeResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> DrapeResult<String> {
        toml::to_string_pretty(self).map_err(|e| DrapeError::Serialization(e.to_string()))
    }

    /// The configured scenario with this run's solver and timing.
    pub fn scenario(&self) -> Scenario {
        Scenario::from_kind(self.scenario)
            .with_config(self.solver.clone())
            .with_timing(self.ticks, self.dt)
    }
}
