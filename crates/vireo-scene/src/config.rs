//! Simulation configuration.
//!
//! Parameters of the driving loop: step size, step count, the gravity
//! used by the built-in gravity model, and the ground plane height.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vireo_types::constants::{DEFAULT_DT, DEFAULT_STEPS, GRAVITY};
use vireo_types::{Scalar, VireoError, VireoResult};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step size in seconds. 0 means every node keeps its own step size.
    pub dt: Scalar,

    /// Number of steps run by [`Simulation::run`](crate::Simulation::run)
    /// drivers that do not pass their own count.
    pub steps: u32,

    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [Scalar; 3],

    /// Height of the ground plane (y), used by collision pipelines.
    pub ground_height: Scalar,

    /// Attach a tracing sink to the telemetry bus.
    pub telemetry: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            steps: DEFAULT_STEPS,
            gravity: [0.0, -GRAVITY, 0.0],
            ground_height: 0.0,
            telemetry: false,
        }
    }
}

impl SimulationConfig {
    /// Creates a config for debugging (few steps, telemetry on).
    pub fn debug() -> Self {
        Self {
            steps: 5,
            telemetry: true,
            ..Default::default()
        }
    }

    /// Parses a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> VireoResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| VireoError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> VireoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> VireoResult<String> {
        toml::to_string(self).map_err(|e| VireoError::Serialization(e.to_string()))
    }

    /// Checks value ranges.
    pub fn validate(&self) -> VireoResult<()> {
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(VireoError::InvalidConfig(format!(
                "dt must be finite and >= 0, got {}",
                self.dt
            )));
        }
        if self.steps == 0 {
            return Err(VireoError::InvalidConfig("steps must be at least 1".into()));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(VireoError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !self.ground_height.is_finite() {
            return Err(VireoError::InvalidConfig(format!(
                "ground_height must be finite, got {}",
                self.ground_height
            )));
        }
        Ok(())
    }
}
