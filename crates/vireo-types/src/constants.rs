//! Simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default per-node step size (seconds) for freshly created nodes.
pub const DEFAULT_DT: Scalar = 0.01;

/// Default number of steps run by the CLI driver.
pub const DEFAULT_STEPS: u32 = 100;

/// Epsilon for floating-point comparisons.
pub const EPSILON: Scalar = 1.0e-12;
