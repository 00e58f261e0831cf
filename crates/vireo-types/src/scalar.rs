//! Scalar type alias for the simulation.
//!
//! Scheduling and time bookkeeping run in double precision so that
//! accumulated node time does not drift over long runs.

/// The floating-point type used for time, step sizes, and mechanical data.
pub type Scalar = f64;
