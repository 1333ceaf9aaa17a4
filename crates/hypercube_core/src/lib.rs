//! # hypercube_core - Orientation Hypercube Puzzle Core
//!
//! Models a four-dimensional hypercube puzzle whose on-screen controls are
//! relative to an observer that may pivot around the cube after a press, and
//! plans and drives a solve from any reachable state.
//!
//! ## Features
//! - Observer-relative axis frame with perspective shifts
//! - Face-permutation replay of queued slot rotations
//! - Greedy rotation planner that locks solved axes
//! - Button-press compiler with cancellation and trailing-pivot trimming
//! - Auto-solve driver that compensates for observer drift mid-sequence
//! - Seeded, reproducible sessions and a JSON API for host engines

pub mod api;
pub mod compiler;
pub mod config;
pub mod drift;
pub mod driver;
pub mod error;
pub mod face_map;
pub mod frame;
pub mod geometry;
pub mod module;
pub mod planner;

// Re-export main API
pub use api::{plan_solve_json, PlanRequest, PlanResponse};
pub use compiler::{compile, Button, ButtonPressSequence, CompiledPlan};
pub use config::ModuleConfig;
pub use driver::{AutoSolveDriver, DriverPhase, PuzzleControls, SolveReport, SubmitOutcome};
pub use error::{HypercubeError, Result};
pub use face_map::{FaceMap, FaceName};
pub use frame::{AxisFrame, ObserverFacing, ObserverState, Perspective};
pub use geometry::{AbstractRotation, Axis, DigitRotation, Sign, SignedAxis};
pub use module::{Control, HypercubeModule};
pub use planner::{plan, RotationSequence, SolveTarget, SolveTargets};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON API schema version
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(SCHEMA_VERSION, 1);
    }
}
