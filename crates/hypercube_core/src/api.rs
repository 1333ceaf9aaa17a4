//! JSON boundary for host engines.
//!
//! A host that renders the puzzle itself can ask for a plan without running
//! a [`crate::module::HypercubeModule`]: it sends the current facing, the
//! slot rotations queued so far and the three targets, and gets back the
//! simplified press sequence the driver would issue.

use serde::{Deserialize, Serialize};

use crate::compiler::{compile, format_presses, Button};
use crate::face_map::FaceMap;
use crate::frame::ObserverFacing;
use crate::geometry::{AbstractRotation, DigitRotation};
use crate::planner::{plan, SolveTargets};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub schema_version: u8,
    /// Current observer facing, `0..4` (front, right, back, left).
    #[serde(default)]
    pub facing: u8,
    /// Slot rotations submitted since the last reset, oldest first.
    #[serde(default)]
    pub queued: Vec<DigitRotation>,
    pub targets: SolveTargets,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub schema_version: u8,
    pub rotations: Vec<AbstractRotation>,
    pub presses: Vec<Button>,
    /// Human-readable press chain, e.g. `"CLOCK LEFT IN"`.
    pub press_text: String,
    pub offset_facing: ObserverFacing,
    pub pre_shift: i32,
}

/// Plans and compiles a solve for the request payload.
pub fn plan_solve_json(request_json: &str) -> Result<String, String> {
    let request: PlanRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }
    if request.facing > 3 {
        return Err(format!("Invalid facing: {} (expected 0..4)", request.facing));
    }

    let mut map = FaceMap::from_queued(&request.queued);
    let rotations = plan(&mut map, &request.targets).map_err(|e| e.to_string())?;
    let compiled = compile(rotations, ObserverFacing::new(request.facing));

    let response = PlanResponse {
        schema_version: SCHEMA_VERSION,
        press_text: format_presses(&compiled.presses),
        rotations: compiled.rotations,
        presses: compiled.presses,
        offset_facing: compiled.offset_facing,
        pre_shift: compiled.pre_shift,
    };

    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}
