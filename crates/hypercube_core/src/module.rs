//! Interactive puzzle session.
//!
//! Owns the perspective shared by manual input and the auto-solver, the
//! rotations queued since the last submit, and the mode flags. Every handler
//! takes `&mut self`, so only one press is ever in flight.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::compiler::Button;
use crate::config::ModuleConfig;
use crate::drift::{Drift, DriftSource, RandomDrift};
use crate::driver::{PuzzleControls, SubmitOutcome};
use crate::error::{HypercubeError, Result};
use crate::face_map::FaceMap;
use crate::frame::{ObserverFacing, Perspective};
use crate::geometry::DigitRotation;
use crate::planner::SolveTargets;

/// One control as named by the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Rotate(Button),
    Submit,
    TogglePreview,
}

impl FromStr for Control {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SET" => Ok(Control::Submit),
            "TOGGLE" => Ok(Control::TogglePreview),
            _ => s.parse().map(Control::Rotate),
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Control::Rotate(button) => write!(f, "{button}"),
            Control::Submit => f.write_str("SET"),
            Control::TogglePreview => f.write_str("TOGGLE"),
        }
    }
}

/// Parses a space separated press chain, e.g. `right counter left set`.
pub fn parse_chain(text: &str, max_presses: usize) -> Result<Vec<Control>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Err(HypercubeError::invalid_input("no buttons were specified"));
    }
    if words.len() > max_presses {
        return Err(HypercubeError::invalid_input(format!(
            "cannot chain more than {max_presses} presses at once"
        )));
    }
    words.into_iter().map(str::parse).collect()
}

pub struct HypercubeModule<D: DriftSource = RandomDrift> {
    id: usize,
    perspective: Perspective,
    initial_facing: ObserverFacing,
    queued: Vec<DigitRotation>,
    targets: SolveTargets,
    drift: D,
    drift_enabled: bool,
    preview: bool,
    recovery: bool,
    busy: bool,
    solved: bool,
    strikes: u32,
}

impl HypercubeModule<RandomDrift> {
    /// Session seeded entirely from `config.seed`.
    pub fn new(id: usize, config: &ModuleConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let targets = SolveTargets::generate(&mut rng);
        let drift = RandomDrift::new(rng.gen());
        let pivots = if config.randomize_initial_facing { rng.gen_range(0..4) } else { 0 };

        let mut module = Self::with_parts(id, targets, drift, pivots);
        module.drift_enabled = config.drift_enabled;
        Ok(module)
    }
}

impl<D: DriftSource> HypercubeModule<D> {
    /// Session with explicit targets and drift. The observer starts
    /// `initial_pivots` forward pivots away from the front.
    pub fn with_parts(id: usize, targets: SolveTargets, drift: D, initial_pivots: u8) -> Self {
        let mut perspective = Perspective::new();
        for _ in 0..initial_pivots {
            perspective.pivot(false);
        }

        let module = Self {
            id,
            perspective,
            initial_facing: perspective.facing(),
            queued: Vec::new(),
            targets,
            drift,
            drift_enabled: true,
            preview: false,
            recovery: false,
            busy: false,
            solved: false,
            strikes: 0,
        };
        module.log("-=-=-=- Start -=-=-=-");
        module.log(format!("The observer starts off facing the {} face.", module.initial_facing));
        module.log(format!("Targets: {}", module.describe_targets()));
        module
    }

    fn log(&self, message: impl fmt::Display) {
        log::info!("[Orientation Hypercube #{}] {}", self.id, message);
    }

    fn describe_targets(&self) -> String {
        self.targets
            .iter()
            .map(|t| format!("{} to {}", t.face, t.goal))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn perspective(&self) -> &Perspective {
        &self.perspective
    }

    pub fn initial_facing(&self) -> ObserverFacing {
        self.initial_facing
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    /// Set by the rendering layer while an animation is running.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Handles one rotation button. Returns the slot rotation to animate.
    /// In preview mode the rotation is shown in the identity frame and
    /// nothing is queued.
    pub fn press_rotation(&mut self, button: Button) -> Result<DigitRotation> {
        if self.busy || self.recovery || self.solved {
            log::debug!("[Orientation Hypercube #{}] Ignored {button}", self.id);
            return Err(HypercubeError::precondition(format!(
                "{button} has no effect right now"
            )));
        }

        if self.preview {
            return Ok(self.perspective.resolve(button.rotation(), true));
        }

        self.log(format!("Pressed {}.", button.label().to_lowercase()));
        let digits = self.perspective.resolve(button.rotation(), false);
        self.queued.push(digits);

        if !button.is_pivot() && self.drift_enabled {
            let reverse = match self.drift.next_drift() {
                Drift::Stay => None,
                Drift::Forward => Some(false),
                Drift::Reverse => Some(true),
            };
            if let Some(reverse) = reverse {
                self.perspective.pivot(reverse);
                self.log(format!(
                    "The observer moved to face the {}.",
                    self.perspective.facing()
                ));
            }
        }
        Ok(digits)
    }

    /// Clears recovery, or replays the queued rotations and checks the
    /// targets. A mismatch strikes and enters recovery.
    pub fn press_submit(&mut self) -> Result<SubmitOutcome> {
        if self.busy || self.solved {
            return Err(HypercubeError::precondition("submit has no effect right now"));
        }
        if self.recovery {
            self.end_recovery();
            return Ok(SubmitOutcome::RecoveryCleared);
        }
        if self.preview {
            return Err(HypercubeError::precondition("cannot submit in preview mode"));
        }

        self.log("-=-=-=- Submit -=-=-=-");
        let map = FaceMap::from_queued(&self.queued);
        self.queued.clear();

        self.log("The submitted rotations resulted in the following map:");
        for target in self.targets.iter() {
            self.log(format!("{} to {}.", target.face, map.position(target.face)));
        }

        if self.targets.is_satisfied_by(&map) {
            self.solved = true;
            self.log("Submitted the correct orientation!");
            self.log("-=-=-=- Solved -=-=-=-");
            return Ok(SubmitOutcome::Solved);
        }

        self.strikes += 1;
        self.recovery = true;
        self.log("✕ The faces did not get mapped to the correct places! Strike!");
        self.log("-=-=-=- Reset -=-=-=-");
        Err(HypercubeError::SolveMismatch {
            expected: self.targets.describe_goals(),
            actual: self.targets.describe_positions(&map),
        })
    }

    /// Switches preview mode. Refused while rotations are queued.
    pub fn toggle_preview_mode(&mut self) -> Result<()> {
        if self.busy || self.solved {
            return Err(HypercubeError::precondition("cannot change mode right now"));
        }
        if !self.queued.is_empty() {
            return Err(HypercubeError::precondition(
                "cannot change mode while rotations are queued",
            ));
        }
        if self.recovery {
            self.end_recovery();
        }
        self.preview = !self.preview;
        log::debug!(
            "[Orientation Hypercube #{}] Preview mode {}",
            self.id,
            if self.preview { "on" } else { "off" }
        );
        Ok(())
    }

    pub fn apply(&mut self, control: Control) -> Result<()> {
        match control {
            Control::Rotate(button) => self.press_rotation(button).map(|_| ()),
            Control::Submit => self.press_submit().map(|_| ()),
            Control::TogglePreview => self.toggle_preview_mode(),
        }
    }

    fn end_recovery(&mut self) {
        self.recovery = false;
        log::debug!("[Orientation Hypercube #{}] Recovery acknowledged", self.id);
    }
}

impl<D: DriftSource> PuzzleControls for HypercubeModule<D> {
    fn press(&mut self, button: Button) -> Result<()> {
        self.press_rotation(button).map(|_| ())
    }

    fn submit(&mut self) -> Result<SubmitOutcome> {
        self.press_submit()
    }

    fn toggle_preview(&mut self) -> Result<()> {
        self.toggle_preview_mode()
    }

    fn facing(&self) -> ObserverFacing {
        self.perspective.facing()
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn is_solved(&self) -> bool {
        self.solved
    }

    fn in_preview(&self) -> bool {
        self.preview
    }

    fn in_recovery(&self) -> bool {
        self.recovery
    }

    fn queued_rotations(&self) -> &[DigitRotation] {
        &self.queued
    }

    fn targets(&self) -> &SolveTargets {
        &self.targets
    }
}
