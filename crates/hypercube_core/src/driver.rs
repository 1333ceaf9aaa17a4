//! Auto-solve driver.
//!
//! Plans from the live session state, then issues the compiled presses one by
//! one. Drift cannot be known in advance, so after each press the driver
//! reads the observer facing and patches the rest of the plan: a pending
//! LEFT/RIGHT that already cancels the drift is skipped, a RIGHT RIGHT pair is
//! folded into one LEFT (and the mirror), otherwise a corrective press is
//! issued on the spot. Drift after the last press is deferred into the
//! closing correction.

use serde::{Deserialize, Serialize};

use crate::compiler::{self, Button, CompiledPlan};
use crate::error::{HypercubeError, Result};
use crate::face_map::FaceMap;
use crate::frame::ObserverFacing;
use crate::geometry::DigitRotation;
use crate::planner::{self, SolveTargets};

/// Result of a submit press that did not strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Solved,
    RecoveryCleared,
}

/// What the driver needs from the puzzle session. Every action returns once
/// it has settled, so reads made between calls are always valid.
pub trait PuzzleControls {
    fn press(&mut self, button: Button) -> Result<()>;

    /// Submits the queued rotations, or acknowledges a strike while
    /// recovering. A wrong orientation is `SolveMismatch`.
    fn submit(&mut self) -> Result<SubmitOutcome>;

    fn toggle_preview(&mut self) -> Result<()>;

    fn facing(&self) -> ObserverFacing;

    fn is_busy(&self) -> bool;

    fn is_solved(&self) -> bool;

    fn in_preview(&self) -> bool;

    fn in_recovery(&self) -> bool;

    fn queued_rotations(&self) -> &[DigitRotation];

    fn targets(&self) -> &SolveTargets;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriverPhase {
    #[default]
    Idle,
    Aligning,
    Executing,
    Correcting,
    Done,
}

/// Compiled presses with a cursor, so the driver can look ahead and skip.
#[derive(Debug, Clone, Default)]
pub struct PressQueue {
    presses: Vec<Button>,
    cursor: usize,
}

impl PressQueue {
    pub fn new(presses: Vec<Button>) -> Self {
        Self { presses, cursor: 0 }
    }

    pub fn current(&self) -> Option<Button> {
        self.peek(0)
    }

    /// Press `offset` positions after the cursor.
    pub fn peek(&self, offset: usize) -> Option<Button> {
        self.presses.get(self.cursor + offset).copied()
    }

    pub fn advance(&mut self, steps: usize) {
        self.cursor = (self.cursor + steps).min(self.presses.len());
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.presses.len()
    }
}

/// How one drift was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compensation {
    /// The next queued press already cancelled the drift and was skipped.
    ConsumedNext { at: usize, button: Button },
    /// Two queued presses were replaced by one press of the opposite button.
    Folded { at: usize, pressed: Button },
    /// A corrective press was issued.
    Pressed { at: usize, button: Button },
    /// Drift after the last press, carried into the closing correction.
    Deferred { shift: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub plan: CompiledPlan,
    pub issued: Vec<Button>,
    pub compensations: Vec<Compensation>,
    pub closing: Vec<Button>,
}

#[derive(Debug, Default)]
pub struct AutoSolveDriver {
    phase: DriverPhase,
    issued: Vec<Button>,
    compensations: Vec<Compensation>,
}

impl AutoSolveDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Drops the current solve. Presses already issued stay applied.
    pub fn abort(&mut self) {
        if self.phase != DriverPhase::Idle {
            log::info!("Auto-solve aborted after {} press(es)", self.issued.len());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = DriverPhase::Idle;
        self.issued.clear();
        self.compensations.clear();
    }

    /// Plans, executes and submits. Any error returns the driver to idle.
    pub fn run<C: PuzzleControls>(&mut self, controls: &mut C) -> Result<SolveReport> {
        let plan = self.prepare(controls)?;
        self.execute(controls, plan)
    }

    /// Brings the session into a rotatable state and compiles a plan from it.
    pub fn prepare<C: PuzzleControls>(&mut self, controls: &mut C) -> Result<CompiledPlan> {
        if matches!(
            self.phase,
            DriverPhase::Aligning | DriverPhase::Executing | DriverPhase::Correcting
        ) {
            return Err(HypercubeError::precondition("an auto-solve is already running"));
        }
        if controls.is_busy() {
            return Err(HypercubeError::precondition("puzzle is busy"));
        }
        if controls.is_solved() {
            return Err(HypercubeError::precondition("puzzle is already solved"));
        }

        self.reset();
        self.phase = DriverPhase::Aligning;

        let result = self.align_and_plan(controls);
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn align_and_plan<C: PuzzleControls>(&mut self, controls: &mut C) -> Result<CompiledPlan> {
        if controls.in_preview() {
            log::debug!("Leaving preview mode before solving");
            controls.toggle_preview()?;
        }
        if controls.in_recovery() {
            log::debug!("Acknowledging strike before solving");
            controls.submit()?;
        }

        let mut map = FaceMap::from_queued(controls.queued_rotations());
        let rotations = planner::plan(&mut map, controls.targets())?;
        Ok(compiler::compile(rotations, controls.facing()))
    }

    /// Issues `plan` against the session, compensating drift as it happens.
    pub fn execute<C: PuzzleControls>(
        &mut self,
        controls: &mut C,
        plan: CompiledPlan,
    ) -> Result<SolveReport> {
        self.phase = DriverPhase::Executing;
        let result = self.execute_inner(controls, plan);
        match &result {
            Ok(_) => self.phase = DriverPhase::Done,
            Err(err) => {
                log::info!("Auto-solve stopped: {err}");
                self.reset();
            }
        }
        result
    }

    fn execute_inner<C: PuzzleControls>(
        &mut self,
        controls: &mut C,
        plan: CompiledPlan,
    ) -> Result<SolveReport> {
        let mut queue = PressQueue::new(plan.presses.clone());
        let mut offset = plan.offset_facing;
        let mut pre_shift = plan.pre_shift;

        log::info!(
            "Auto-solving with {} press(es): {}",
            queue.len(),
            compiler::format_presses(&plan.presses)
        );

        while let Some(button) = queue.current() {
            self.issue(controls, button)?;

            match controls.facing().delta_since(offset) {
                1 => self.compensate(
                    controls,
                    &mut queue,
                    &mut pre_shift,
                    Button::Left,
                    Button::Right,
                    -1,
                )?,
                3 => self.compensate(
                    controls,
                    &mut queue,
                    &mut pre_shift,
                    Button::Right,
                    Button::Left,
                    1,
                )?,
                _ => {}
            }

            offset = controls.facing();
            queue.advance(1);
        }

        self.phase = DriverPhase::Correcting;
        let closing = compiler::closing_correction(offset.index() as i32 + pre_shift);
        for button in &closing {
            self.issue(controls, *button)?;
        }

        controls.submit()?;

        Ok(SolveReport {
            plan,
            issued: self.issued.clone(),
            compensations: self.compensations.clone(),
            closing,
        })
    }

    /// `counter` undoes the drift by itself, two `fix` presses equal one
    /// `counter`, and `fix` is what to press when nothing can be reused.
    fn compensate<C: PuzzleControls>(
        &mut self,
        controls: &mut C,
        queue: &mut PressQueue,
        pre_shift: &mut i32,
        counter: Button,
        fix: Button,
        deferral: i32,
    ) -> Result<()> {
        let at = queue.position();

        let Some(next) = queue.peek(1) else {
            *pre_shift += deferral;
            self.compensations.push(Compensation::Deferred { shift: deferral });
            return Ok(());
        };

        if next == counter {
            queue.advance(1);
            self.compensations.push(Compensation::ConsumedNext { at, button: next });
        } else if next == fix && queue.peek(2) == Some(fix) {
            self.issue(controls, counter)?;
            queue.advance(2);
            self.compensations.push(Compensation::Folded { at, pressed: counter });
        } else {
            self.issue(controls, fix)?;
            self.compensations.push(Compensation::Pressed { at, button: fix });
        }
        Ok(())
    }

    fn issue<C: PuzzleControls>(&mut self, controls: &mut C, button: Button) -> Result<()> {
        controls.press(button)?;
        self.issued.push(button);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SignedAxis;
    use crate::planner::SolveTarget;
    use std::collections::VecDeque;
    use Button::*;

    /// Records presses and applies scripted facing steps after non-pivot
    /// presses.
    struct FakeControls {
        facing: ObserverFacing,
        steps: VecDeque<i8>,
        pressed: Vec<Button>,
        submits: usize,
        queued: Vec<DigitRotation>,
        targets: SolveTargets,
    }

    impl FakeControls {
        fn new(steps: &[i8]) -> Self {
            let sa = |s: &str| s.parse::<SignedAxis>().unwrap();
            Self {
                facing: ObserverFacing::FRONT,
                steps: steps.iter().copied().collect(),
                pressed: Vec::new(),
                submits: 0,
                queued: Vec::new(),
                targets: SolveTargets::new([
                    SolveTarget::new(sa("+X"), sa("+X")),
                    SolveTarget::new(sa("+Y"), sa("+Y")),
                    SolveTarget::new(sa("+Z"), sa("+Z")),
                ])
                .unwrap(),
            }
        }
    }

    impl PuzzleControls for FakeControls {
        fn press(&mut self, button: Button) -> Result<()> {
            self.pressed.push(button);
            if !button.is_pivot() {
                let step = self.steps.pop_front().unwrap_or(0);
                self.facing = ObserverFacing::new((self.facing.index() as i8 + 4 + step) as u8);
            }
            Ok(())
        }

        fn submit(&mut self) -> Result<SubmitOutcome> {
            self.submits += 1;
            Ok(SubmitOutcome::Solved)
        }

        fn toggle_preview(&mut self) -> Result<()> {
            Ok(())
        }

        fn facing(&self) -> ObserverFacing {
            self.facing
        }

        fn is_busy(&self) -> bool {
            false
        }

        fn is_solved(&self) -> bool {
            false
        }

        fn in_preview(&self) -> bool {
            false
        }

        fn in_recovery(&self) -> bool {
            false
        }

        fn queued_rotations(&self) -> &[DigitRotation] {
            &self.queued
        }

        fn targets(&self) -> &SolveTargets {
            &self.targets
        }
    }

    fn plan_of(presses: Vec<Button>) -> CompiledPlan {
        CompiledPlan {
            rotations: Vec::new(),
            presses,
            offset_facing: ObserverFacing::FRONT,
            pre_shift: 0,
        }
    }

    #[test]
    fn test_press_queue_cursor() {
        let mut queue = PressQueue::new(vec![Clock, Right, In]);
        assert_eq!(queue.current(), Some(Clock));
        assert_eq!(queue.peek(2), Some(In));
        assert_eq!(queue.peek(3), None);
        queue.advance(2);
        assert_eq!(queue.current(), Some(In));
        queue.advance(5);
        assert!(queue.is_exhausted());
        assert_eq!(queue.position(), 3);
    }

    #[test]
    fn test_no_drift_issues_plan_verbatim() {
        let mut controls = FakeControls::new(&[]);
        let mut driver = AutoSolveDriver::new();
        let report = driver.execute(&mut controls, plan_of(vec![Clock, Right, In])).unwrap();
        assert_eq!(controls.pressed, vec![Clock, Right, In]);
        assert!(report.compensations.is_empty());
        assert!(report.closing.is_empty());
        assert_eq!(controls.submits, 1);
        assert_eq!(driver.phase(), DriverPhase::Done);
    }

    #[test]
    fn test_forward_drift_folds_right_pair_into_left() {
        // Facing 0 -> 1 after CLOCK with RIGHT RIGHT queued next.
        let mut controls = FakeControls::new(&[1]);
        let mut driver = AutoSolveDriver::new();
        let report = driver
            .execute(&mut controls, plan_of(vec![Clock, Right, Right, In]))
            .unwrap();

        assert_eq!(report.compensations, vec![Compensation::Folded { at: 0, pressed: Left }]);
        // Facing stays 1 through the end, so one closing LEFT.
        assert_eq!(report.closing, vec![Left]);
        assert_eq!(controls.pressed, vec![Clock, Left, In, Left]);
    }

    #[test]
    fn test_reverse_drift_consumes_queued_right() {
        // Facing 0 -> 3 after CLOCK with RIGHT next: the RIGHT is skipped.
        let mut controls = FakeControls::new(&[-1]);
        let mut driver = AutoSolveDriver::new();
        let report = driver
            .execute(&mut controls, plan_of(vec![Clock, Right, Right, In]))
            .unwrap();

        assert_eq!(
            report.compensations,
            vec![Compensation::ConsumedNext { at: 0, button: Right }]
        );
        assert_eq!(report.closing, vec![Right]);
        assert_eq!(controls.pressed, vec![Clock, Right, In, Right]);
    }

    #[test]
    fn test_drift_without_reusable_press_issues_correction() {
        let mut controls = FakeControls::new(&[-1]);
        let mut driver = AutoSolveDriver::new();
        let report = driver.execute(&mut controls, plan_of(vec![Out, In])).unwrap();

        assert_eq!(report.compensations, vec![Compensation::Pressed { at: 0, button: Left }]);
        assert_eq!(controls.pressed, vec![Out, Left, In, Right]);
    }

    #[test]
    fn test_drift_on_last_press_is_deferred() {
        let mut controls = FakeControls::new(&[0, 1]);
        let mut driver = AutoSolveDriver::new();
        let report = driver.execute(&mut controls, plan_of(vec![Out, In])).unwrap();

        assert_eq!(report.compensations, vec![Compensation::Deferred { shift: -1 }]);
        // offset 1 plus deferred -1 leaves nothing to correct.
        assert!(report.closing.is_empty());
        assert_eq!(controls.pressed, vec![Out, In]);
    }

    #[test]
    fn test_closing_correction_includes_pre_shift() {
        let mut controls = FakeControls::new(&[]);
        let mut driver = AutoSolveDriver::new();
        let mut plan = plan_of(vec![In]);
        plan.pre_shift = 2;
        let report = driver.execute(&mut controls, plan).unwrap();
        assert_eq!(report.closing, vec![Left, Left]);
    }

    #[test]
    fn test_abort_returns_to_idle() {
        let mut driver = AutoSolveDriver::new();
        let mut controls = FakeControls::new(&[]);
        driver.execute(&mut controls, plan_of(vec![In])).unwrap();
        assert_eq!(driver.phase(), DriverPhase::Done);
        driver.abort();
        assert_eq!(driver.phase(), DriverPhase::Idle);
    }
}
