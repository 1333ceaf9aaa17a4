//! Rotation planner.
//!
//! Solves the three targets one at a time in priority order. Each target
//! costs zero, one, or two quarter turns; an axis is locked once a target
//! lands on it so later targets never disturb earlier ones.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{HypercubeError, Result};
use crate::face_map::{FaceIdentity, FaceMap, FacePosition};
use crate::geometry::{AbstractRotation, Axis, SignedAxis};

pub type RotationSequence = Vec<AbstractRotation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveTarget {
    pub face: FaceIdentity,
    pub goal: FacePosition,
}

impl SolveTarget {
    pub fn new(face: FaceIdentity, goal: FacePosition) -> Self {
        Self { face, goal }
    }
}

/// The three face targets, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SolveTarget>", into = "Vec<SolveTarget>")]
pub struct SolveTargets([SolveTarget; 3]);

impl SolveTargets {
    pub fn new(targets: [SolveTarget; 3]) -> Result<Self> {
        let targets = Self(targets);
        targets.validate()?;
        Ok(targets)
    }

    /// Scrambles an identity map with random quarter turns and reads the
    /// targets off three distinct faces. Never returns an already solved set.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let faces = SignedAxis::all();
        loop {
            let mut map = FaceMap::identity();
            for _ in 0..rng.gen_range(1..12) {
                let from = rng.gen_range(0..4);
                let to = (from + rng.gen_range(1..4)) % 4;
                map.apply(AbstractRotation::of(Axis::ALL[from], Axis::ALL[to]));
            }

            let chosen: Vec<FaceIdentity> = faces.choose_multiple(rng, 3).copied().collect();
            let targets = Self([
                SolveTarget::new(chosen[0], map.position(chosen[0])),
                SolveTarget::new(chosen[1], map.position(chosen[1])),
                SolveTarget::new(chosen[2], map.position(chosen[2])),
            ]);
            if !targets.is_satisfied_by(&FaceMap::identity()) {
                return targets;
            }
        }
    }

    /// Faces must be distinct and the goals must be reachable by some
    /// rotation: opposite faces need opposite goals, faces on different axes
    /// need goals on different axes.
    pub fn validate(&self) -> Result<()> {
        for (i, a) in self.0.iter().enumerate() {
            for b in &self.0[i + 1..] {
                if a.face == b.face {
                    return Err(HypercubeError::invalid_input(format!(
                        "face {} is targeted twice",
                        a.face
                    )));
                }
                let consistent = if a.face.axis == b.face.axis {
                    b.goal == a.goal.opposite()
                } else {
                    a.goal.axis != b.goal.axis
                };
                if !consistent {
                    return Err(HypercubeError::invalid_input(format!(
                        "targets {}->{} and {}->{} cannot both hold",
                        a.face, a.goal, b.face, b.goal
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolveTarget> {
        self.0.iter()
    }

    pub fn is_satisfied_by(&self, map: &FaceMap) -> bool {
        self.0.iter().all(|t| map.position(t.face) == t.goal)
    }

    /// Goals formatted as `+X +Y -Z`, or the current positions under `map`.
    pub fn describe_goals(&self) -> String {
        self.0.iter().map(|t| t.goal.to_string()).collect::<Vec<_>>().join(" ")
    }

    pub fn describe_positions(&self, map: &FaceMap) -> String {
        self.0
            .iter()
            .map(|t| map.position(t.face).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<Vec<SolveTarget>> for SolveTargets {
    type Error = HypercubeError;

    fn try_from(value: Vec<SolveTarget>) -> Result<Self> {
        let targets: [SolveTarget; 3] = value.try_into().map_err(|v: Vec<SolveTarget>| {
            HypercubeError::invalid_input(format!("expected 3 targets, got {}", v.len()))
        })?;
        SolveTargets::new(targets)
    }
}

impl From<SolveTargets> for Vec<SolveTarget> {
    fn from(value: SolveTargets) -> Self {
        value.0.to_vec()
    }
}

/// Plans the rotations taking every target face to its goal. `map` is left
/// in the solved state.
pub fn plan(map: &mut FaceMap, targets: &SolveTargets) -> Result<RotationSequence> {
    let mut unsolved: Vec<Axis> = Axis::ALL.to_vec();
    let mut sequence = RotationSequence::new();

    for target in targets.iter() {
        let current = map.position(target.face);
        let goal = target.goal;

        if current != goal {
            if current.axis == goal.axis {
                // Half turn through the first free axis.
                let pivot = unsolved
                    .iter()
                    .copied()
                    .find(|axis| *axis != current.axis)
                    .ok_or_else(|| {
                        HypercubeError::precondition(format!(
                            "no free axis to flip {} onto {}",
                            current, goal
                        ))
                    })?;
                let rotation = AbstractRotation::of(current.axis, pivot);
                for _ in 0..2 {
                    map.apply(rotation);
                    sequence.push(rotation);
                }
            } else {
                let rotation = if current.sign == goal.sign {
                    AbstractRotation::of(current.axis, goal.axis)
                } else {
                    AbstractRotation::of(goal.axis, current.axis)
                };
                map.apply(rotation);
                sequence.push(rotation);
            }
        }

        unsolved.retain(|axis| *axis != goal.axis);
    }

    log::debug!(
        "Planned {} rotation(s): {}",
        sequence.len(),
        sequence.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" ")
    );
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sa(s: &str) -> SignedAxis {
        s.parse().unwrap()
    }

    fn targets(pairs: [(&str, &str); 3]) -> SolveTargets {
        SolveTargets::new(pairs.map(|(f, g)| SolveTarget::new(sa(f), sa(g)))).unwrap()
    }

    fn names(seq: &RotationSequence) -> Vec<String> {
        seq.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_already_solved_emits_nothing() {
        let mut map = FaceMap::identity();
        let t = targets([("+X", "+X"), ("+Y", "+Y"), ("-Z", "-Z")]);
        assert!(plan(&mut map, &t).unwrap().is_empty());
    }

    #[test]
    fn test_sign_mismatch_reverses_rotation() {
        // +X to -Z: different axis, different sign, so the rotation is Z->X.
        let mut map = FaceMap::identity();
        let t = targets([("+X", "-Z"), ("+Y", "+Y"), ("+W", "+W")]);
        let seq = plan(&mut map, &t).unwrap();
        assert_eq!(names(&seq), vec!["ZX"]);
        assert_eq!(map.position(sa("+X")), sa("-Z"));
    }

    #[test]
    fn test_same_sign_rotates_forward() {
        let mut map = FaceMap::identity();
        let t = targets([("+Y", "+W"), ("+X", "+X"), ("+Z", "+Z")]);
        let seq = plan(&mut map, &t).unwrap();
        assert_eq!(names(&seq), vec!["YW"]);
        assert!(t.is_satisfied_by(&map));
    }

    #[test]
    fn test_flip_uses_first_free_axis() {
        // +X to -X with all axes free: pivot is Y (first axis other than X).
        let mut map = FaceMap::identity();
        let t = targets([("+X", "-X"), ("+Z", "+Z"), ("+W", "+W")]);
        let seq = plan(&mut map, &t).unwrap();
        assert_eq!(names(&seq), vec!["XY", "XY"]);
        assert!(t.is_satisfied_by(&map));
    }

    #[test]
    fn test_flip_skips_locked_axes() {
        // First target locks X; the flip of Y must pivot through Z.
        let mut map = FaceMap::identity();
        let t = targets([("+X", "+X"), ("+Y", "-Y"), ("+W", "-W")]);
        let seq = plan(&mut map, &t).unwrap();
        assert_eq!(names(&seq), vec!["YZ", "YZ", "WZ", "WZ"]);
        assert!(t.is_satisfied_by(&map));
    }

    #[test]
    fn test_validate_rejects_inconsistent_targets() {
        let dup = [("+X", "+Y"), ("+X", "+Y"), ("+Z", "+Z")]
            .map(|(f, g)| SolveTarget::new(sa(f), sa(g)));
        assert!(SolveTargets::new(dup).is_err());

        let same_goal_axis = [("+X", "+Y"), ("+Z", "-Y"), ("+W", "+W")]
            .map(|(f, g)| SolveTarget::new(sa(f), sa(g)));
        assert!(SolveTargets::new(same_goal_axis).is_err());

        let not_opposite = [("+X", "+Y"), ("-X", "+Z"), ("+W", "+W")]
            .map(|(f, g)| SolveTarget::new(sa(f), sa(g)));
        assert!(SolveTargets::new(not_opposite).is_err());
    }

    #[test]
    fn test_targets_serde_requires_three() {
        let json = r#"[{"face":"+X","goal":"-Z"},{"face":"+Y","goal":"+Y"}]"#;
        assert!(serde_json::from_str::<SolveTargets>(json).is_err());

        let json = r#"[{"face":"+X","goal":"-Z"},{"face":"+Y","goal":"+Y"},{"face":"-W","goal":"-W"}]"#;
        let parsed: SolveTargets = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.describe_goals(), "-Z +Y -W");
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let a = SolveTargets::generate(&mut ChaCha8Rng::seed_from_u64(7));
        let b = SolveTargets::generate(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.validate().is_ok());
        assert!(!a.is_satisfied_by(&FaceMap::identity()));
    }

    proptest! {
        #[test]
        fn prop_plan_reaches_every_target(
            scramble_seed in any::<u64>(),
            target_seed in any::<u64>(),
            scramble_len in 0usize..16
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(scramble_seed);
            let mut map = FaceMap::identity();
            for _ in 0..scramble_len {
                let from = rng.gen_range(0..4);
                let to = (from + rng.gen_range(1..4)) % 4;
                map.apply(AbstractRotation::of(Axis::ALL[from], Axis::ALL[to]));
            }
            let start = map.clone();
            let targets = SolveTargets::generate(&mut ChaCha8Rng::seed_from_u64(target_seed));

            let seq = plan(&mut map, &targets).unwrap();
            prop_assert!(seq.len() <= 6);
            prop_assert!(targets.is_satisfied_by(&map));

            // Replaying the sequence from the start gives the same map.
            let mut replay = start;
            for r in &seq {
                replay.apply(*r);
            }
            prop_assert_eq!(replay, map);
        }
    }
}
