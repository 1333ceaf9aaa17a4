//! Observer drift sources.
//!
//! After every press other than LEFT/RIGHT the observer may stay, pivot
//! forward, or pivot in reverse. The puzzle session owns one of these.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drift {
    Stay,
    Forward,
    Reverse,
}

pub trait DriftSource {
    fn next_drift(&mut self) -> Drift;
}

/// Uniform 1-in-3 choice between staying and either pivot.
#[derive(Debug, Clone)]
pub struct RandomDrift {
    rng: ChaCha8Rng,
}

impl RandomDrift {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl DriftSource for RandomDrift {
    fn next_drift(&mut self) -> Drift {
        match self.rng.gen_range(0..3) {
            0 => Drift::Stay,
            1 => Drift::Reverse,
            _ => Drift::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDrift;

impl DriftSource for NoDrift {
    fn next_drift(&mut self) -> Drift {
        Drift::Stay
    }
}

/// Plays back a fixed list, then stays put.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDrift {
    script: VecDeque<Drift>,
}

impl ScriptedDrift {
    pub fn new(script: impl IntoIterator<Item = Drift>) -> Self {
        Self { script: script.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DriftSource for ScriptedDrift {
    fn next_drift(&mut self) -> Drift {
        self.script.pop_front().unwrap_or(Drift::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_drift_is_seeded() {
        let mut a = RandomDrift::new(42);
        let mut b = RandomDrift::new(42);
        let seq_a: Vec<Drift> = (0..32).map(|_| a.next_drift()).collect();
        let seq_b: Vec<Drift> = (0..32).map(|_| b.next_drift()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_random_drift_hits_every_outcome() {
        let mut drift = RandomDrift::new(1);
        let seen: Vec<Drift> = (0..300).map(|_| drift.next_drift()).collect();
        for outcome in [Drift::Stay, Drift::Forward, Drift::Reverse] {
            let count = seen.iter().filter(|d| **d == outcome).count();
            assert!(count > 50, "{outcome:?} drawn only {count} times");
        }
    }

    #[test]
    fn test_scripted_drift_then_stays() {
        let mut drift = ScriptedDrift::new([Drift::Reverse, Drift::Forward]);
        assert_eq!(drift.next_drift(), Drift::Reverse);
        assert_eq!(drift.next_drift(), Drift::Forward);
        assert_eq!(drift.remaining(), 0);
        assert_eq!(drift.next_drift(), Drift::Stay);
        assert_eq!(NoDrift.next_drift(), Drift::Stay);
    }
}
