//! Press compiler: rotation sequence to button presses.
//!
//! Every abstract rotation has a fixed button spelling that assumes the
//! observer faces front. The compiler prepends presses that notionally bring
//! the observer to the front, then shrinks the sequence with three rewrite
//! rules and defers any trailing LEFT/RIGHT presses to the closing
//! correction, where they merge with whatever drift happened in between.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HypercubeError, Result};
use crate::frame::ObserverFacing;
use crate::geometry::{AbstractRotation, Axis};
use crate::planner::RotationSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Button {
    Left,
    Right,
    In,
    Out,
    Clock,
    Counter,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Left,
        Button::Right,
        Button::In,
        Button::Out,
        Button::Clock,
        Button::Counter,
    ];

    pub fn opposite(self) -> Button {
        match self {
            Button::Left => Button::Right,
            Button::Right => Button::Left,
            Button::In => Button::Out,
            Button::Out => Button::In,
            Button::Clock => Button::Counter,
            Button::Counter => Button::Clock,
        }
    }

    /// LEFT and RIGHT turn the cube in the observer's pivot plane and never
    /// move the observer.
    pub fn is_pivot(self) -> bool {
        matches!(self, Button::Left | Button::Right)
    }

    pub fn rotation(self) -> AbstractRotation {
        use Axis::*;
        match self {
            Button::Left => AbstractRotation::of(X, Y),
            Button::Right => AbstractRotation::of(Y, X),
            Button::In => AbstractRotation::of(W, Y),
            Button::Out => AbstractRotation::of(Y, W),
            Button::Clock => AbstractRotation::of(Z, X),
            Button::Counter => AbstractRotation::of(X, Z),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Button::Left => "LEFT",
            Button::Right => "RIGHT",
            Button::In => "IN",
            Button::Out => "OUT",
            Button::Clock => "CLOCK",
            Button::Counter => "COUNTER",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Button {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Button::ALL
            .into_iter()
            .find(|b| b.label() == upper)
            .ok_or_else(|| HypercubeError::invalid_input(format!("'{s}' is not a valid button")))
    }
}

pub type ButtonPressSequence = Vec<Button>;

pub fn format_presses(presses: &[Button]) -> String {
    presses.iter().map(|b| b.label()).collect::<Vec<_>>().join(" ")
}

/// Button spelling of each of the 12 ordered axis pairs, valid while the
/// observer faces front.
pub fn presses_for(rotation: AbstractRotation) -> &'static [Button] {
    use Axis::*;
    use Button::*;
    match (rotation.from_axis(), rotation.to_axis()) {
        (X, Z) => &[Right],
        (Z, X) => &[Left],
        (Y, Z) => &[Left, Clock, Right],
        (Z, Y) => &[Left, Counter, Right],
        (X, Y) => &[Counter],
        (Y, X) => &[Clock],
        (W, Z) => &[Out],
        (Z, W) => &[In],
        (X, W) => &[Right, In, Left],
        (W, X) => &[Right, Out, Left],
        (Y, W) => &[Clock, Left, Out, Right, Counter],
        (W, Y) => &[Clock, Left, In, Right, Counter],
        // AbstractRotation never holds a repeated axis.
        _ => &[],
    }
}

pub fn expand(sequence: &[AbstractRotation]) -> ButtonPressSequence {
    sequence.iter().flat_map(|r| presses_for(*r).iter().copied()).collect()
}

/// Presses that bring the observer back to the front before the encoded
/// sequence starts.
pub fn leading_correction(facing: ObserverFacing) -> ButtonPressSequence {
    match facing.index() {
        1 => vec![Button::Right],
        2 => vec![Button::Right, Button::Right],
        3 => vec![Button::Left],
        _ => Vec::new(),
    }
}

/// Presses that settle a net residual shift at the end of a solve.
pub fn closing_correction(residual: i32) -> ButtonPressSequence {
    match residual.rem_euclid(4) {
        1 => vec![Button::Left],
        2 => vec![Button::Left, Button::Left],
        3 => vec![Button::Right],
        _ => Vec::new(),
    }
}

/// Removes adjacent opposite pairs until none remain. Returns whether
/// anything changed.
pub fn cancel_opposites(presses: &mut ButtonPressSequence) -> bool {
    let mut changed = false;
    while let Some(i) = presses.windows(2).position(|w| w[0] == w[1].opposite()) {
        presses.drain(i..i + 2);
        changed = true;
    }
    changed
}

/// Replaces three identical presses with one press of the opposite button.
pub fn cancel_triples(presses: &mut ButtonPressSequence) -> bool {
    let mut changed = false;
    while let Some(i) = presses
        .windows(3)
        .position(|w| w[0] == w[1] && w[1] == w[2])
    {
        let replacement = presses[i].opposite();
        presses.splice(i..i + 3, [replacement]);
        changed = true;
    }
    changed
}

/// Strips LEFT/RIGHT from the tail. Returns the deferred shift: +1 per LEFT,
/// -1 per RIGHT.
pub fn trim_trailing_pivots(presses: &mut ButtonPressSequence) -> i32 {
    let mut pre_shift = 0;
    while let Some(last) = presses.last().copied() {
        match last {
            Button::Left => pre_shift += 1,
            Button::Right => pre_shift -= 1,
            _ => break,
        }
        presses.pop();
    }
    pre_shift
}

/// Applies opposites, triples, opposites until a full round changes
/// nothing. Trailing pivots are left in place.
pub fn simplify(presses: &mut ButtonPressSequence) {
    loop {
        let mut changed = cancel_opposites(presses);
        changed |= cancel_triples(presses);
        // A collapsed triple can sit next to its own opposite.
        changed |= cancel_opposites(presses);
        if !changed {
            break;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledPlan {
    pub rotations: RotationSequence,
    pub presses: ButtonPressSequence,
    /// Observer facing when planning started.
    pub offset_facing: ObserverFacing,
    /// Net shift deferred from trimmed trailing presses.
    pub pre_shift: i32,
}

pub fn compile(rotations: RotationSequence, facing: ObserverFacing) -> CompiledPlan {
    let mut presses = leading_correction(facing);
    presses.extend(expand(&rotations));
    let raw_len = presses.len();

    simplify(&mut presses);
    let pre_shift = trim_trailing_pivots(&mut presses);

    log::debug!(
        "Compiled {} rotation(s) into {} press(es) ({} before simplification), pre-shift {}",
        rotations.len(),
        presses.len(),
        raw_len,
        pre_shift
    );

    CompiledPlan { rotations, presses, offset_facing: facing, pre_shift }
}
