//! Face position tracking.
//!
//! Each of the 8 faces keeps its starting direction as a permanent label and
//! carries a current position. Replaying a rotation moves every face lying on
//! one of the rotation's two axes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HypercubeError, Result};
use crate::geometry::{AbstractRotation, Axis, DigitRotation, SignedAxis};

/// Permanent label of a face: the direction it pointed at puzzle start.
pub type FaceIdentity = SignedAxis;

/// Where a face currently points.
pub type FacePosition = SignedAxis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceMap {
    positions: BTreeMap<FaceIdentity, FacePosition>,
}

impl Default for FaceMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl FaceMap {
    pub fn identity() -> Self {
        Self {
            positions: SignedAxis::all().into_iter().map(|face| (face, face)).collect(),
        }
    }

    /// Replays already queued slot rotations, read in identity axis order.
    pub fn from_queued<'a>(queued: impl IntoIterator<Item = &'a DigitRotation>) -> Self {
        let mut map = Self::identity();
        for rotation in queued {
            map.apply_digits(*rotation);
        }
        map
    }

    pub fn position(&self, face: FaceIdentity) -> FacePosition {
        self.positions.get(&face).copied().unwrap_or(face)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FaceIdentity, FacePosition)> + '_ {
        self.positions.iter().map(|(face, position)| (*face, *position))
    }

    /// Quarter turn in the (from, to) plane: `from` goes to `to` keeping its
    /// sign, `to` goes to `from` with the sign flipped.
    pub fn apply(&mut self, rotation: AbstractRotation) {
        let (from, to) = (rotation.from_axis(), rotation.to_axis());
        for position in self.positions.values_mut() {
            if position.axis == from {
                *position = SignedAxis::new(position.sign, to);
            } else if position.axis == to {
                *position = SignedAxis::new(position.sign.flipped(), from);
            }
        }
    }

    pub fn apply_digits(&mut self, rotation: DigitRotation) {
        self.apply(rotation.abstract_rotation());
    }

    pub fn is_identity(&self) -> bool {
        self.iter().all(|(face, position)| face == position)
    }

    /// A valid orientation keeps opposite faces opposite.
    pub fn is_consistent(&self) -> bool {
        self.iter()
            .all(|(face, position)| self.position(face.opposite()) == position.opposite())
    }
}

/// Panel vocabulary for the 8 faces, as named by players and the chat layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceName {
    Front,
    Bottom,
    Left,
    Zig,
    Right,
    Zag,
    Back,
    Top,
}

impl FaceName {
    pub const ALL: [FaceName; 8] = [
        FaceName::Front,
        FaceName::Bottom,
        FaceName::Left,
        FaceName::Zig,
        FaceName::Right,
        FaceName::Zag,
        FaceName::Back,
        FaceName::Top,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FaceName::Front => "FRONT",
            FaceName::Bottom => "BOTTOM",
            FaceName::Left => "LEFT",
            FaceName::Zig => "ZIG",
            FaceName::Right => "RIGHT",
            FaceName::Zag => "ZAG",
            FaceName::Back => "BACK",
            FaceName::Top => "TOP",
        }
    }

    /// Panel button layout: inner ring is X/Z, outer ring is Y/W.
    pub fn direction(self) -> SignedAxis {
        match self {
            FaceName::Right => SignedAxis::plus(Axis::X),
            FaceName::Left => SignedAxis::minus(Axis::X),
            FaceName::Top => SignedAxis::plus(Axis::Y),
            FaceName::Bottom => SignedAxis::minus(Axis::Y),
            FaceName::Front => SignedAxis::plus(Axis::Z),
            FaceName::Back => SignedAxis::minus(Axis::Z),
            FaceName::Zag => SignedAxis::plus(Axis::W),
            FaceName::Zig => SignedAxis::minus(Axis::W),
        }
    }
}

impl fmt::Display for FaceName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FaceName {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        FaceName::ALL
            .into_iter()
            .find(|name| name.label() == upper)
            .ok_or_else(|| HypercubeError::invalid_input(format!("'{s}' is not a valid face")))
    }
}
