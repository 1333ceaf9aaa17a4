//! Signed-axis vocabulary shared by every other module.
//!
//! A direction on the hypercube is a [`SignedAxis`] such as `+X` or `-W`.
//! Rotations are quarter turns in the plane of two axes, written `"XZ"`
//! (abstract) or `"02"` (digit form, as queued for the renderer).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HypercubeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    /// Fixed enumeration order. Digit `i` of a [`DigitRotation`] in identity
    /// mode is `Axis::ALL[i]`.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::W];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Axis> {
        Axis::ALL.get(index).copied()
    }

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::W => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Axis> {
        match letter.to_ascii_uppercase() {
            'X' => Some(Axis::X),
            'Y' => Some(Axis::Y),
            'Z' => Some(Axis::Z),
            'W' => Some(Axis::W),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn flipped(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }

    fn symbol(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// A direction: sign plus axis. Also used as the permanent label of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SignedAxis {
    pub sign: Sign,
    pub axis: Axis,
}

impl SignedAxis {
    pub const fn new(sign: Sign, axis: Axis) -> Self {
        Self { sign, axis }
    }

    pub const fn plus(axis: Axis) -> Self {
        Self::new(Sign::Plus, axis)
    }

    pub const fn minus(axis: Axis) -> Self {
        Self::new(Sign::Minus, axis)
    }

    pub fn opposite(self) -> Self {
        Self::new(self.sign.flipped(), self.axis)
    }

    /// All 8 directions: +X, -X, +Y, -Y, +Z, -Z, +W, -W.
    pub fn all() -> [SignedAxis; 8] {
        let mut out = [SignedAxis::plus(Axis::X); 8];
        for (i, axis) in Axis::ALL.iter().enumerate() {
            out[2 * i] = SignedAxis::plus(*axis);
            out[2 * i + 1] = SignedAxis::minus(*axis);
        }
        out
    }
}

impl fmt::Display for SignedAxis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.sign.symbol(), self.axis.letter())
    }
}

impl FromStr for SignedAxis {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        let (Some(sign), Some(axis), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(HypercubeError::invalid_input(format!("'{s}' is not a signed axis")));
        };
        let sign = match sign {
            '+' => Sign::Plus,
            '-' => Sign::Minus,
            _ => return Err(HypercubeError::invalid_input(format!("'{s}' is not a signed axis"))),
        };
        let axis = Axis::from_letter(axis)
            .ok_or_else(|| HypercubeError::invalid_input(format!("'{s}' is not a signed axis")))?;
        Ok(SignedAxis::new(sign, axis))
    }
}

impl From<SignedAxis> for String {
    fn from(value: SignedAxis) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SignedAxis {
    type Error = HypercubeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Quarter turn carrying `from` onto `to`. `(a, b)` is the inverse of `(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AbstractRotation {
    from: Axis,
    to: Axis,
}

impl AbstractRotation {
    pub fn new(from: Axis, to: Axis) -> Result<Self> {
        if from == to {
            return Err(HypercubeError::precondition(format!(
                "rotation needs two distinct axes, got {from}{to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Only for axis pairs known to be distinct at compile time.
    pub(crate) const fn of(from: Axis, to: Axis) -> Self {
        Self { from, to }
    }

    pub fn from_axis(self) -> Axis {
        self.from
    }

    pub fn to_axis(self) -> Axis {
        self.to
    }

    pub fn inverse(self) -> Self {
        Self { from: self.to, to: self.from }
    }
}

impl fmt::Display for AbstractRotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from.letter(), self.to.letter())
    }
}

impl FromStr for AbstractRotation {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        let letters: Vec<char> = s.trim().chars().collect();
        let [from, to] = letters.as_slice() else {
            return Err(HypercubeError::invalid_input(format!("'{s}' is not a rotation")));
        };
        match (Axis::from_letter(*from), Axis::from_letter(*to)) {
            (Some(from), Some(to)) => AbstractRotation::new(from, to),
            _ => Err(HypercubeError::invalid_input(format!("'{s}' is not a rotation"))),
        }
    }
}

impl From<AbstractRotation> for String {
    fn from(value: AbstractRotation) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AbstractRotation {
    type Error = HypercubeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Concrete rotation between two frame slots, as consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DigitRotation {
    from: usize,
    to: usize,
}

impl DigitRotation {
    pub fn new(from: usize, to: usize) -> Result<Self> {
        if from >= 4 || to >= 4 || from == to {
            return Err(HypercubeError::invalid_input(format!(
                "'{from}{to}' is not a digit rotation"
            )));
        }
        Ok(Self { from, to })
    }

    pub(crate) const fn of(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn from_slot(self) -> usize {
        self.from
    }

    pub fn to_slot(self) -> usize {
        self.to
    }

    /// Reads the digits in identity axis order, which is how queued rotations
    /// are replayed onto a face map.
    pub fn abstract_rotation(self) -> AbstractRotation {
        AbstractRotation::of(Axis::ALL[self.from], Axis::ALL[self.to])
    }
}

impl fmt::Display for DigitRotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for DigitRotation {
    type Err = HypercubeError;

    fn from_str(s: &str) -> Result<Self> {
        let digits: Vec<u32> = s.trim().chars().filter_map(|c| c.to_digit(10)).collect();
        match digits.as_slice() {
            [from, to] if s.trim().len() == 2 => DigitRotation::new(*from as usize, *to as usize),
            _ => Err(HypercubeError::invalid_input(format!("'{s}' is not a digit rotation"))),
        }
    }
}

impl From<DigitRotation> for String {
    fn from(value: DigitRotation) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DigitRotation {
    type Error = HypercubeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_axis_text_form() {
        assert_eq!("+X".parse::<SignedAxis>().unwrap(), SignedAxis::plus(Axis::X));
        assert_eq!("-w".parse::<SignedAxis>().unwrap(), SignedAxis::minus(Axis::W));
        assert_eq!(SignedAxis::minus(Axis::Z).to_string(), "-Z");

        assert!("X".parse::<SignedAxis>().is_err());
        assert!("+V".parse::<SignedAxis>().is_err());
        assert!("*X".parse::<SignedAxis>().is_err());
        assert!("+XY".parse::<SignedAxis>().is_err());
    }

    #[test]
    fn test_all_directions_distinct() {
        let all = SignedAxis::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(all[0].to_string(), "+X");
        assert_eq!(all[7].to_string(), "-W");
    }

    #[test]
    fn test_rotation_requires_distinct_axes() {
        assert!(AbstractRotation::new(Axis::X, Axis::X).is_err());
        let r = AbstractRotation::new(Axis::X, Axis::Z).unwrap();
        assert_eq!(r.to_string(), "XZ");
        assert_eq!(r.inverse().to_string(), "ZX");
        assert!("XX".parse::<AbstractRotation>().is_err());
        assert_eq!("wy".parse::<AbstractRotation>().unwrap().to_string(), "WY");
    }

    #[test]
    fn test_digit_rotation_maps_to_identity_axes() {
        let d: DigitRotation = "03".parse().unwrap();
        assert_eq!(d.abstract_rotation().to_string(), "XW");
        assert!("33".parse::<DigitRotation>().is_err());
        assert!("4".parse::<DigitRotation>().is_err());
        assert!("14".parse::<DigitRotation>().is_err());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&SignedAxis::minus(Axis::Y)).unwrap();
        assert_eq!(json, "\"-Y\"");
        let back: AbstractRotation = serde_json::from_str("\"ZX\"").unwrap();
        assert_eq!(back, AbstractRotation::new(Axis::Z, Axis::X).unwrap());
        assert!(serde_json::from_str::<DigitRotation>("\"22\"").is_err());
    }
}
