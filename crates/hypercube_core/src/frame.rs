//! Axis frame and observer facing.
//!
//! The frame assigns the four abstract axes to four ordered slots, each with a
//! sign. Buttons name abstract rotations; the frame turns them into the slot
//! rotations the renderer animates. Pivoting the observer swaps the X and Y
//! slots, so the same button means something different after every pivot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{AbstractRotation, Axis, DigitRotation, Sign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFrame {
    slots: [Axis; 4],
    signs: [Sign; 4],
}

impl Default for AxisFrame {
    fn default() -> Self {
        Self::initial()
    }
}

impl AxisFrame {
    /// Frame at module start: X, Z, Y, W with signs +, +, -, +.
    pub fn initial() -> Self {
        Self {
            slots: [Axis::X, Axis::Z, Axis::Y, Axis::W],
            signs: [Sign::Plus, Sign::Plus, Sign::Minus, Sign::Plus],
        }
    }

    /// 1:1 frame used while previewing.
    pub fn identity() -> Self {
        Self { slots: Axis::ALL, signs: [Sign::Plus; 4] }
    }

    pub fn slot_of(&self, axis: Axis) -> usize {
        // Bijection invariant: every axis occupies exactly one slot.
        self.slots.iter().position(|a| *a == axis).unwrap_or(axis.index())
    }

    pub fn axis_at(&self, slot: usize) -> Axis {
        self.slots[slot]
    }

    pub fn sign_at(&self, slot: usize) -> Sign {
        self.signs[slot]
    }

    pub fn is_bijection(&self) -> bool {
        Axis::ALL
            .iter()
            .all(|axis| self.slots.iter().filter(|a| *a == axis).count() == 1)
    }

    /// Turns an abstract rotation into a slot rotation. When the two slots
    /// have opposite signs the direction reverses.
    pub fn resolve(&self, rotation: AbstractRotation, identity_mode: bool) -> DigitRotation {
        let frame = if identity_mode { AxisFrame::identity() } else { *self };

        let from = frame.slot_of(rotation.from_axis());
        let to = frame.slot_of(rotation.to_axis());

        if frame.signs[from] != frame.signs[to] {
            DigitRotation::of(to, from)
        } else {
            DigitRotation::of(from, to)
        }
    }

    /// 90° observer pivot: X and Y exchange slots and their signs propagate.
    /// Z and W are untouched.
    pub fn shift_perspective(&mut self, reverse: bool) {
        let x_slot = self.slot_of(Axis::X);
        let y_slot = self.slot_of(Axis::Y);
        let x_sign = self.signs[x_slot];
        let y_sign = self.signs[y_slot];

        self.slots.swap(x_slot, y_slot);

        if reverse != (y_sign == x_sign) {
            self.signs[x_slot] = y_sign;
            self.signs[y_slot] = x_sign.flipped();
        } else {
            self.signs[x_slot] = y_sign.flipped();
            self.signs[y_slot] = x_sign;
        }
    }
}

impl fmt::Display for AxisFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (axis, sign) in self.slots.iter().zip(self.signs.iter()) {
            let symbol = if *sign == Sign::Plus { '+' } else { '-' };
            write!(f, "{symbol}{axis}")?;
        }
        Ok(())
    }
}

/// Index into the cyclic facing sequence front, right, back, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverFacing(u8);

impl ObserverFacing {
    pub const FRONT: ObserverFacing = ObserverFacing(0);

    const NAMES: [&'static str; 4] = ["front", "right", "back", "left"];

    pub fn new(index: u8) -> Self {
        Self(index % 4)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.0 as usize]
    }

    /// Steps from `earlier` to `self`, in `0..4`.
    pub fn delta_since(self, earlier: ObserverFacing) -> u8 {
        (4 + self.0 - earlier.0) % 4
    }

    fn stepped(self, reverse: bool) -> Self {
        let step = if reverse { 3 } else { 1 };
        Self((self.0 + step) % 4)
    }
}

impl fmt::Display for ObserverFacing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObserverState {
    facing: ObserverFacing,
}

impl ObserverState {
    pub fn facing(&self) -> ObserverFacing {
        self.facing
    }

    pub fn pivot(&mut self, reverse: bool) {
        self.facing = self.facing.stepped(reverse);
    }
}

/// Frame and observer together. Pivoting goes through here so the two never
/// fall out of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Perspective {
    frame: AxisFrame,
    observer: ObserverState,
}

impl Perspective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &AxisFrame {
        &self.frame
    }

    pub fn facing(&self) -> ObserverFacing {
        self.observer.facing()
    }

    pub fn resolve(&self, rotation: AbstractRotation, identity_mode: bool) -> DigitRotation {
        self.frame.resolve(rotation, identity_mode)
    }

    pub fn pivot(&mut self, reverse: bool) {
        self.frame.shift_perspective(reverse);
        self.observer.pivot(reverse);
    }
}
