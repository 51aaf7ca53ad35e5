use glam::Vec2;
use std::ops::BitOr;

use crate::error::{Result, TouchError};

/// Stable identity of a pointer contact for as long as it is tracked.
///
/// Negative ids belong to fingers emulated from a mouse rather than real touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerId(pub i32);

impl FingerId {
    pub const MOUSE: FingerId = FingerId(-1);

    #[inline]
    pub const fn is_emulated(self) -> bool {
        self.0 < 0
    }
}

/// One pointer contact as seen during the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finger {
    pub id: FingerId,
    pub start_screen_position: Vec2,
    pub screen_position: Vec2,
    pub last_screen_position: Vec2,
    /// Captured once when the contact began.
    pub started_over_gui: bool,
    pub is_over_gui: bool,
    /// The contact is held and its position was refreshed this frame.
    pub set: bool,
    /// The contact ended this frame.
    pub up: bool,
    /// Seconds since the contact began.
    pub age: f32,
}

impl Finger {
    pub fn new(id: FingerId, screen_position: Vec2, over_gui: bool) -> Self {
        Self {
            id,
            start_screen_position: screen_position,
            screen_position,
            last_screen_position: screen_position,
            started_over_gui: over_gui,
            is_over_gui: over_gui,
            set: true,
            up: false,
            age: 0.0,
        }
    }

    #[inline]
    pub fn screen_delta(&self) -> Vec2 {
        self.screen_position - self.last_screen_position
    }

    /// Total movement since the contact began.
    #[inline]
    pub fn swipe_screen_delta(&self) -> Vec2 {
        self.screen_position - self.start_screen_position
    }

    #[inline]
    pub fn is_emulated(&self) -> bool {
        self.id.is_emulated()
    }
}

/// Held mouse buttons as a bitmask: 1 = left, 2 = right, 4 = middle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: MouseButtons = MouseButtons(0);
    pub const LEFT: MouseButtons = MouseButtons(1);
    pub const RIGHT: MouseButtons = MouseButtons(2);
    pub const MIDDLE: MouseButtons = MouseButtons(4);

    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits > 7 {
            return Err(TouchError::InvalidMouseButtons(bits));
        }
        Ok(Self(bits))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every button in `required` is also held in `self`.
    #[inline]
    pub const fn contains(self, required: MouseButtons) -> bool {
        self.0 & required.0 == required.0
    }
}

impl BitOr for MouseButtons {
    type Output = MouseButtons;

    fn bitor(self, rhs: MouseButtons) -> MouseButtons {
        MouseButtons(self.0 | rhs.0)
    }
}
