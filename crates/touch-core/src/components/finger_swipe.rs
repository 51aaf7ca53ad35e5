//! Swipe detection with direction constraints.

use glam::Vec2;

use crate::components::{CameraGuard, Coordinate, DeltaSignals, FrameContext};
use crate::finger::Finger;
use crate::gesture::{self, delta_angle_degrees};
use crate::hub::FingerEvent;
use crate::projection::ScreenDepth;
use crate::selectable::SelectableId;

/// Post-processing applied to the reported swipe delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwipeModify {
    #[default]
    None,
    /// Unit length.
    Normalize,
    /// Snapped to the dominant axis, unit length.
    Normalize4,
}

impl SwipeModify {
    pub fn apply(self, delta: Vec2) -> Vec2 {
        match self {
            SwipeModify::None => delta,
            SwipeModify::Normalize => delta.normalize_or_zero(),
            SwipeModify::Normalize4 => {
                let mut snapped = delta;
                if delta.x < -delta.y.abs() {
                    snapped = Vec2::NEG_X;
                }
                if delta.x > delta.y.abs() {
                    snapped = Vec2::X;
                }
                if delta.y < -delta.x.abs() {
                    snapped = Vec2::NEG_Y;
                }
                if delta.y > delta.x.abs() {
                    snapped = Vec2::Y;
                }
                snapped
            }
        }
    }
}

#[derive(Debug)]
pub struct FingerSwipe {
    pub ignore_started_over_gui: bool,
    pub ignore_is_over_gui: bool,
    /// Only swipes by a finger currently selecting this entity are reported.
    pub required_selectable: Option<SelectableId>,
    /// Direction in degrees: 0 is up the screen, 90 is right.
    pub required_angle: f32,
    /// Width in degrees of the accepted arc around `required_angle`;
    /// negative accepts every direction.
    pub required_arc: f32,
    pub modify: SwipeModify,
    pub coordinate: Coordinate,
    pub multiplier: f32,
    pub screen_depth: ScreenDepth,
    pub signals: DeltaSignals,
    camera_guard: CameraGuard,
}

impl Default for FingerSwipe {
    fn default() -> Self {
        Self {
            ignore_started_over_gui: true,
            ignore_is_over_gui: false,
            required_selectable: None,
            required_angle: 0.0,
            required_arc: -1.0,
            modify: SwipeModify::None,
            coordinate: Coordinate::default(),
            multiplier: 1.0,
            screen_depth: ScreenDepth::default(),
            signals: DeltaSignals::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl FingerSwipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts accepted swipes to `arc` degrees centred on `angle`.
    pub fn with_direction(mut self, angle: f32, arc: f32) -> Self {
        self.required_angle = angle;
        self.required_arc = arc;
        self
    }

    pub fn angle_is_valid(&self, delta: Vec2) -> bool {
        if self.required_arc < 0.0 {
            return true;
        }
        let angle = gesture::screen_angle_degrees(delta);
        let offset = delta_angle_degrees(angle, self.required_angle);
        let half_arc = self.required_arc * 0.5;
        !(offset < -half_arc || offset >= half_arc)
    }

    pub fn handle(&mut self, ctx: &FrameContext<'_>, event: &FingerEvent) -> bool {
        let FingerEvent::Swipe(finger) = event else {
            return false;
        };
        if self.ignore_started_over_gui && finger.started_over_gui {
            return false;
        }
        if self.ignore_is_over_gui && finger.is_over_gui {
            return false;
        }
        if let Some(required) = self.required_selectable {
            if !ctx.registry.is_selected_by(required, finger.id) {
                return false;
            }
        }
        self.report(ctx, finger, finger.start_screen_position, finger.screen_position)
    }

    fn report(
        &mut self,
        ctx: &FrameContext<'_>,
        finger: &Finger,
        screen_from: Vec2,
        screen_to: Vec2,
    ) -> bool {
        let raw = screen_to - screen_from;
        if !self.angle_is_valid(raw) {
            log::debug!("[finger_swipe] {:?} outside the accepted arc", finger.id);
            return false;
        }

        self.signals.on_finger.emit(finger);

        let delta = self.modify.apply(self.coordinate.apply(raw, ctx.hub)) * self.multiplier;
        self.signals.on_delta.emit(&delta);
        self.signals.on_distance.emit(&delta.length());

        if !self.signals.wants_world() {
            return true;
        }
        if let Some(camera) = self.camera_guard.require(ctx.camera, "finger_swipe") {
            self.signals.emit_world(camera, &self.screen_depth, screen_from, screen_to);
        }
        true
    }
}
