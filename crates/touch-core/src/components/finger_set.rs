use crate::components::{CameraGuard, Coordinate, DeltaSignals, FrameContext};
use crate::hub::FingerEvent;
use crate::projection::ScreenDepth;
use crate::selectable::SelectableId;

/// Reports every frame a held finger is refreshed, with its movement since last frame.
#[derive(Debug)]
pub struct FingerSet {
    pub ignore_started_over_gui: bool,
    pub ignore_is_over_gui: bool,
    /// Skip fingers that did not move this frame.
    pub ignore_if_static: bool,
    pub required_selectable: Option<SelectableId>,
    pub coordinate: Coordinate,
    pub multiplier: f32,
    pub screen_depth: ScreenDepth,
    pub signals: DeltaSignals,
    camera_guard: CameraGuard,
}

impl Default for FingerSet {
    fn default() -> Self {
        Self {
            ignore_started_over_gui: true,
            ignore_is_over_gui: false,
            ignore_if_static: false,
            required_selectable: None,
            coordinate: Coordinate::default(),
            multiplier: 1.0,
            screen_depth: ScreenDepth::default(),
            signals: DeltaSignals::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl FingerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, ctx: &FrameContext<'_>, event: &FingerEvent) -> bool {
        let FingerEvent::Update(finger) = event else {
            return false;
        };
        if self.ignore_started_over_gui && finger.started_over_gui {
            return false;
        }
        if self.ignore_is_over_gui && finger.is_over_gui {
            return false;
        }
        if self.ignore_if_static && finger.screen_delta().length() <= 0.0 {
            return false;
        }
        if let Some(required) = self.required_selectable {
            if !ctx.registry.is_selected(required) {
                return false;
            }
        }

        self.signals.on_finger.emit(finger);

        let delta = self.coordinate.apply(finger.screen_delta(), ctx.hub) * self.multiplier;
        self.signals.on_delta.emit(&delta);
        self.signals.on_distance.emit(&delta.length());

        if !self.signals.wants_world() {
            return true;
        }
        if let Some(camera) = self.camera_guard.require(ctx.camera, "finger_set") {
            self.signals.emit_world(
                camera,
                &self.screen_depth,
                finger.last_screen_position,
                finger.screen_position,
            );
        }
        true
    }
}
