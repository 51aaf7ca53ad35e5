use glam::Vec3;

use crate::components::{CameraGuard, FrameContext};
use crate::finger::Finger;
use crate::hub::FingerEvent;
use crate::projection::ScreenDepth;
use crate::selectable::SelectableId;
use crate::signal::Signal;

/// Reports fingers as they lift.
#[derive(Debug)]
pub struct FingerUp {
    pub ignore_started_over_gui: bool,
    pub ignore_is_over_gui: bool,
    pub required_selectable: Option<SelectableId>,
    pub screen_depth: ScreenDepth,
    pub on_finger: Signal<Finger>,
    /// World point under the contact's start position.
    pub on_position: Signal<Vec3>,
    camera_guard: CameraGuard,
}

impl Default for FingerUp {
    fn default() -> Self {
        Self {
            ignore_started_over_gui: true,
            ignore_is_over_gui: false,
            required_selectable: None,
            screen_depth: ScreenDepth::default(),
            on_finger: Signal::new(),
            on_position: Signal::new(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl FingerUp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, ctx: &FrameContext<'_>, event: &FingerEvent) -> bool {
        let FingerEvent::Up(finger) = event else {
            return false;
        };
        if self.ignore_started_over_gui && finger.started_over_gui {
            return false;
        }
        if self.ignore_is_over_gui && finger.is_over_gui {
            return false;
        }
        if let Some(required) = self.required_selectable {
            if !ctx.registry.is_selected(required) {
                return false;
            }
        }

        self.on_finger.emit(finger);
        if self.on_position.listener_count() > 0 {
            if let Some(camera) = self.camera_guard.require(ctx.camera, "finger_up") {
                if let Some(position) = self.screen_depth.convert(camera, finger.start_screen_position) {
                    self.on_position.emit(&position);
                }
            }
        }
        true
    }
}
