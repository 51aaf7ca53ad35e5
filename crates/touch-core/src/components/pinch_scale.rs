use glam::Vec2;

use crate::components::{CameraGuard, FrameContext};
use crate::constants::DEFAULT_DAMPENING;
use crate::damping::{Transform, TransformDamper};
use crate::filter::FingerFilter;
use crate::gesture;
use crate::projection::ScreenProjection;

/// Scales a transform by the pinch gesture.
#[derive(Debug)]
pub struct PinchScale {
    pub filter: FingerFilter,
    /// Also push the transform away from (or toward) the finger centre.
    pub relative: bool,
    /// Exponent applied to the raw pinch scale.
    pub sensitivity: f32,
    pub dampening: f32,
    damper: TransformDamper,
    camera_guard: CameraGuard,
}

impl Default for PinchScale {
    fn default() -> Self {
        Self {
            filter: FingerFilter::new(true),
            relative: false,
            sensitivity: 1.0,
            dampening: DEFAULT_DAMPENING,
            damper: TransformDamper::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl PinchScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damper(&self) -> &TransformDamper {
        &self.damper
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, transform: &mut Transform) {
        let fingers = self.filter.get_fingers(ctx.hub, ctx.registry, false);
        let mut pinch = gesture::pinch_scale(&fingers);
        if pinch != 1.0 {
            pinch = pinch.powf(self.sensitivity);
        }

        let camera = if pinch != 1.0 && self.relative {
            self.camera_guard.require(ctx.camera, "pinch_scale")
        } else {
            None
        };
        let center = gesture::screen_center(&fingers);

        self.damper.apply(transform, self.dampening, ctx.dt, |t| {
            if pinch == 1.0 {
                return;
            }
            if let Some(camera) = camera {
                push_from_center(t, camera, center, pinch);
            }
            t.scale *= pinch;
        });
    }
}

fn push_from_center(transform: &mut Transform, camera: &dyn ScreenProjection, center: Vec2, pinch: f32) {
    let Some(screen) = camera.world_to_screen(transform.position) else {
        return;
    };
    let pushed = center + (screen.truncate() - center) * pinch;
    if let Some(world) = camera.screen_to_world(pushed.extend(screen.z)) {
        transform.position = world;
    }
}
