use glam::Vec2;

use crate::components::{CameraGuard, FrameContext};
use crate::constants::DEFAULT_DAMPENING;
use crate::damping::{Transform, TransformDamper};
use crate::filter::FingerFilter;
use crate::gesture;
use crate::projection::ScreenProjection;

/// Moves a transform so its screen point follows the fingers.
#[derive(Debug)]
pub struct DragTranslate {
    pub filter: FingerFilter,
    pub sensitivity: f32,
    pub dampening: f32,
    damper: TransformDamper,
    camera_guard: CameraGuard,
}

impl Default for DragTranslate {
    fn default() -> Self {
        Self {
            filter: FingerFilter::new(true),
            sensitivity: 1.0,
            dampening: DEFAULT_DAMPENING,
            damper: TransformDamper::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl DragTranslate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damper(&self) -> &TransformDamper {
        &self.damper
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, transform: &mut Transform) {
        let fingers = self.filter.get_fingers(ctx.hub, ctx.registry, false);
        let screen_delta = gesture::screen_delta(&fingers) * self.sensitivity;

        let camera = if screen_delta != Vec2::ZERO {
            self.camera_guard.require(ctx.camera, "drag_translate")
        } else {
            None
        };

        self.damper.apply(transform, self.dampening, ctx.dt, |t| {
            if let Some(camera) = camera {
                translate(t, camera, screen_delta);
            }
        });
    }
}

fn translate(transform: &mut Transform, camera: &dyn ScreenProjection, screen_delta: Vec2) {
    let Some(mut screen) = camera.world_to_screen(transform.position) else {
        return;
    };
    screen += screen_delta.extend(0.0);
    if let Some(world) = camera.screen_to_world(screen) {
        transform.position = world;
    }
}
