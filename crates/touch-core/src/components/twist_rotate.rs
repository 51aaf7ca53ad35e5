use glam::{Quat, Vec2};

use crate::components::{CameraGuard, FrameContext};
use crate::constants::DEFAULT_DAMPENING;
use crate::damping::{Transform, TransformDamper};
use crate::filter::FingerFilter;
use crate::gesture;
use crate::projection::ScreenProjection;

/// Rotates a transform around the camera's view axis by the twist gesture.
#[derive(Debug)]
pub struct TwistRotate {
    pub filter: FingerFilter,
    /// Also orbit the transform around the finger centre.
    pub relative: bool,
    pub dampening: f32,
    damper: TransformDamper,
    camera_guard: CameraGuard,
}

impl Default for TwistRotate {
    fn default() -> Self {
        Self {
            filter: FingerFilter::new(true),
            relative: false,
            dampening: DEFAULT_DAMPENING,
            damper: TransformDamper::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl TwistRotate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damper(&self) -> &TransformDamper {
        &self.damper
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, transform: &mut Transform) {
        let fingers = self.filter.get_fingers(ctx.hub, ctx.registry, false);
        let twist = gesture::twist_radians(&fingers);
        let center = gesture::screen_center(&fingers);

        let camera = if twist != 0.0 {
            self.camera_guard.require(ctx.camera, "twist_rotate")
        } else {
            None
        };
        let relative = self.relative;

        self.damper.apply(transform, self.dampening, ctx.dt, |t| {
            let Some(camera) = camera else {
                return;
            };
            if relative {
                orbit_center(t, camera, center, twist);
            }
            let axis = t.inverse_transform_direction(camera.forward());
            if let Some(axis) = axis.try_normalize() {
                t.rotate_local(Quat::from_axis_angle(axis, twist));
            }
        });
    }
}

fn orbit_center(transform: &mut Transform, camera: &dyn ScreenProjection, center: Vec2, twist: f32) {
    let Some(screen) = camera.world_to_screen(transform.position) else {
        return;
    };
    let orbited = center + Vec2::from_angle(twist).rotate(screen.truncate() - center);
    if let Some(world) = camera.screen_to_world(orbited.extend(screen.z)) {
        transform.position = world;
    }
}
