use glam::Vec3;

use crate::components::{CameraGuard, FrameContext};
use crate::constants::DEFAULT_DAMPENING;
use crate::damping::{Transform, TransformDamper};
use crate::filter::FingerFilter;
use crate::gesture;
use crate::projection::ScreenDepth;
use crate::selectable::{SelectableId, SelectableRegistry};

/// Pans a camera transform opposite to the finger movement so the world
/// appears to stick to the fingers.
#[derive(Debug)]
pub struct DragCamera {
    pub filter: FingerFilter,
    pub screen_depth: ScreenDepth,
    pub sensitivity: f32,
    pub dampening: f32,
    damper: TransformDamper,
    camera_guard: CameraGuard,
}

impl Default for DragCamera {
    fn default() -> Self {
        Self {
            filter: FingerFilter::new(true),
            screen_depth: ScreenDepth::default(),
            sensitivity: 1.0,
            dampening: DEFAULT_DAMPENING,
            damper: TransformDamper::default(),
            camera_guard: CameraGuard::default(),
        }
    }
}

impl DragCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damper(&self) -> &TransformDamper {
        &self.damper
    }

    /// `transform` is the camera's own transform; `ctx.camera` must project
    /// from the same pose.
    pub fn update(&mut self, ctx: &FrameContext<'_>, transform: &mut Transform) {
        let fingers = self.filter.get_fingers(ctx.hub, ctx.registry, false);

        let mut world_delta = Vec3::ZERO;
        if !fingers.is_empty() {
            let last_center = gesture::last_screen_center(&fingers);
            let center = gesture::screen_center(&fingers);
            if last_center != center {
                if let Some(camera) = self.camera_guard.require(ctx.camera, "drag_camera") {
                    world_delta = self
                        .screen_depth
                        .convert_delta(camera, last_center, center)
                        .unwrap_or(Vec3::ZERO);
                }
            }
        }

        let offset = -world_delta * self.sensitivity;
        self.damper.apply(transform, self.dampening, ctx.dt, |t| {
            t.position += offset;
        });
    }

    /// Queues a damped move to the mean position of every selected entity.
    ///
    /// Returns false when nothing selected has a known position.
    pub fn move_to_selection<F>(
        &mut self,
        transform: &Transform,
        registry: &SelectableRegistry,
        position_of: F,
    ) -> bool
    where
        F: Fn(SelectableId) -> Option<Vec3>,
    {
        let mut selected = Vec::new();
        registry.get_selected(&mut selected);

        let (sum, count) = selected
            .into_iter()
            .filter_map(position_of)
            .fold((Vec3::ZERO, 0u32), |(sum, count), p| (sum + p, count + 1));
        if count == 0 {
            return false;
        }

        let center = sum / count as f32;
        self.damper.push_translation(center - transform.position);
        true
    }
}
