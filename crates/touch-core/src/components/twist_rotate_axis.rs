use glam::{Quat, Vec3};

use crate::components::FrameContext;
use crate::damping::Transform;
use crate::filter::FingerFilter;
use crate::gesture;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationSpace {
    /// The axis is in the transform's own space.
    #[default]
    Local,
    /// The axis is in the parent space.
    World,
}

/// Spins a transform about a fixed axis by the twist gesture, undamped.
#[derive(Debug)]
pub struct TwistRotateAxis {
    pub filter: FingerFilter,
    pub axis: Vec3,
    pub space: RotationSpace,
}

impl Default for TwistRotateAxis {
    fn default() -> Self {
        Self {
            filter: FingerFilter::new(true),
            axis: Vec3::NEG_Y,
            space: RotationSpace::Local,
        }
    }
}

impl TwistRotateAxis {
    pub fn new(axis: Vec3, space: RotationSpace) -> Self {
        Self {
            axis,
            space,
            ..Self::default()
        }
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, transform: &mut Transform) {
        let fingers = self.filter.get_fingers(ctx.hub, ctx.registry, false);
        let twist = gesture::twist_radians(&fingers);
        if twist == 0.0 {
            return;
        }
        let Some(axis) = self.axis.try_normalize() else {
            log::warn!("[twist_rotate_axis] zero rotation axis");
            return;
        };
        let rotation = Quat::from_axis_angle(axis, twist);
        match self.space {
            RotationSpace::Local => transform.rotate_local(rotation),
            RotationSpace::World => transform.rotate_parent(rotation),
        }
    }
}
