//! Framerate-independent smoothing of gesture-driven transform changes.
//!
//! Components apply the raw gesture change to a [`Transform`] straight away
//! and let a [`TransformDamper`] roll part of it back. The part that was
//! rolled back is carried in the damper's "remaining" accumulators and
//! released over the following frames according to [`dampen_factor`].

use glam::{Quat, Vec3};

use crate::gesture::delta_angle_degrees;

const MIN_SCALE_COMPONENT: f32 = 1e-6;

/// Fraction of the remaining change to release this frame.
///
/// Negative dampening releases everything at once, zero freezes the
/// remainder, and positive values decay it exponentially over `dt` seconds.
#[inline]
pub fn dampen_factor(dampening: f32, dt: f32) -> f32 {
    if dampening < 0.0 {
        return 1.0;
    }
    if dampening == 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-dampening * dt).exp()
}

#[inline]
pub fn damp_towards(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Like [`damp_towards`] but travels the shortest way around the circle.
#[inline]
pub fn damp_angle_degrees(current: f32, target: f32, factor: f32) -> f32 {
    current + delta_angle_degrees(current, target) * factor
}

/// Position, rotation and scale relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotates around an axis expressed in this transform's own space.
    pub fn rotate_local(&mut self, rotation: Quat) {
        self.rotation = (self.rotation * rotation).normalize();
    }

    /// Rotates around an axis expressed in the parent space.
    pub fn rotate_parent(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Converts a parent-space direction into this transform's own space.
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }
}

/// Remaining, not yet visible, gesture change of one transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDamper {
    remaining_translation: Vec3,
    remaining_rotation: Quat,
    remaining_scale: Vec3,
}

impl Default for TransformDamper {
    fn default() -> Self {
        Self {
            remaining_translation: Vec3::ZERO,
            remaining_rotation: Quat::IDENTITY,
            remaining_scale: Vec3::ONE,
        }
    }
}

impl TransformDamper {
    pub fn remaining_translation(&self) -> Vec3 {
        self.remaining_translation
    }

    pub fn remaining_rotation(&self) -> Quat {
        self.remaining_rotation
    }

    pub fn remaining_scale(&self) -> Vec3 {
        self.remaining_scale
    }

    /// True once every accumulator is within `epsilon` of its identity.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.remaining_translation.length() <= epsilon
            && self.remaining_rotation.angle_between(Quat::IDENTITY) <= epsilon
            && (self.remaining_scale - Vec3::ONE).abs().max_element() <= epsilon
    }

    /// Queues a translation that becomes visible only through damping.
    pub fn push_translation(&mut self, delta: Vec3) {
        self.remaining_translation += delta;
    }

    /// Runs one damped update.
    ///
    /// `raw_change` writes the full gesture change into the transform; other
    /// code observing the transform inside the closure sees that immediate
    /// write. Afterwards the transform is rewritten so that only the damped
    /// fraction of the accumulated change is visible.
    pub fn apply<F>(&mut self, transform: &mut Transform, dampening: f32, dt: f32, raw_change: F)
    where
        F: FnOnce(&mut Transform),
    {
        let old = *transform;
        raw_change(transform);
        self.accumulate(&old, transform);
        let factor = dampen_factor(dampening, dt);
        self.settle(&old, transform, factor);
    }

    fn accumulate(&mut self, old: &Transform, new: &Transform) {
        self.remaining_translation += new.position - old.position;
        self.remaining_rotation =
            (self.remaining_rotation * (old.rotation.inverse() * new.rotation)).normalize();
        self.remaining_scale *= scale_ratio(old.scale, new.scale);
    }

    fn settle(&mut self, old: &Transform, transform: &mut Transform, factor: f32) {
        let (settled_translation, settled_rotation, settled_scale) = if factor >= 1.0 {
            (Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
        } else {
            (
                self.remaining_translation.lerp(Vec3::ZERO, factor),
                self.remaining_rotation.slerp(Quat::IDENTITY, factor),
                self.remaining_scale.lerp(Vec3::ONE, factor),
            )
        };

        transform.position = old.position + self.remaining_translation - settled_translation;
        transform.rotation =
            (old.rotation * settled_rotation.inverse() * self.remaining_rotation).normalize();
        transform.scale = old.scale * scale_ratio(settled_scale, self.remaining_scale);

        self.remaining_translation = settled_translation;
        self.remaining_rotation = settled_rotation;
        self.remaining_scale = settled_scale;
    }
}

/// Per-axis `to / from`; axes with a degenerate `from` report no change.
fn scale_ratio(from: Vec3, to: Vec3) -> Vec3 {
    let ratio = |f: f32, t: f32| {
        if f.abs() <= MIN_SCALE_COMPONENT {
            1.0
        } else {
            t / f
        }
    };
    Vec3::new(
        ratio(from.x, to.x),
        ratio(from.y, to.y),
        ratio(from.z, to.z),
    )
}
