use glam::{Quat, Vec2};

use crate::constants::DEFAULT_DAMPENING;
use crate::damping::{damp_angle_degrees, dampen_factor, Transform};
use crate::gesture;

/// Rolls a transform about its z axis toward a target angle in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Roll {
    /// Target angle.
    pub angle: f32,
    pub dampening: f32,
    current_angle: f32,
}

impl Default for Roll {
    fn default() -> Self {
        Self {
            angle: 0.0,
            dampening: DEFAULT_DAMPENING,
            current_angle: 0.0,
        }
    }
}

impl Roll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn increment_angle(&mut self, delta: f32) {
        self.angle += delta;
    }

    pub fn decrement_angle(&mut self, delta: f32) {
        self.angle -= delta;
    }

    /// Points the roll along a screen direction (0 is up, 90 is right);
    /// a zero vector keeps the current target.
    pub fn rotate_to_delta(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.angle = gesture::screen_angle_degrees(delta);
        }
    }

    pub fn snap_to_target(&mut self) {
        self.current_angle = self.angle;
    }

    pub fn update(&mut self, dt: f32, transform: &mut Transform) {
        let factor = dampen_factor(self.dampening, dt);
        self.current_angle = damp_angle_degrees(self.current_angle, self.angle, factor);
        transform.rotation = Quat::from_rotation_z((-self.current_angle).to_radians());
    }
}
