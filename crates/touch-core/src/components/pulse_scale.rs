use glam::Vec3;

use crate::constants::{DEFAULT_PULSE_DAMPENING, DEFAULT_PULSE_INTERVAL, DEFAULT_PULSE_SIZE};
use crate::damping::{damp_towards, dampen_factor, Transform};

/// Periodically bumps a transform's scale and lets it ease back.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseScale {
    pub base_scale: Vec3,
    /// Current size multiplier; decays toward one.
    pub size: f32,
    /// Seconds between pulses.
    pub pulse_interval: f32,
    /// Added to `size` on every pulse.
    pub pulse_size: f32,
    pub dampening: f32,
    counter: f32,
}

impl Default for PulseScale {
    fn default() -> Self {
        Self {
            base_scale: Vec3::ONE,
            size: 1.0,
            pulse_interval: DEFAULT_PULSE_INTERVAL,
            pulse_size: DEFAULT_PULSE_SIZE,
            dampening: DEFAULT_PULSE_DAMPENING,
            counter: 0.0,
        }
    }
}

impl PulseScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, transform: &mut Transform) {
        self.counter += dt;
        if self.pulse_interval > 0.0 && self.counter >= self.pulse_interval {
            self.counter %= self.pulse_interval;
            self.size += self.pulse_size;
        }

        let factor = dampen_factor(self.dampening, dt);
        self.size = damp_towards(self.size, 1.0, factor);
        transform.scale = transform.scale.lerp(self.base_scale * self.size, factor);
    }
}
