use glam::Vec2;

use crate::constants::{DEFAULT_REFERENCE_DPI, DEFAULT_SWIPE_THRESHOLD, DEFAULT_TAP_THRESHOLD};
use crate::error::{Result, TouchError};

/// Finger source settings shared by every component reading from a [`crate::TouchHub`].
#[derive(Clone, Debug)]
pub struct TouchConfig {
    /// Longest contact, in seconds, that still counts as a tap.
    pub tap_threshold: f32,
    /// Distance in scaled pixels a short contact must travel to count as a swipe.
    pub swipe_threshold: f32,
    /// DPI at which one scaled pixel equals one screen pixel.
    pub reference_dpi: f32,
    /// DPI of the current display, when the host knows it.
    pub screen_dpi: Option<f32>,
    /// Size of the screen in pixels, when the host knows it.
    pub screen_size: Option<Vec2>,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            tap_threshold: DEFAULT_TAP_THRESHOLD,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            reference_dpi: DEFAULT_REFERENCE_DPI,
            screen_dpi: None,
            screen_size: None,
        }
    }
}

impl TouchConfig {
    pub fn validate(&self) -> Result<()> {
        check_threshold("tap_threshold", self.tap_threshold)?;
        check_threshold("swipe_threshold", self.swipe_threshold)?;
        check_threshold("reference_dpi", self.reference_dpi)?;
        if let Some(dpi) = self.screen_dpi {
            check_threshold("screen_dpi", dpi)?;
        }
        if let Some(size) = self.screen_size {
            if !(size.x > 0.0 && size.y > 0.0) {
                return Err(TouchError::InvalidViewport {
                    width: size.x,
                    height: size.y,
                });
            }
        }
        Ok(())
    }

    /// Multiplier converting screen pixels into scaled pixels.
    pub fn scaling_factor(&self) -> f32 {
        match self.screen_dpi {
            Some(dpi) if dpi > 0.0 => self.reference_dpi / dpi,
            _ => 1.0,
        }
    }

    /// Multiplier converting screen pixels into a fraction of the smallest screen side.
    pub fn screen_factor(&self) -> f32 {
        match self.screen_size {
            Some(size) if size.min_element() > 0.0 => 1.0 / size.min_element(),
            _ => 1.0,
        }
    }
}

fn check_threshold(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TouchError::InvalidThreshold { name, value })
    }
}
