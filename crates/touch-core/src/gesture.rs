//! Aggregate gesture quantities computed from a set of fingers.
//!
//! All functions are pure. Screen positions are in pixels; angles are
//! positive when fingers turn from the +x axis toward the +y axis.
//! An empty finger list yields the neutral value of each quantity
//! (`Vec2::ZERO`, `0.0`, or `1.0` for scales).

use glam::Vec2;

use crate::constants::MIN_PINCH_DISTANCE;
use crate::finger::Finger;

fn mean(fingers: &[Finger], position: impl Fn(&Finger) -> Vec2) -> Vec2 {
    if fingers.is_empty() {
        return Vec2::ZERO;
    }
    let total: Vec2 = fingers.iter().map(position).sum();
    total / fingers.len() as f32
}

pub fn screen_center(fingers: &[Finger]) -> Vec2 {
    mean(fingers, |f| f.screen_position)
}

pub fn last_screen_center(fingers: &[Finger]) -> Vec2 {
    mean(fingers, |f| f.last_screen_position)
}

pub fn start_screen_center(fingers: &[Finger]) -> Vec2 {
    mean(fingers, |f| f.start_screen_position)
}

/// Mean per-finger movement since last frame.
pub fn screen_delta(fingers: &[Finger]) -> Vec2 {
    match fingers {
        [single] => single.screen_delta(),
        _ => mean(fingers, Finger::screen_delta),
    }
}

fn pairwise_distance(fingers: &[Finger], position: impl Fn(&Finger) -> Vec2) -> f32 {
    let mut total = 0.0;
    let mut pairs = 0u32;
    for (i, a) in fingers.iter().enumerate() {
        for b in &fingers[i + 1..] {
            total += position(a).distance(position(b));
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f32
    }
}

/// Average distance between every pair of fingers this frame.
pub fn screen_distance(fingers: &[Finger]) -> f32 {
    pairwise_distance(fingers, |f| f.screen_position)
}

pub fn last_screen_distance(fingers: &[Finger]) -> f32 {
    pairwise_distance(fingers, |f| f.last_screen_position)
}

/// Growth of the finger spread since last frame: >1 spreading, <1 pinching.
pub fn pinch_scale(fingers: &[Finger]) -> f32 {
    if fingers.len() < 2 {
        return 1.0;
    }
    let last = last_screen_distance(fingers);
    if last <= MIN_PINCH_DISTANCE {
        return 1.0;
    }
    screen_distance(fingers) / last
}

/// Inverse of [`pinch_scale`], convenient for zooming a camera.
pub fn pinch_ratio(fingers: &[Finger]) -> f32 {
    if fingers.len() < 2 {
        return 1.0;
    }
    let current = screen_distance(fingers);
    if current <= MIN_PINCH_DISTANCE {
        return 1.0;
    }
    last_screen_distance(fingers) / current
}

/// Signed angle in radians from `a` to `b`, in (-PI, PI].
#[inline]
pub fn signed_angle(a: Vec2, b: Vec2) -> f32 {
    if a == Vec2::ZERO || b == Vec2::ZERO {
        return 0.0;
    }
    a.perp_dot(b).atan2(a.dot(b))
}

/// Mean rotation of the fingers around their centroid since last frame.
pub fn twist_radians(fingers: &[Finger]) -> f32 {
    if fingers.len() < 2 {
        return 0.0;
    }
    let center = screen_center(fingers);
    let last_center = last_screen_center(fingers);
    let total: f32 = fingers
        .iter()
        .map(|f| signed_angle(f.last_screen_position - last_center, f.screen_position - center))
        .sum();
    total / fingers.len() as f32
}

pub fn twist_degrees(fingers: &[Finger]) -> f32 {
    twist_radians(fingers).to_degrees()
}

/// Shortest signed difference `target - current` in degrees, in (-180, 180].
#[inline]
pub fn delta_angle_degrees(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Direction of a y-down screen vector in degrees: 0 is up, 90 is right,
/// 180 is down.
#[inline]
pub fn screen_angle_degrees(delta: Vec2) -> f32 {
    delta.x.atan2(-delta.y).to_degrees()
}
