//! Screen/world conversion used to turn finger movement into world movement.
//!
//! Screen space is in pixels with the origin at the top-left corner and y
//! pointing down. The `z` of a screen point is its depth in front of the
//! camera along the view direction.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::DEFAULT_SCREEN_DISTANCE;
use crate::error::{Result, TouchError};

pub trait ScreenProjection {
    /// Projects a world point; `None` when it lies behind the camera.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec3>;

    /// Un-projects a screen point at the depth stored in its `z`.
    fn screen_to_world(&self, screen: Vec3) -> Option<Vec3>;

    /// World-space ray `(origin, direction)` through a screen point.
    fn screen_ray(&self, screen: Vec2) -> Option<(Vec3, Vec3)>;

    /// Unit view direction in world space.
    fn forward(&self) -> Vec3;
}

/// Right-handed perspective camera looking from `eye` at `target`.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl PerspectiveCamera {
    pub fn new(eye: Vec3, target: Vec3, viewport: Vec2) -> Result<Self> {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(TouchError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }
        Ok(Self {
            eye,
            target,
            up: Vec3::Y,
            fovy_radians: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 100.0,
            viewport,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect(), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (2.0 * screen.x / self.viewport.x) - 1.0,
            1.0 - (2.0 * screen.y / self.viewport.y),
        )
    }
}

impl ScreenProjection for PerspectiveCamera {
    fn world_to_screen(&self, world: Vec3) -> Option<Vec3> {
        let depth = (world - self.eye).dot(self.forward());
        if depth <= 0.0 {
            return None;
        }
        let clip = self.projection_matrix() * self.view_matrix() * world.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
            depth,
        ))
    }

    fn screen_to_world(&self, screen: Vec3) -> Option<Vec3> {
        let (origin, direction) = self.screen_ray(screen.truncate())?;
        let cos = direction.dot(self.forward());
        if cos <= 1e-6 {
            return None;
        }
        Some(origin + direction * (screen.z / cos))
    }

    fn screen_ray(&self, screen: Vec2) -> Option<(Vec3, Vec3)> {
        let ndc = self.screen_to_ndc(screen);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        if p_far.w.abs() <= f32::EPSILON {
            return None;
        }
        let far: Vec3 = p_far.truncate() / p_far.w;
        let direction = (far - self.eye).try_normalize()?;
        Some((self.eye, direction))
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

/// How a finger's screen point is placed into the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScreenDepth {
    /// A fixed distance in front of the camera.
    FixedDistance(f32),
    /// Where the finger ray crosses the plane `z = value`.
    DepthIntercept(f32),
}

impl Default for ScreenDepth {
    fn default() -> Self {
        ScreenDepth::DepthIntercept(0.0)
    }
}

impl ScreenDepth {
    pub fn fixed_distance() -> Self {
        ScreenDepth::FixedDistance(DEFAULT_SCREEN_DISTANCE)
    }

    pub fn convert(&self, camera: &dyn ScreenProjection, screen: Vec2) -> Option<Vec3> {
        match *self {
            ScreenDepth::FixedDistance(distance) => camera.screen_to_world(screen.extend(distance)),
            ScreenDepth::DepthIntercept(plane_z) => {
                let (origin, direction) = camera.screen_ray(screen)?;
                if direction.z.abs() <= 1e-6 {
                    return None;
                }
                let t = (plane_z - origin.z) / direction.z;
                (t >= 0.0).then_some(origin + direction * t)
            }
        }
    }

    /// World-space movement between two screen points.
    pub fn convert_delta(
        &self,
        camera: &dyn ScreenProjection,
        last_screen: Vec2,
        screen: Vec2,
    ) -> Option<Vec3> {
        let from = self.convert(camera, last_screen)?;
        let to = self.convert(camera, screen)?;
        Some(to - from)
    }
}
