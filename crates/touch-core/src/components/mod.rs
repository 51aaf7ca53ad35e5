//! Ready-made gesture behaviours built on the filter, gesture and damping
//! modules.
//!
//! Continuous components (`DragTranslate`, `PinchScale`, ...) are stepped once
//! per frame with a [`FrameContext`]. Observers (`FingerDown`, `FingerSwipe`,
//! ...) are fed the frame's [`crate::FingerEvent`]s and re-emit typed outputs
//! through their own signals.

pub mod drag_camera;
pub mod drag_translate;
pub mod finger_down;
pub mod finger_set;
pub mod finger_swipe;
pub mod finger_up;
pub mod pinch_scale;
pub mod pulse_scale;
pub mod roll;
pub mod select;
pub mod twist_rotate;
pub mod twist_rotate_axis;

pub use drag_camera::DragCamera;
pub use drag_translate::DragTranslate;
pub use finger_down::FingerDown;
pub use finger_set::FingerSet;
pub use finger_swipe::{FingerSwipe, SwipeModify};
pub use finger_up::FingerUp;
pub use pinch_scale::PinchScale;
pub use pulse_scale::PulseScale;
pub use roll::Roll;
pub use select::{ReselectType, Select};
pub use twist_rotate::TwistRotate;
pub use twist_rotate_axis::{RotationSpace, TwistRotateAxis};

use glam::{Vec2, Vec3};

use crate::finger::Finger;
use crate::hub::TouchHub;
use crate::projection::{ScreenDepth, ScreenProjection};
use crate::selectable::SelectableRegistry;
use crate::signal::Signal;

/// Everything a component may read during one frame.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub hub: &'a TouchHub,
    pub registry: &'a SelectableRegistry,
    pub camera: Option<&'a dyn ScreenProjection>,
    pub dt: f32,
}

impl<'a> FrameContext<'a> {
    pub fn new(hub: &'a TouchHub, registry: &'a SelectableRegistry, dt: f32) -> Self {
        Self {
            hub,
            registry,
            camera: None,
            dt,
        }
    }

    pub fn with_camera(mut self, camera: &'a dyn ScreenProjection) -> Self {
        self.camera = Some(camera);
        self
    }
}

/// Reports a missing camera once per component instance.
#[derive(Debug, Default)]
pub(crate) struct CameraGuard {
    reported: bool,
}

impl CameraGuard {
    pub(crate) fn require<'a>(
        &mut self,
        camera: Option<&'a dyn ScreenProjection>,
        component: &str,
    ) -> Option<&'a dyn ScreenProjection> {
        if camera.is_none() && !self.reported {
            log::error!("[{}] no camera available, skipping world conversion", component);
            self.reported = true;
        }
        camera
    }
}

/// Unit of the screen deltas a component reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Coordinate {
    /// Pixels normalised to the reference DPI.
    #[default]
    ScaledPixels,
    ScreenPixels,
    /// Fraction of the smallest screen side.
    ScreenPercentage,
}

impl Coordinate {
    pub fn apply(self, delta: Vec2, hub: &TouchHub) -> Vec2 {
        match self {
            Coordinate::ScaledPixels => delta * hub.scaling_factor(),
            Coordinate::ScreenPixels => delta,
            Coordinate::ScreenPercentage => delta * hub.screen_factor(),
        }
    }
}

/// Outputs shared by observers that report a movement between two screen points.
#[derive(Debug, Default)]
pub struct DeltaSignals {
    pub on_finger: Signal<Finger>,
    pub on_delta: Signal<Vec2>,
    pub on_distance: Signal<f32>,
    pub on_world_from: Signal<Vec3>,
    pub on_world_to: Signal<Vec3>,
    pub on_world_delta: Signal<Vec3>,
    pub on_world_from_to: Signal<(Vec3, Vec3)>,
}

impl DeltaSignals {
    /// True when some listener needs world-space outputs.
    pub fn wants_world(&self) -> bool {
        self.on_world_from.listener_count() > 0
            || self.on_world_to.listener_count() > 0
            || self.on_world_delta.listener_count() > 0
            || self.on_world_from_to.listener_count() > 0
    }

    pub(crate) fn emit_world(
        &self,
        camera: &dyn ScreenProjection,
        depth: &ScreenDepth,
        screen_from: Vec2,
        screen_to: Vec2,
    ) {
        let (Some(from), Some(to)) = (
            depth.convert(camera, screen_from),
            depth.convert(camera, screen_to),
        ) else {
            log::warn!("[touch] screen points {:?} -> {:?} miss the world", screen_from, screen_to);
            return;
        };
        self.on_world_from.emit(&from);
        self.on_world_to.emit(&to);
        self.on_world_delta.emit(&(to - from));
        self.on_world_from_to.emit(&(from, to));
    }
}
