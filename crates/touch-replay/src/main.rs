use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use std::str::FromStr;

use touch_core::components::{
    DragTranslate, FingerSwipe, FrameContext, PinchScale, Select, TwistRotate,
};
use touch_core::{
    FingerEvent, FingerId, PerspectiveCamera, ScreenProjection, SelectableConfig, SelectableId,
    SelectableRegistry, TouchConfig, TouchHub, Transform, DEFAULT_DAMPENING,
};

const FRAME_DT: f32 = 1.0 / 60.0;
const GESTURE_FRAMES: usize = 30;
const PICK_RADIUS: f32 = 40.0; // pixels

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scenario {
    Drag,
    Pinch,
    Twist,
    Select,
    Swipe,
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "drag" => Scenario::Drag,
            "pinch" => Scenario::Pinch,
            "twist" => Scenario::Twist,
            "select" => Scenario::Select,
            "swipe" => Scenario::Swipe,
            other => bail!("unknown scenario '{other}' (expected drag, pinch, twist, select or swipe)"),
        })
    }
}

struct Scene {
    hub: TouchHub,
    registry: SelectableRegistry,
    camera: PerspectiveCamera,
}

impl Scene {
    fn new() -> Result<Self> {
        let viewport = Vec2::new(800.0, 600.0);
        let config = TouchConfig {
            screen_dpi: Some(160.0),
            screen_size: Some(viewport),
            ..TouchConfig::default()
        };
        Ok(Self {
            hub: TouchHub::new(config).context("invalid touch configuration")?,
            registry: SelectableRegistry::new(),
            camera: PerspectiveCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, viewport)
                .context("invalid camera")?,
        })
    }

    /// Advances the hub one frame and feeds its events to the registry.
    fn step(&mut self) -> Vec<FingerEvent> {
        let events = self.hub.update(FRAME_DT);
        for event in &events {
            self.registry.handle_finger_event(event, self.hub.fingers());
        }
        events
    }

    fn ctx(&self) -> FrameContext<'_> {
        FrameContext::new(&self.hub, &self.registry, FRAME_DT).with_camera(&self.camera)
    }

    /// Runs a two-phase gesture: contacts at `path(0)`, moved along `path(t)`
    /// for `t` in (0, 1], then lifted.
    fn replay<F, P>(&mut self, fingers: usize, path: P, mut on_frame: F) -> Result<()>
    where
        P: Fn(usize, f32) -> Vec2,
        F: FnMut(&Scene, usize),
    {
        for i in 0..fingers {
            self.hub
                .press(FingerId(i as i32), path(i, 0.0), false)
                .context("failed to press finger")?;
        }
        self.step();
        on_frame(self, 0);

        for frame in 1..=GESTURE_FRAMES {
            let t = frame as f32 / GESTURE_FRAMES as f32;
            for i in 0..fingers {
                self.hub.move_to(FingerId(i as i32), path(i, t), false)?;
            }
            self.step();
            on_frame(self, frame);
        }

        for i in 0..fingers {
            self.hub.release(FingerId(i as i32))?;
        }
        self.step();
        self.step();
        Ok(())
    }
}

fn log_transform(frame: usize, transform: &Transform) {
    let (axis, angle) = transform.rotation.to_axis_angle();
    log::info!(
        "frame {:>3}: position {:.3?} scale {:.3?} rotation {:.1} deg about {:.2?}",
        frame,
        transform.position,
        transform.scale,
        angle.to_degrees(),
        axis
    );
}

fn run_drag(scene: &mut Scene, dampening: f32) -> Result<()> {
    let mut drag = DragTranslate::new();
    drag.dampening = dampening;
    let mut transform = Transform::IDENTITY;

    scene.replay(
        1,
        |_, t| Vec2::new(400.0 + 200.0 * t, 300.0 - 100.0 * t),
        |scene, frame| {
            drag.update(&scene.ctx(), &mut transform);
            if frame % 10 == 0 {
                log_transform(frame, &transform);
            }
        },
    )?;
    if !drag.damper().is_settled(1e-3) {
        log::info!("still settling: {:.3?}", drag.damper().remaining_translation());
    }
    Ok(())
}

fn run_pinch(scene: &mut Scene, dampening: f32) -> Result<()> {
    let mut pinch = PinchScale::new();
    pinch.dampening = dampening;
    pinch.relative = true;
    let mut transform = Transform::IDENTITY;

    scene.replay(
        2,
        |i, t| {
            let spread = 50.0 + 50.0 * t;
            let side = if i == 0 { -1.0 } else { 1.0 };
            Vec2::new(350.0 + side * spread, 300.0)
        },
        |scene, frame| {
            pinch.update(&scene.ctx(), &mut transform);
            if frame % 10 == 0 {
                log_transform(frame, &transform);
            }
        },
    )
}

fn run_twist(scene: &mut Scene, dampening: f32) -> Result<()> {
    let mut twist = TwistRotate::new();
    twist.dampening = dampening;
    let mut transform = Transform::IDENTITY;

    scene.replay(
        2,
        |i, t| {
            let angle = std::f32::consts::FRAC_PI_2 * t + std::f32::consts::PI * i as f32;
            Vec2::new(400.0, 300.0) + Vec2::from_angle(angle) * 80.0
        },
        |scene, frame| {
            twist.update(&scene.ctx(), &mut transform);
            if frame % 10 == 0 {
                log_transform(frame, &transform);
            }
        },
    )
}

/// Nearest registered entity whose projected position lies within the pick radius.
fn pick(
    camera: &PerspectiveCamera,
    entities: &[(SelectableId, Vec3)],
    screen: Vec2,
) -> Option<SelectableId> {
    entities
        .iter()
        .filter_map(|(id, world)| {
            let projected = camera.world_to_screen(*world)?;
            let distance = projected.truncate().distance(screen);
            (distance <= PICK_RADIUS).then_some((*id, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn run_select(scene: &mut Scene) -> Result<()> {
    let entities: Vec<(SelectableId, Vec3)> = [-2.0, 0.0, 2.0]
        .into_iter()
        .map(|x| {
            (
                scene.registry.register(SelectableConfig::default()),
                Vec3::new(x, 0.0, 0.0),
            )
        })
        .collect();

    scene.registry.signals().select.connect(|e| {
        log::info!("selected {:?} with {:?}", e.selectable, e.finger);
    });
    scene.registry.signals().deselect.connect(|id| {
        log::info!("deselected {:?}", id);
    });

    let select = Select {
        max_selectables: 2,
        auto_deselect: true,
        ..Select::default()
    };

    let mut taps: Vec<Vec2> = entities
        .iter()
        .filter_map(|(_, world)| scene.camera.world_to_screen(*world))
        .map(|p| p.truncate())
        .collect();
    taps.push(Vec2::new(20.0, 20.0));

    for (i, tap) in taps.into_iter().enumerate() {
        let finger = FingerId(i as i32);
        scene.hub.press(finger, tap, false)?;
        for event in scene.step() {
            if let FingerEvent::Down(f) = event {
                let candidate = pick(&scene.camera, &entities, f.screen_position);
                select.select(&mut scene.registry, Some(f.id), candidate);
            }
        }
        scene.hub.release(finger)?;
        scene.step();
        scene.step();
        log::info!("{} selected after tap {}", scene.registry.selected_count(), i);
    }
    Ok(())
}

fn run_swipe(scene: &mut Scene) -> Result<()> {
    let mut swipe = FingerSwipe::new().with_direction(90.0, 90.0);
    swipe.signals.on_delta.connect(|delta| log::info!("swipe delta {:.1?}", delta));
    swipe
        .signals
        .on_world_delta
        .connect(|delta| log::info!("swipe world delta {:.3?}", delta));

    for (i, end) in [Vec2::new(600.0, 310.0), Vec2::new(400.0, 500.0)]
        .into_iter()
        .enumerate()
    {
        let finger = FingerId(i as i32);
        scene.hub.press(finger, Vec2::new(400.0, 300.0), false)?;
        scene.step();
        scene.hub.move_to(finger, end, false)?;
        scene.hub.release(finger)?;
        for event in scene.step() {
            if !swipe.handle(&scene.ctx(), &event) && matches!(event, FingerEvent::Swipe(_)) {
                log::info!("swipe toward {:?} rejected", end);
            }
        }
        scene.step();
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let scenario: Scenario = args.next().as_deref().unwrap_or("drag").parse()?;
    let dampening = match args.next() {
        Some(raw) => raw
            .parse::<f32>()
            .with_context(|| format!("invalid dampening '{raw}'"))?,
        None => DEFAULT_DAMPENING,
    };

    let mut scene = Scene::new().context("failed to set up replay scene")?;
    log::info!("replaying {:?} (dampening {})", scenario, dampening);

    match scenario {
        Scenario::Drag => run_drag(&mut scene, dampening),
        Scenario::Pinch => run_pinch(&mut scene, dampening),
        Scenario::Twist => run_twist(&mut scene, dampening),
        Scenario::Select => run_select(&mut scene),
        Scenario::Swipe => run_swipe(&mut scene),
    }
}
