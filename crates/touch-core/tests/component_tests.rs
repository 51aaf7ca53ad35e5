// Tests for the ready-made gesture components.

use glam::{Quat, Vec2, Vec3};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use touch_core::components::*;
use touch_core::*;

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-2;

fn make_camera() -> PerspectiveCamera {
    PerspectiveCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec2::new(800.0, 600.0)).unwrap()
}

fn make_hub() -> TouchHub {
    TouchHub::new(TouchConfig::default()).unwrap()
}

/// Presses fingers at `from`, then moves them to `to` on the next frame.
fn make_gesture(from: &[Vec2], to: &[Vec2]) -> TouchHub {
    let mut hub = make_hub();
    for (i, p) in from.iter().enumerate() {
        hub.press(FingerId(i as i32), *p, false).unwrap();
    }
    hub.update(DT);
    for (i, p) in to.iter().enumerate() {
        hub.move_to(FingerId(i as i32), *p, false).unwrap();
    }
    hub.update(DT);
    hub
}

fn make_finger(id: i32, start: Vec2, current: Vec2) -> Finger {
    let mut finger = Finger::new(FingerId(id), start, false);
    finger.screen_position = current;
    finger
}

fn same_rotation(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - 1e-6
}

fn counter<A: 'static>(signal: &Signal<A>) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    signal.connect(move |_| c.set(c.get() + 1));
    count
}

#[test]
fn drag_translate_keeps_object_under_the_finger() {
    let camera = make_camera();
    let registry = SelectableRegistry::new();
    let hub = make_gesture(&[Vec2::new(400.0, 300.0)], &[Vec2::new(500.0, 300.0)]);
    let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);

    let mut transform = Transform::IDENTITY;
    let mut drag = DragTranslate::new();
    drag.update(&ctx, &mut transform);

    let screen = camera.world_to_screen(transform.position).unwrap();
    assert!((screen.x - 500.0).abs() < EPSILON);
    assert!((screen.y - 300.0).abs() < EPSILON);
    assert!(transform.position.x > 0.0);
    assert!(transform.position.z.abs() < EPSILON);
}

#[test]
fn drag_translate_without_camera_leaves_transform_alone() {
    let registry = SelectableRegistry::new();
    let hub = make_gesture(&[Vec2::new(400.0, 300.0)], &[Vec2::new(500.0, 300.0)]);
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut transform = Transform::IDENTITY;
    let mut drag = DragTranslate::new();
    drag.update(&ctx, &mut transform);
    drag.update(&ctx, &mut transform);
    assert_eq!(transform, Transform::IDENTITY);
}

#[test]
fn damped_drag_catches_up_over_frames() {
    let camera = make_camera();
    let registry = SelectableRegistry::new();
    let mut hub = make_gesture(&[Vec2::new(400.0, 300.0)], &[Vec2::new(500.0, 300.0)]);
    let mut transform = Transform::IDENTITY;
    let mut drag = DragTranslate::new();
    drag.dampening = 10.0;

    {
        let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);
        drag.update(&ctx, &mut transform);
    }
    let first = transform.position.x;
    assert!(first > 0.0);
    assert!(drag.damper().remaining_translation().x > 0.0);

    for _ in 0..240 {
        hub.update(DT);
        let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);
        drag.update(&ctx, &mut transform);
    }
    assert!(transform.position.x > first);
    assert!(drag.damper().is_settled(1e-3));
}

#[test]
fn pinch_spreading_to_one_point_four_scales_by_one_point_four() {
    let registry = SelectableRegistry::new();
    let hub = make_gesture(
        &[Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)],
        &[Vec2::new(80.0, 100.0), Vec2::new(220.0, 100.0)],
    );
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut transform = Transform::IDENTITY;
    let mut pinch = PinchScale::new();
    pinch.update(&ctx, &mut transform);
    assert!((transform.scale.x - 1.4).abs() < 1e-4);
    assert!((transform.scale.z - 1.4).abs() < 1e-4);
}

#[test]
fn relative_pinch_pushes_object_away_from_finger_center() {
    let camera = make_camera();
    let registry = SelectableRegistry::new();
    // Finger centre at (300, 300); the object sits 100px to its right.
    let hub = make_gesture(
        &[Vec2::new(250.0, 300.0), Vec2::new(350.0, 300.0)],
        &[Vec2::new(230.0, 300.0), Vec2::new(370.0, 300.0)],
    );
    let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);

    let mut transform = Transform::IDENTITY;
    let mut pinch = PinchScale::new();
    pinch.relative = true;
    pinch.update(&ctx, &mut transform);

    let screen = camera.world_to_screen(transform.position).unwrap();
    assert!((screen.x - 440.0).abs() < EPSILON);
    assert!((screen.y - 300.0).abs() < EPSILON);
}

#[test]
fn single_finger_never_pinches() {
    let registry = SelectableRegistry::new();
    let hub = make_gesture(&[Vec2::new(100.0, 100.0)], &[Vec2::new(300.0, 100.0)]);
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut transform = Transform::IDENTITY;
    PinchScale::new().update(&ctx, &mut transform);
    assert_eq!(transform.scale, Vec3::ONE);
}

#[test]
fn twist_rotates_around_the_view_axis() {
    let camera = make_camera();
    let registry = SelectableRegistry::new();
    let hub = make_gesture(
        &[Vec2::new(390.0, 300.0), Vec2::new(410.0, 300.0)],
        &[Vec2::new(400.0, 290.0), Vec2::new(400.0, 310.0)],
    );
    let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);

    let mut transform = Transform::IDENTITY;
    TwistRotate::new().update(&ctx, &mut transform);

    let expected = Quat::from_axis_angle(Vec3::NEG_Z, std::f32::consts::FRAC_PI_2);
    assert!(same_rotation(transform.rotation, expected));
}

#[test]
fn twist_rotate_axis_spins_about_its_axis() {
    let registry = SelectableRegistry::new();
    let hub = make_gesture(
        &[Vec2::new(390.0, 300.0), Vec2::new(410.0, 300.0)],
        &[Vec2::new(400.0, 290.0), Vec2::new(400.0, 310.0)],
    );
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut transform = Transform::IDENTITY;
    let mut twist = TwistRotateAxis::new(Vec3::Y, RotationSpace::World);
    twist.update(&ctx, &mut transform);

    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    assert!(same_rotation(transform.rotation, expected));
}

#[test]
fn drag_camera_moves_against_the_fingers() {
    let camera = make_camera();
    let registry = SelectableRegistry::new();
    let hub = make_gesture(&[Vec2::new(400.0, 300.0)], &[Vec2::new(500.0, 300.0)]);
    let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);

    let mut camera_transform = Transform::from_position(camera.eye);
    let mut drag = DragCamera::new();
    drag.update(&ctx, &mut camera_transform);

    assert!(camera_transform.position.x < 0.0);
    assert!(camera_transform.position.y.abs() < EPSILON);
    assert!((camera_transform.position.z - 10.0).abs() < EPSILON);
}

#[test]
fn move_to_selection_targets_the_selected_center() {
    let mut registry = SelectableRegistry::new();
    let a = registry.register(SelectableConfig::default());
    let b = registry.register(SelectableConfig::default());
    let c = registry.register(SelectableConfig::default());
    registry.select(a, None).unwrap();
    registry.select(b, None).unwrap();
    let positions = [Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 0.0), Vec3::splat(100.0)];
    let ids = [a, b, c];
    let position_of = |id: SelectableId| ids.iter().position(|x| *x == id).map(|i| positions[i]);

    let hub = make_hub();
    let mut transform = Transform::IDENTITY;
    let mut drag = DragCamera::new();
    assert!(drag.move_to_selection(&transform, &registry, position_of));
    assert_eq!(drag.damper().remaining_translation(), Vec3::new(3.0, 1.0, 0.0));

    let ctx = FrameContext::new(&hub, &registry, DT);
    drag.update(&ctx, &mut transform);
    assert!((transform.position - Vec3::new(3.0, 1.0, 0.0)).length() < 1e-4);

    registry.deselect_all();
    assert!(!drag.move_to_selection(&transform, &registry, position_of));
}

#[test]
fn roll_wraps_the_short_way() {
    let mut roll = Roll::new();
    roll.angle = 350.0;
    let mut transform = Transform::IDENTITY;
    roll.update(DT, &mut transform);
    assert!((roll.current_angle() + 10.0).abs() < 1e-4);
    let expected = Quat::from_rotation_z(10f32.to_radians());
    assert!(same_rotation(transform.rotation, expected));
}

#[test]
fn roll_target_controls() {
    let mut roll = Roll::new();
    roll.increment_angle(30.0);
    roll.decrement_angle(10.0);
    assert_eq!(roll.angle, 20.0);

    roll.rotate_to_delta(Vec2::ZERO);
    assert_eq!(roll.angle, 20.0);
    roll.rotate_to_delta(Vec2::new(1.0, 0.0));
    assert!((roll.angle - 90.0).abs() < 1e-4);

    roll.dampening = 0.0;
    roll.snap_to_target();
    assert_eq!(roll.current_angle(), 90.0);
}

#[test]
fn roll_to_upward_delta_keeps_the_object_upright() {
    let mut roll = Roll::new();
    roll.rotate_to_delta(Vec2::new(0.0, -100.0));
    assert!(roll.angle.abs() < 1e-4);

    let mut transform = Transform::IDENTITY;
    roll.update(DT, &mut transform);
    assert!((transform.rotation * Vec3::Y - Vec3::Y).length() < 1e-4);

    roll.rotate_to_delta(Vec2::new(100.0, 0.0));
    roll.update(DT, &mut transform);
    assert!((transform.rotation * Vec3::Y - Vec3::X).length() < 1e-4);
}

#[test]
fn pulse_scale_bumps_then_decays() {
    let mut pulse = PulseScale::new();
    let mut transform = Transform::IDENTITY;

    pulse.update(0.5, &mut transform);
    assert!((transform.scale.x - 1.0).abs() < 1e-6);

    pulse.update(0.5, &mut transform);
    let factor = 1.0 - (-5.0f32 * 0.5).exp();
    let size = 2.0 + (1.0 - 2.0) * factor;
    assert!((pulse.size - size).abs() < 1e-5);
    let expected = 1.0 + (size - 1.0) * factor;
    assert!((transform.scale.x - expected).abs() < 1e-5);

    for _ in 0..20 {
        pulse.update(0.1, &mut transform);
    }
    assert!(pulse.size > 1.0);
    assert!(pulse.size < 2.0);
}

#[test]
fn finger_down_respects_gui_and_selection() {
    let hub = make_hub();
    let mut registry = SelectableRegistry::new();
    let id = registry.register(SelectableConfig::default());
    let mut down = FingerDown::new();
    let fired = counter(&down.on_finger);

    let touch = FingerEvent::Down(Finger::new(FingerId(0), Vec2::ZERO, false));
    let over_gui = FingerEvent::Down(Finger::new(FingerId(1), Vec2::ZERO, true));
    let up = FingerEvent::Up(Finger::new(FingerId(2), Vec2::ZERO, false));

    assert!(down.handle(&FrameContext::new(&hub, &registry, DT), &touch));
    assert!(!down.handle(&FrameContext::new(&hub, &registry, DT), &over_gui));
    assert!(!down.handle(&FrameContext::new(&hub, &registry, DT), &up));
    assert_eq!(fired.get(), 1);

    down.required_selectable = Some(id);
    assert!(!down.handle(&FrameContext::new(&hub, &registry, DT), &touch));
    registry.select(id, None).unwrap();
    assert!(down.handle(&FrameContext::new(&hub, &registry, DT), &touch));
}

#[test]
fn finger_up_reports_world_start_position() {
    let camera = make_camera();
    let hub = make_hub();
    let registry = SelectableRegistry::new();
    let ctx = FrameContext::new(&hub, &registry, DT).with_camera(&camera);

    let mut up = FingerUp::new();
    let positions = Rc::new(RefCell::new(Vec::new()));
    let p = Rc::clone(&positions);
    up.on_position.connect(move |v: &Vec3| p.borrow_mut().push(*v));

    let finger = make_finger(0, Vec2::new(400.0, 300.0), Vec2::new(600.0, 300.0));
    assert!(up.handle(&ctx, &FingerEvent::Up(finger)));
    let positions = positions.borrow();
    assert_eq!(positions.len(), 1);
    assert!(positions[0].length() < EPSILON);
}

#[test]
fn finger_set_scales_and_skips_static_fingers() {
    let registry = SelectableRegistry::new();
    let hub = make_hub();
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut set = FingerSet::new();
    set.ignore_if_static = true;
    set.multiplier = 2.0;
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let d = Rc::clone(&deltas);
    set.signals.on_delta.connect(move |v: &Vec2| d.borrow_mut().push(*v));

    let still = Finger::new(FingerId(0), Vec2::ZERO, false);
    assert!(!set.handle(&ctx, &FingerEvent::Update(still)));

    let mut moving = Finger::new(FingerId(1), Vec2::ZERO, false);
    moving.screen_position = Vec2::new(3.0, 4.0);
    assert!(set.handle(&ctx, &FingerEvent::Update(moving)));
    assert_eq!(*deltas.borrow(), vec![Vec2::new(6.0, 8.0)]);
}

#[test]
fn finger_swipe_validates_the_arc() {
    let registry = SelectableRegistry::new();
    let hub = make_hub();
    let ctx = FrameContext::new(&hub, &registry, DT);

    // 90 degrees is a swipe to the right.
    let mut swipe = FingerSwipe::new().with_direction(90.0, 90.0);
    let fired = counter(&swipe.signals.on_finger);

    let right = make_finger(0, Vec2::ZERO, Vec2::new(300.0, 20.0));
    let down = make_finger(1, Vec2::ZERO, Vec2::new(0.0, 300.0));
    assert!(swipe.handle(&ctx, &FingerEvent::Swipe(right)));
    assert!(!swipe.handle(&ctx, &FingerEvent::Swipe(down)));
    assert_eq!(fired.get(), 1);

    assert!(swipe.angle_is_valid(Vec2::new(1.0, 0.9)));
    assert!(!swipe.angle_is_valid(Vec2::new(1.0, 1.1)));
    assert!(FingerSwipe::new().angle_is_valid(Vec2::new(-5.0, 0.0)));
}

#[test]
fn finger_swipe_zero_angle_is_up_the_screen() {
    let registry = SelectableRegistry::new();
    let hub = make_hub();
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut swipe = FingerSwipe::new().with_direction(0.0, 90.0);
    let up = make_finger(0, Vec2::new(400.0, 400.0), Vec2::new(400.0, 100.0));
    let down = make_finger(1, Vec2::new(400.0, 100.0), Vec2::new(400.0, 400.0));
    assert!(swipe.handle(&ctx, &FingerEvent::Swipe(up)));
    assert!(!swipe.handle(&ctx, &FingerEvent::Swipe(down)));
}

#[test]
fn full_arc_still_rejects_the_opposite_direction() {
    let swipe = FingerSwipe::new().with_direction(0.0, 360.0);
    assert!(swipe.angle_is_valid(Vec2::new(0.0, -300.0)));
    assert!(swipe.angle_is_valid(Vec2::new(300.0, 10.0)));
    assert!(!swipe.angle_is_valid(Vec2::new(0.0, 300.0)));
}

#[test]
fn finger_swipe_modifies_the_delta() {
    let registry = SelectableRegistry::new();
    let hub = make_hub();
    let ctx = FrameContext::new(&hub, &registry, DT);

    let mut swipe = FingerSwipe::new();
    swipe.modify = SwipeModify::Normalize4;
    swipe.multiplier = 3.0;
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let d = Rc::clone(&deltas);
    swipe.signals.on_delta.connect(move |v: &Vec2| d.borrow_mut().push(*v));

    let finger = make_finger(0, Vec2::ZERO, Vec2::new(40.0, -200.0));
    swipe.handle(&ctx, &FingerEvent::Swipe(finger));
    assert_eq!(*deltas.borrow(), vec![Vec2::new(0.0, -3.0)]);

    let normalized = SwipeModify::Normalize.apply(Vec2::new(3.0, 4.0));
    assert!((normalized - Vec2::new(0.6, 0.8)).length() < 1e-6);
    assert_eq!(SwipeModify::Normalize4.apply(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn finger_swipe_requires_the_selecting_finger() {
    let hub = make_hub();
    let mut registry = SelectableRegistry::new();
    let id = registry.register(SelectableConfig::default());
    registry.select(id, Some(FingerId(1))).unwrap();

    let mut swipe = FingerSwipe::new();
    swipe.required_selectable = Some(id);
    let other = make_finger(0, Vec2::ZERO, Vec2::new(300.0, 0.0));
    let owner = make_finger(1, Vec2::ZERO, Vec2::new(300.0, 0.0));
    let ctx = FrameContext::new(&hub, &registry, DT);
    assert!(!swipe.handle(&ctx, &FingerEvent::Swipe(other)));
    assert!(swipe.handle(&ctx, &FingerEvent::Swipe(owner)));
}

#[test]
fn select_culls_to_max_selectables() {
    let mut registry = SelectableRegistry::new();
    let ids: Vec<_> = (0..3)
        .map(|_| registry.register(SelectableConfig::default()))
        .collect();
    let select = Select {
        max_selectables: 2,
        ..Select::default()
    };

    for &id in &ids {
        select.select(&mut registry, None, Some(id));
    }
    let mut selected = Vec::new();
    registry.get_selected(&mut selected);
    assert_eq!(selected, vec![ids[1], ids[2]]);
}

#[test]
fn select_reselect_policies() {
    let mut registry = SelectableRegistry::new();
    let id = registry.register(SelectableConfig::default());

    let toggle = Select {
        reselect: ReselectType::Deselect,
        ..Select::default()
    };
    toggle.select(&mut registry, None, Some(id));
    assert!(registry.is_selected(id));
    toggle.select(&mut registry, None, Some(id));
    assert!(!registry.is_selected(id));

    let again = Select::default();
    again.select(&mut registry, Some(FingerId(0)), Some(id));
    again.select(&mut registry, Some(FingerId(1)), Some(id));
    assert_eq!(registry.selecting_fingers(id), &[FingerId(0), FingerId(1)]);

    let fresh = Select {
        reselect: ReselectType::DeselectAndSelect,
        ..Select::default()
    };
    fresh.select(&mut registry, Some(FingerId(2)), Some(id));
    assert_eq!(registry.selecting_fingers(id), &[FingerId(2)]);

    let keep = Select {
        reselect: ReselectType::KeepSelected,
        ..Select::default()
    };
    keep.select(&mut registry, Some(FingerId(3)), Some(id));
    assert_eq!(registry.selecting_fingers(id), &[FingerId(2)]);
}

#[test]
fn picking_nothing_can_clear_the_selection() {
    let mut registry = SelectableRegistry::new();
    let id = registry.register(SelectableConfig::default());
    registry.select(id, None).unwrap();

    Select::default().select(&mut registry, None, None);
    assert!(registry.is_selected(id));

    let select = Select {
        auto_deselect: true,
        ..Select::default()
    };
    select.select(&mut registry, None, None);
    assert!(!registry.is_selected(id));
}

#[test]
fn hidden_selection_blocks_other_hiding_selectables() {
    let mut registry = SelectableRegistry::new();
    let hiding = SelectableConfig {
        hide_with_finger: true,
        ..SelectableConfig::default()
    };
    let a = registry.register(hiding);
    let b = registry.register(hiding);
    let plain = registry.register(SelectableConfig::default());
    let select = Select::default();

    select.select(&mut registry, None, Some(a));
    select.select(&mut registry, None, Some(b));
    select.select(&mut registry, None, Some(plain));
    assert!(registry.is_selected(a));
    assert!(!registry.is_selected(b));
    assert!(registry.is_selected(plain));
}
