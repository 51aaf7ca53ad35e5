// Tests for framerate-independent transform damping.

use glam::{Quat, Vec3};
use touch_core::*;

const EPSILON: f32 = 1e-4;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

#[test]
fn dampen_factor_edges() {
    assert_eq!(dampen_factor(-1.0, 0.016), 1.0);
    assert_eq!(dampen_factor(0.0, 0.016), 0.0);
    assert_eq!(dampen_factor(10.0, 0.0), 0.0);
    let expected = 1.0 - (-10.0f32 * 0.1).exp();
    assert!((dampen_factor(10.0, 0.1) - expected).abs() < 1e-6);
}

#[test]
fn damping_is_framerate_independent() {
    let one = 1.0 - dampen_factor(4.0, 0.5);
    let two = (1.0 - dampen_factor(4.0, 0.25)).powi(2);
    assert!((one - two).abs() < 1e-6);
}

#[test]
fn negative_dampening_applies_everything_at_once() {
    let mut transform = Transform::IDENTITY;
    let mut damper = TransformDamper::default();
    damper.apply(&mut transform, -1.0, 0.016, |t| {
        t.position += Vec3::new(3.0, 0.0, 0.0);
        t.scale *= 2.0;
        t.rotate_local(Quat::from_rotation_z(0.5));
    });

    assert!(approx_vec3(transform.position, Vec3::new(3.0, 0.0, 0.0)));
    assert!(approx_vec3(transform.scale, Vec3::splat(2.0)));
    assert!(transform.rotation.dot(Quat::from_rotation_z(0.5)).abs() > 1.0 - 1e-6);
    assert!(damper.is_settled(EPSILON));
}

#[test]
fn zero_dampening_never_releases_the_change() {
    let mut transform = Transform::IDENTITY;
    let mut damper = TransformDamper::default();
    damper.apply(&mut transform, 0.0, 0.016, |t| {
        t.position.x += 5.0;
        t.scale *= 2.0;
    });
    for _ in 0..10 {
        damper.apply(&mut transform, 0.0, 0.016, |_| {});
    }

    assert!(approx_vec3(transform.position, Vec3::ZERO));
    assert!(approx_vec3(transform.scale, Vec3::ONE));
    assert!(approx_vec3(damper.remaining_translation(), Vec3::new(5.0, 0.0, 0.0)));
    assert!(approx_vec3(damper.remaining_scale(), Vec3::splat(2.0)));
}

#[test]
fn positive_dampening_releases_a_fraction_per_frame() {
    let dt = 0.1;
    let half = std::f32::consts::LN_2 / dt;
    let mut transform = Transform::IDENTITY;
    let mut damper = TransformDamper::default();

    damper.apply(&mut transform, half, dt, |t| t.position.x += 10.0);
    assert!((transform.position.x - 5.0).abs() < EPSILON);
    assert!((damper.remaining_translation().x - 5.0).abs() < EPSILON);

    damper.apply(&mut transform, half, dt, |_| {});
    assert!((transform.position.x - 7.5).abs() < EPSILON);
}

#[test]
fn damped_scale_is_multiplicative() {
    let dt = 0.1;
    let half = std::f32::consts::LN_2 / dt;
    let mut transform = Transform::IDENTITY;
    let mut damper = TransformDamper::default();

    damper.apply(&mut transform, half, dt, |t| t.scale *= 3.0);
    // Remaining multiplier 3 settles halfway to 2, so 3 / 2 is visible.
    assert!((transform.scale.x - 1.5).abs() < EPSILON);
    assert!((damper.remaining_scale().x - 2.0).abs() < EPSILON);
}

#[test]
fn raw_change_is_visible_inside_the_closure() {
    let mut transform = Transform::IDENTITY;
    let mut damper = TransformDamper::default();
    let mut seen = Vec3::ZERO;
    damper.apply(&mut transform, 0.0, 0.016, |t| {
        t.position.y = 4.0;
        seen = t.position;
    });
    assert_eq!(seen, Vec3::new(0.0, 4.0, 0.0));
    assert_eq!(transform.position, Vec3::ZERO);
}

#[test]
fn pushed_translation_is_released_by_damping() {
    let mut transform = Transform::from_position(Vec3::new(1.0, 1.0, 1.0));
    let mut damper = TransformDamper::default();
    damper.push_translation(Vec3::new(2.0, 0.0, 0.0));
    damper.apply(&mut transform, -1.0, 0.016, |_| {});
    assert!(approx_vec3(transform.position, Vec3::new(3.0, 1.0, 1.0)));
}

#[test]
fn degenerate_scale_axis_does_not_poison_the_damper() {
    let mut transform = Transform {
        scale: Vec3::new(0.0, 1.0, 1.0),
        ..Transform::IDENTITY
    };
    let mut damper = TransformDamper::default();
    damper.apply(&mut transform, -1.0, 0.016, |t| t.scale *= 2.0);
    assert!(damper.remaining_scale().is_finite());
    assert!((transform.scale.y - 2.0).abs() < EPSILON);
}

#[test]
fn angle_damping_wraps() {
    assert!((damp_angle_degrees(350.0, 10.0, 0.5) - 360.0).abs() < EPSILON);
    assert!((damp_towards(0.0, 10.0, 0.25) - 2.5).abs() < EPSILON);
}
