use blob_web::core::{response_curve, Params, PointerState};
use glam::Vec2;

#[test]
fn input_sets_activity_to_one() {
    let params = Params::default();
    let mut p = PointerState::default();
    p.on_input(120.0, 80.0, &params);
    assert_eq!(p.moving, 1.0);
    assert_eq!(p.position, Vec2::new(120.0, 80.0));
}

#[test]
fn activity_decays_monotonically_and_snaps_to_zero() {
    let params = Params::default();
    let mut p = PointerState::default();
    p.on_input(10.0, 10.0, &params);

    let mut prev = p.moving;
    let mut frames = 0;
    while p.moving > 0.0 {
        p.on_frame(&params);
        assert!((0.0..=1.0).contains(&p.moving));
        assert!(p.moving <= prev);
        prev = p.moving;
        frames += 1;
        assert!(frames <= 11, "activity still {} after {} frames", p.moving, frames);
    }
    assert_eq!(p.moving, 0.0);

    p.on_frame(&params);
    assert_eq!(p.moving, 0.0);
}

#[test]
fn displacement_target_uses_signed_power_curve() {
    let params = Params::default();
    let mut p = PointerState::default();
    p.on_input(100.0, 100.0, &params);
    p.on_input(60.0, 164.0, &params);

    let expected = Vec2::new(
        -(40.0f32.powf(params.pointer_power)),
        64.0f32.powf(params.pointer_power),
    );
    assert!((p.delta_target - expected).length() < 1e-5);
}

#[test]
fn smoothed_displacement_converges_to_target() {
    let params = Params::default();
    let mut p = PointerState::default();
    p.on_input(400.0, 300.0, &params);
    let target = p.delta_target;
    for _ in 0..20 {
        p.on_frame(&params);
    }
    assert!((p.delta - target).length() < 1e-4);
}

#[test]
fn response_curve_preserves_sign() {
    for d in [-250.0, -3.5, -0.01, 0.01, 0.7, 42.0] {
        let r = response_curve(d, 0.35);
        assert_eq!(r.signum(), f32::signum(d), "d={}", d);
    }
    assert_eq!(response_curve(0.0, 0.35), 0.0);
    assert!((response_curve(-8.0, 1.0 / 3.0) + 2.0).abs() < 1e-5);
}

#[test]
fn normalized_position_is_relative_to_layout() {
    let params = Params::default();
    let mut p = PointerState::default();
    p.on_input(200.0, 450.0, &params);
    assert_eq!(p.normalized(Vec2::new(800.0, 600.0)), Vec2::new(0.25, 0.75));
    // Degenerate layouts are clamped rather than dividing by zero.
    assert!(p.normalized(Vec2::ZERO).is_finite());
}
