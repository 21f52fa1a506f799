use blob_web::core::shader::{compile, UniformTable};
use blob_web::core::{
    EffectState, FrameDriver, FULLSCREEN_WGSL, MAX_BLOBS, OUTPUT_WGSL, SPEED_WGSL,
};
use blob_web::error::EffectError;
use glam::Vec2;
use naga::ShaderStage;

const LAYOUT: Vec2 = Vec2::new(800.0, 600.0);
const NO_INPUT: [Vec2; 0] = [];

fn tables() -> (UniformTable, UniformTable) {
    let vs = compile("fullscreen", FULLSCREEN_WGSL, ShaderStage::Vertex).unwrap();
    let speed = compile("speed", SPEED_WGSL, ShaderStage::Fragment).unwrap();
    let output = compile("output", OUTPUT_WGSL, ShaderStage::Fragment).unwrap();
    (
        UniformTable::for_program(&vs.module, &speed.module),
        UniformTable::for_program(&vs.module, &output.module),
    )
}

fn driver() -> (FrameDriver, UniformTable, UniformTable) {
    let (speed, output) = tables();
    let d = FrameDriver::new(&speed, &output).unwrap();
    (d, speed, output)
}

fn assert_blob_slots(d: &FrameDriver) {
    let block = d.output_block();
    let blobs = &d.state.blobs;
    for (i, h) in d.blob_handles().iter().enumerate() {
        let color = block.get_f32(h.color);
        let position = block.get_f32(h.position);
        let size = block.get_f32(h.size)[0];
        match blobs.get(i) {
            Some(b) => {
                assert_eq!(&color[..3], &b.color[..], "slot {}", i);
                assert_eq!(&position[..2], &b.position[..], "slot {}", i);
                assert_eq!(size, b.size, "slot {}", i);
            }
            None => {
                assert_eq!(color, [0.0; 4], "slot {}", i);
                assert_eq!(position, [0.0; 4], "slot {}", i);
                assert_eq!(size, 0.0, "slot {}", i);
            }
        }
    }
}

#[test]
fn one_input_then_twenty_frames_settles() {
    let (mut d, _, output) = driver();
    assert_eq!(d.state.blobs.len(), 3);

    d.frame(0.0, LAYOUT, [Vec2::new(400.0, 300.0)]);
    let target = d.state.pointer.delta_target;
    assert_blob_slots(&d);
    for i in 1..20 {
        d.frame(i as f64 * 16.0, LAYOUT, NO_INPUT);
        assert_blob_slots(&d);
    }

    assert_eq!(d.state.pointer.moving, 0.0);
    assert!((d.state.pointer.delta - target).length() < 1e-4);
    assert_eq!(d.frames(), 20);

    let count = output.get("blob_count").unwrap();
    assert_eq!(d.output_block().get_i32(count), 3);
    let nonzero = d
        .blob_handles()
        .iter()
        .filter(|h| d.output_block().get_f32(h.size)[0] != 0.0)
        .count();
    assert_eq!(nonzero, 3);
    assert_eq!(MAX_BLOBS - nonzero, 7);
}

#[test]
fn every_slot_is_rewritten_each_frame() {
    let (mut d, _, _) = driver();
    d.output_block_mut().fill(0xDEAD_BEEF);
    d.frame(0.0, LAYOUT, NO_INPUT);
    assert_blob_slots(&d);
}

#[test]
fn speed_pointer_is_flipped_and_output_pointer_is_not() {
    let (mut d, speed, output) = driver();
    d.frame(0.0, LAYOUT, [Vec2::new(200.0, 150.0)]);

    let sp = d.speed_block().get_f32(speed.get("pointer_position").unwrap());
    assert_eq!(&sp[..2], &[0.25, 0.75]);
    let op = d.output_block().get_f32(output.get("pointer_position").unwrap());
    assert_eq!(&op[..2], &[0.25, 0.25]);

    let ratio = d.speed_block().get_f32(speed.get("ratio").unwrap())[0];
    assert!((ratio - 800.0 / 600.0).abs() < 1e-6);
    let power = d.speed_block().get_f32(speed.get("pointer_power").unwrap())[0];
    assert_eq!(power, d.state.pointer.moving);
    let fade = d.speed_block().get_f32(speed.get("speed_fade").unwrap())[0];
    assert_eq!(fade, d.state.params.speed_texture_fade_speed);
}

#[test]
fn pointer_multiplier_is_pushed_at_creation_and_on_change() {
    let (mut d, _, output) = driver();
    let h = output.get("pointer_multiplier").unwrap();
    assert_eq!(d.output_block().get_f32(h)[0], d.state.params.pointer_multiplier);

    d.set_pointer_multiplier(0.2);
    assert_eq!(d.output_block().get_f32(h)[0], 0.2);
    assert_eq!(d.state.params.pointer_multiplier, 0.2);
}

#[test]
fn time_uniform_tracks_frame_clock() {
    let (mut d, _, output) = driver();
    d.frame(1234.0, LAYOUT, NO_INPUT);
    let t = d.output_block().get_f32(output.get("time").unwrap())[0];
    assert_eq!(t, 1234.0);
}

#[test]
fn drifted_shader_contract_is_fatal() {
    let (speed, _) = tables();
    let err = FrameDriver::with_state(&speed, &speed, EffectState::default()).err();
    assert!(matches!(err, Some(EffectError::MissingUniform { .. })));
}
