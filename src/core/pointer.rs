use super::state::Params;
use crate::constants::ACTIVITY_SNAP_THRESHOLD;
use glam::Vec2;

/// Smoothed pointer displacement plus a decaying activity level.
///
/// `moving` is reset to 1 on every input and decays once per frame, snapping
/// to 0 below [`ACTIVITY_SNAP_THRESHOLD`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub delta: Vec2,
    pub delta_target: Vec2,
    pub moving: f32,
}

impl PointerState {
    pub fn on_input(&mut self, x: f32, y: f32, params: &Params) {
        let raw = Vec2::new(x, y) - self.position;
        self.delta_target = Vec2::new(
            response_curve(raw.x, params.pointer_power),
            response_curve(raw.y, params.pointer_power),
        );
        self.position = Vec2::new(x, y);
        self.moving = 1.0;
    }

    pub fn on_frame(&mut self, params: &Params) {
        self.delta += (self.delta_target - self.delta) * params.delta_threshold;
        self.moving *= params.pointer_fade_speed;
        if self.moving < ACTIVITY_SNAP_THRESHOLD {
            self.moving = 0.0;
        }
    }

    /// Position normalized by the layout size, y measured from the top.
    #[inline]
    pub fn normalized(&self, layout: Vec2) -> Vec2 {
        self.position / layout.max(Vec2::ONE)
    }
}

/// Signed power curve: compresses large jumps, keeps small motions visible.
#[inline]
pub fn response_curve(d: f32, power: f32) -> f32 {
    if d == 0.0 {
        return 0.0;
    }
    d.signum() * d.abs().powf(power)
}
