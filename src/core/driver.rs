//! Per-frame uniform protocol.
//!
//! [`FrameDriver`] owns the session state and the CPU copies of both
//! programs' uniform blocks. Each frame it applies queued input, advances the
//! pointer smoothing and rewrites the blocks in a fixed order; the GPU side
//! only flushes the blocks and draws.

use super::constants::MAX_BLOBS;
use super::shader::{UniformBlock, UniformHandle, UniformTable};
use super::state::{Blob, EffectState};
use crate::error::EffectError;
use glam::Vec2;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const SPEED_PROGRAM: &str = "speed";
pub const OUTPUT_PROGRAM: &str = "output";

/// Events queued by the input handlers and drained once per frame.
pub type InputQueue = Rc<RefCell<VecDeque<InputEvent>>>;

/// Input delivered by the host between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Page coordinates in CSS pixels.
    Pointer { x: f32, y: f32 },
    /// New backing-store size in device pixels.
    Resize { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug)]
pub struct BlobHandles {
    pub color: UniformHandle,
    pub position: UniformHandle,
    pub size: UniformHandle,
}

#[derive(Clone, Copy, Debug)]
struct SpeedHandles {
    pointer_position: UniformHandle,
    delta_xy: UniformHandle,
    pointer_power: UniformHandle,
    ratio: UniformHandle,
    speed_fade: UniformHandle,
}

#[derive(Clone, Copy, Debug)]
struct OutputHandles {
    time: UniformHandle,
    ratio: UniformHandle,
    pointer_position: UniformHandle,
    pointer_multiplier: UniformHandle,
    blob_count: UniformHandle,
    blobs: [BlobHandles; MAX_BLOBS],
}

/// Resolves `blob_colors[i]`, `blob_positions[i]` and `blob_sizes[i]` once so
/// the per-frame push indexes numerically.
pub fn resolve_blob_handles(table: &UniformTable) -> Result<[BlobHandles; MAX_BLOBS], EffectError> {
    let mut out = Vec::with_capacity(MAX_BLOBS);
    for i in 0..MAX_BLOBS {
        out.push(BlobHandles {
            color: table.require(OUTPUT_PROGRAM, &format!("blob_colors[{}]", i))?,
            position: table.require(OUTPUT_PROGRAM, &format!("blob_positions[{}]", i))?,
            size: table.require(OUTPUT_PROGRAM, &format!("blob_sizes[{}]", i))?,
        });
    }
    out.try_into()
        .map_err(|_| EffectError::MissingUniform {
            program: OUTPUT_PROGRAM.to_string(),
            name: "blob_colors".to_string(),
        })
}

pub struct FrameDriver {
    pub state: EffectState,
    speed: UniformBlock,
    output: UniformBlock,
    speed_handles: SpeedHandles,
    output_handles: OutputHandles,
    frames: u64,
}

impl FrameDriver {
    pub fn new(speed_table: &UniformTable, output_table: &UniformTable) -> Result<Self, EffectError> {
        Self::with_state(speed_table, output_table, EffectState::default())
    }

    pub fn with_state(
        speed_table: &UniformTable,
        output_table: &UniformTable,
        state: EffectState,
    ) -> Result<Self, EffectError> {
        let s = |name: &str| speed_table.require(SPEED_PROGRAM, name);
        let speed_handles = SpeedHandles {
            pointer_position: s("pointer_position")?,
            delta_xy: s("delta_xy")?,
            pointer_power: s("pointer_power")?,
            ratio: s("ratio")?,
            speed_fade: s("speed_fade")?,
        };
        let o = |name: &str| output_table.require(OUTPUT_PROGRAM, name);
        let output_handles = OutputHandles {
            time: o("time")?,
            ratio: o("ratio")?,
            pointer_position: o("pointer_position")?,
            pointer_multiplier: o("pointer_multiplier")?,
            blob_count: o("blob_count")?,
            blobs: resolve_blob_handles(output_table)?,
        };
        let mut driver = Self {
            state,
            speed: speed_table.new_block(),
            output: output_table.new_block(),
            speed_handles,
            output_handles,
            frames: 0,
        };
        let initial = driver.state.params.pointer_multiplier;
        driver.set_pointer_multiplier(initial);
        Ok(driver)
    }

    /// Runs the CPU half of one frame: time, input, pointer smoothing, the
    /// velocity pass uniforms, then the blob and output uniforms. `layout` is
    /// the surface size in CSS pixels, the space pointer events arrive in.
    pub fn frame(&mut self, now_ms: f64, layout: Vec2, pointer_inputs: impl IntoIterator<Item = Vec2>) {
        self.output.set(self.output_handles.time, now_ms as f32);

        for p in pointer_inputs {
            self.state.pointer.on_input(p.x, p.y, &self.state.params);
        }
        self.state.pointer.on_frame(&self.state.params);

        self.write_speed_uniforms(layout);
        self.push_blobs();
        let h = self.output_handles;
        self.output
            .set(h.pointer_position, self.state.pointer.normalized(layout));
        self.output.set(h.ratio, aspect(layout));
        self.frames += 1;
    }

    fn write_speed_uniforms(&mut self, layout: Vec2) {
        let h = self.speed_handles;
        let pointer = &self.state.pointer;
        let n = pointer.normalized(layout);
        self.speed.set(h.pointer_position, [n.x, 1.0 - n.y]);
        self.speed.set(h.pointer_power, pointer.moving);
        self.speed.set(h.delta_xy, pointer.delta);
        self.speed.set(h.ratio, aspect(layout));
        self.speed
            .set(h.speed_fade, self.state.params.speed_texture_fade_speed);
    }

    /// Writes every slot up to `MAX_BLOBS`; absent blobs get zeros so nothing
    /// stale survives a smaller blob set.
    fn push_blobs(&mut self) {
        let zero = Blob {
            color: [0.0; 3],
            position: [0.0; 2],
            size: 0.0,
        };
        for (i, slot) in self.output_handles.blobs.iter().enumerate() {
            let blob = self.state.blobs.get(i).copied().unwrap_or(zero);
            self.output.set(slot.color, blob.color);
            self.output.set(slot.position, blob.position);
            self.output.set(slot.size, blob.size);
        }
        self.output.set(
            self.output_handles.blob_count,
            self.state.blobs.len() as i32,
        );
    }

    /// Updates the tunable and its uniform right away, outside the frame push.
    pub fn set_pointer_multiplier(&mut self, value: f32) {
        self.state.params.pointer_multiplier = value;
        self.output.set(self.output_handles.pointer_multiplier, value);
    }

    #[inline]
    pub fn speed_block(&self) -> &UniformBlock {
        &self.speed
    }

    #[inline]
    pub fn output_block(&self) -> &UniformBlock {
        &self.output
    }

    pub fn output_block_mut(&mut self) -> &mut UniformBlock {
        &mut self.output
    }

    pub fn blob_handles(&self) -> &[BlobHandles; MAX_BLOBS] {
        &self.output_handles.blobs
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[inline]
fn aspect(layout: Vec2) -> f32 {
    let l = layout.max(Vec2::ONE);
    l.x / l.y
}
