//! Session state owned by the frame driver.
//!
//! Nothing here touches browser or GPU APIs, so the same types back the wasm
//! frontend and the host-side tests.

use super::constants::*;
use super::pointer::PointerState;
use crate::constants::{
    DELTA_THRESHOLD, POINTER_FADE_SPEED, POINTER_MULTIPLIER, POINTER_POWER,
    SPEED_TEXTURE_FADE_SPEED,
};
use rand::Rng;

/// One circular blob with eyes, as pushed to the output shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub color: [f32; 3],
    pub position: [f32; 2],
    pub size: f32,
}

impl Blob {
    /// Uniform random color, position in \[-1, 1\]² and size in \[0.5, 1.5).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color: [rng.gen(), rng.gen(), rng.gen()],
            position: [rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)],
            size: rng.gen_range(RANDOM_BLOB_SIZE_MIN..RANDOM_BLOB_SIZE_MAX),
        }
    }
}

/// Append-only blob list bounded by [`MAX_BLOBS`].
#[derive(Clone, Debug)]
pub struct BlobSet {
    blobs: Vec<Blob>,
}

impl BlobSet {
    pub fn seeded() -> Self {
        let blobs = (0..DEFAULT_BLOB_COLORS.len())
            .map(|i| Blob {
                color: DEFAULT_BLOB_COLORS[i],
                position: DEFAULT_BLOB_POSITIONS[i],
                size: DEFAULT_BLOB_SIZES[i],
            })
            .collect();
        Self { blobs }
    }

    /// Appends a blob and returns its index, or `None` when already full.
    pub fn push(&mut self, blob: Blob) -> Option<usize> {
        if self.blobs.len() >= MAX_BLOBS {
            return None;
        }
        self.blobs.push(blob);
        Some(self.blobs.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.blobs.len() >= MAX_BLOBS
    }

    pub fn get(&self, index: usize) -> Option<&Blob> {
        self.blobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Blob> {
        self.blobs.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blob> {
        self.blobs.iter()
    }
}

impl Default for BlobSet {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Tunables read every frame and edited from the control panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub pointer_multiplier: f32,
    pub pointer_power: f32,
    pub delta_threshold: f32,
    pub pointer_fade_speed: f32,
    pub speed_texture_fade_speed: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            pointer_multiplier: POINTER_MULTIPLIER,
            pointer_power: POINTER_POWER,
            delta_threshold: DELTA_THRESHOLD,
            pointer_fade_speed: POINTER_FADE_SPEED,
            speed_texture_fade_speed: SPEED_TEXTURE_FADE_SPEED,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EffectState {
    pub params: Params,
    pub pointer: PointerState,
    pub blobs: BlobSet,
}
