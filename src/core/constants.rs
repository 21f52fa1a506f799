// Shared blob constants used by the driver, the binder and the shaders.

/// Fixed blob capacity; must match the array lengths in `shaders/output.wgsl`.
pub const MAX_BLOBS: usize = 10;

// Seeded blobs: amber, brick red, steel blue
pub const DEFAULT_BLOB_COLORS: [[f32; 3]; 3] = [
    [0.8549, 0.7059, 0.1961],
    [0.7569, 0.2863, 0.1765],
    [0.2627, 0.4627, 0.6706],
];
pub const DEFAULT_BLOB_POSITIONS: [[f32; 2]; 3] = [[0.3, 0.3], [-0.3, 0.0], [0.5, 0.0]];
pub const DEFAULT_BLOB_SIZES: [f32; 3] = [1.0, 1.2, 0.8];

// Randomly added blobs draw their size from this half-open range
pub const RANDOM_BLOB_SIZE_MIN: f32 = 0.5;
pub const RANDOM_BLOB_SIZE_MAX: f32 = 1.5;
