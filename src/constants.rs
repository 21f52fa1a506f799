/// Frame smoothing and interaction tuning constants.
///
/// These constants express intended behavior (smoothing factors, clamp
/// limits, control ranges) and keep magic numbers out of the code.

// Default tunables, see `core::Params`
pub const POINTER_MULTIPLIER: f32 = 0.051; // how far the velocity field displaces blobs
pub const POINTER_POWER: f32 = 0.35; // response-curve exponent for raw pointer deltas
pub const DELTA_THRESHOLD: f32 = 0.5; // per-frame blend toward the displacement target
pub const POINTER_FADE_SPEED: f32 = 0.75; // per-frame activity decay
pub const SPEED_TEXTURE_FADE_SPEED: f32 = 0.95; // per-frame velocity field decay

// Activity below this snaps to exactly zero
pub const ACTIVITY_SNAP_THRESHOLD: f32 = 0.05;

// Control panel ranges
pub const POINTER_MULTIPLIER_RANGE: (f32, f32) = (0.0, 0.3);
pub const BLOB_AXIS_RANGE: (f32, f32) = (-1.0, 1.0);
pub const BLOB_SIZE_RANGE: (f32, f32) = (0.1, 2.0);

// Canvas backing store
pub const DEFAULT_CANVAS_ID: &str = "blob-canvas";
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
