pub mod constants;
pub mod double_buffer;
pub mod driver;
pub mod pointer;
pub mod shader;
pub mod state;

pub use constants::*;
pub use double_buffer::*;
pub use driver::*;
pub use pointer::*;
pub use shader::*;
pub use state::*;

// Shaders bundled as string constants
pub static FULLSCREEN_WGSL: &str = include_str!("../../shaders/fullscreen.wgsl");
pub static SPEED_WGSL: &str = include_str!("../../shaders/speed.wgsl");
pub static OUTPUT_WGSL: &str = include_str!("../../shaders/output.wgsl");
