//! Configuration module for cover-glow
//!
//! Settings file handling, path management and the fixed extraction policy.

mod paths;
mod user_config;

pub use paths::Paths;
pub use user_config::GlowConfig;

/// Side length of the downsampled pixel grid
pub const SAMPLE_SIZE: u32 = 36;

/// Hue wheel partitioning
pub const HUE_BIN_COUNT: usize = 30;
pub const HUE_BIN_DEGREES: f64 = 360.0 / HUE_BIN_COUNT as f64;

/// Pixels with less opacity than this are ignored everywhere
pub const MIN_ALPHA: f64 = 0.08;

/// A hue bin needs at least this many pixels to be considered
pub const MIN_BIN_PIXELS: u32 = 3;
