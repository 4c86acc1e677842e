//! Core library functions for cover-glow

pub mod accent;
pub mod colorlib;
mod error;
pub mod extractor;
pub mod loader;
pub mod sampler;

pub use colorlib::{ColorLib, Hsl};
pub use error::ExtractError;
pub use extractor::AccentExtractor;
pub use loader::{AssetLoader, ImageLoader};
pub use sampler::PixelSample;
