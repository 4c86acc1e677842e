//! cover-glow - accent colors for project cover images
//!
//! Samples a cover image onto a small grid, finds its most prominent vivid
//! hue and returns it as an `"R, G, B"` accent for decorative card glows.
//! Results are memoized per image reference.

pub mod config;
pub mod core;
pub mod models;
pub mod stores;

pub use crate::core::{AccentExtractor, AssetLoader, ExtractError, ImageLoader, PixelSample};
pub use crate::models::{AccentColor, DEFAULT_GLOW};
pub use crate::stores::AccentStore;
