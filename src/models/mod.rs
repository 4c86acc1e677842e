//! Data models for cover-glow
//!
//! Accent colors and the image references they are extracted from.

mod accent;
mod image_ref;

pub use accent::{AccentColor, ParseAccentError, DEFAULT_GLOW};
pub use image_ref::{classify, resolve_asset_url, ImageSource};
