//! Downsampling decoded images into a fixed RGBA grid

use image::imageops::{self, FilterType};

use crate::config::SAMPLE_SIZE;
use crate::core::ExtractError;

/// Number of pixels in a sample grid
pub const SAMPLE_PIXELS: usize = (SAMPLE_SIZE * SAMPLE_SIZE) as usize;

/// A `SAMPLE_SIZE` x `SAMPLE_SIZE` grid of RGBA8 pixels
///
/// Extraction cost depends only on this grid, never on the source resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSample {
    pixels: Vec<[u8; 4]>,
}

impl PixelSample {
    /// Decode encoded image bytes (any format `image` understands) and downsample
    pub fn decode(bytes: &[u8]) -> Result<Self, ExtractError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img))
    }

    /// Squash an already-decoded image onto the grid, ignoring aspect ratio
    ///
    /// Resampling happens on premultiplied alpha, so the color hidden under
    /// transparent pixels never bleeds into visible ones.
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let mut rgba = img.to_rgba8();
        for pixel in rgba.pixels_mut() {
            pixel.0 = premultiply(pixel.0);
        }

        let resized = imageops::resize(&rgba, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);

        Self {
            pixels: resized.pixels().map(|p| unpremultiply(p.0)).collect(),
        }
    }

    /// Build a sample from raw RGBA pixels in row-major order
    pub fn from_pixels(pixels: Vec<[u8; 4]>) -> Result<Self, ExtractError> {
        if pixels.len() != SAMPLE_PIXELS {
            return Err(ExtractError::InvalidSample(pixels.len()));
        }
        Ok(Self { pixels })
    }

    /// A sample where every pixel is `rgba`
    pub fn uniform(rgba: [u8; 4]) -> Self {
        Self {
            pixels: vec![rgba; SAMPLE_PIXELS],
        }
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    [scale(r), scale(g), scale(b), a]
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let scale = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_downsamples_to_grid() {
        let img = RgbaImage::from_pixel(400, 250, Rgba([10, 120, 200, 255]));
        let sample = PixelSample::decode(&encode(img, ImageFormat::Png)).unwrap();

        assert_eq!(sample.pixels().len(), SAMPLE_PIXELS);
        let expected = [10u8, 120, 200, 255];
        for pixel in sample.pixels() {
            for (got, want) in pixel.iter().zip(expected) {
                assert!(got.abs_diff(want) <= 1, "{:?}", pixel);
            }
        }
    }

    #[test]
    fn test_decode_upsamples_small_images() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([250, 20, 20, 255]));
        let sample = PixelSample::decode(&encode(img, ImageFormat::Png)).unwrap();
        assert_eq!(sample.pixels().len(), SAMPLE_PIXELS);
    }

    #[test]
    fn test_transparent_background_does_not_tint_edges() {
        // red stripes over a fully transparent blue background
        let img = RgbaImage::from_fn(360, 360, |x, _| {
            if (x / 20) % 2 == 0 {
                Rgba([220, 30, 30, 255])
            } else {
                Rgba([0, 0, 255, 0])
            }
        });
        let sample = PixelSample::decode(&encode(img, ImageFormat::Png)).unwrap();

        // only pixels the extractor would look at (alpha >= 0.08)
        let visible: Vec<_> = sample.pixels().iter().filter(|p| p[3] >= 21).collect();
        assert!(!visible.is_empty());
        for pixel in visible {
            assert_eq!(pixel[1], pixel[2], "{:?}", pixel);
            assert!(pixel[0] > pixel[1], "{:?}", pixel);
        }
    }

    #[test]
    fn test_premultiply_round_trip() {
        assert_eq!(premultiply([220, 30, 30, 0]), [0, 0, 0, 0]);
        assert_eq!(premultiply([220, 30, 30, 255]), [220, 30, 30, 255]);
        let restored = unpremultiply(premultiply([220, 30, 30, 128]));
        for (got, want) in restored.iter().zip([220u8, 30, 30, 128]) {
            assert!(got.abs_diff(want) <= 1, "{:?}", restored);
        }
        assert_eq!(unpremultiply([9, 9, 9, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = PixelSample::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(PixelSample::from_pixels(vec![[0; 4]; SAMPLE_PIXELS]).is_ok());
        let err = PixelSample::from_pixels(vec![[0; 4]; 10]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSample(10)));
    }
}
