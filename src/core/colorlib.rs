//! Color-space helpers shared by the accent extractor

use crate::models::AccentColor;

/// A color in hue/saturation/lightness form
///
/// Hue is in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Color library for converting between RGB and HSL
pub struct ColorLib;

impl ColorLib {
    /// Convert 0-255 RGB channels to HSL
    pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Hsl {
        let red = r / 255.0;
        let green = g / 255.0;
        let blue = b / 255.0;
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;

        let mut hue = 0.0;
        if delta != 0.0 {
            hue = if max == red {
                ((green - blue) / delta) % 6.0
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            };
            hue *= 60.0;
            if hue < 0.0 {
                hue += 360.0;
            }
        }

        let lightness = (max + min) / 2.0;
        let saturation = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * lightness - 1.0).abs())
        };

        Hsl {
            h: hue,
            s: saturation,
            l: lightness,
        }
    }

    /// Convert HSL back to unclamped 0-255 RGB channels
    pub fn hsl_to_rgb(hsl: Hsl) -> [f64; 3] {
        let chroma = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
        let hue_prime = ((hsl.h % 360.0) + 360.0) % 360.0 / 60.0;
        let x = chroma * (1.0 - ((hue_prime % 2.0) - 1.0).abs());

        let (red, green, blue) = match hue_prime {
            h if (0.0..1.0).contains(&h) => (chroma, x, 0.0),
            h if (1.0..2.0).contains(&h) => (x, chroma, 0.0),
            h if (2.0..3.0).contains(&h) => (0.0, chroma, x),
            h if (3.0..4.0).contains(&h) => (0.0, x, chroma),
            h if (4.0..5.0).contains(&h) => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let m = hsl.l - chroma / 2.0;
        [(red + m) * 255.0, (green + m) * 255.0, (blue + m) * 255.0]
    }

    /// Round and clamp a channel into `0..=255`
    pub fn clamp_channel(value: f64) -> u8 {
        // NaN falls through to 0
        value.round().clamp(0.0, 255.0) as u8
    }

    /// Clamp into `[0, 1]`
    pub fn clamp_unit(value: f64) -> f64 {
        value.clamp(0.0, 1.0)
    }

    /// Build an accent color from unclamped channel values
    pub fn to_accent(r: f64, g: f64, b: f64) -> AccentColor {
        AccentColor::new(
            Self::clamp_channel(r),
            Self::clamp_channel(g),
            Self::clamp_channel(b),
        )
    }

    /// Rec. 709 luma on 0-255 channels
    pub fn luma(r: f64, g: f64, b: f64) -> f64 {
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// HSV-style saturation, `(max - min) / max`
    pub fn value_saturation(r: u8, g: u8, b: u8) -> f64 {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == 0 {
            0.0
        } else {
            f64::from(max - min) / f64::from(max)
        }
    }

    /// HSL of an accent color
    pub fn hsl_of(color: AccentColor) -> Hsl {
        Self::rgb_to_hsl(f64::from(color.r), f64::from(color.g), f64::from(color.b))
    }
}
