//! Accent selection over a pixel sample
//!
//! Three tiers, first hit wins:
//!
//! 1. the most prominent vivid hue, found by binning saturated pixels on the
//!    hue wheel and scoring each bin; the winner is re-saturated and pulled
//!    toward mid lightness
//! 2. a weighted average that skips near-black and near-white pixels
//! 3. the same average with every visible pixel allowed

use crate::config::{HUE_BIN_COUNT, HUE_BIN_DEGREES, MIN_ALPHA, MIN_BIN_PIXELS};
use crate::core::colorlib::{ColorLib, Hsl};
use crate::core::sampler::PixelSample;
use crate::models::AccentColor;

const MIN_CHROMA: u8 = 16;
const MIN_VALUE: f64 = 0.14;
const MAX_VALUE: f64 = 0.95;
const MIN_SATURATION: f64 = 0.18;
const MIN_LIGHTNESS: f64 = 0.12;
const MAX_LIGHTNESS: f64 = 0.86;

const MIN_LUMA: f64 = 22.0;
const MAX_LUMA: f64 = 236.0;

/// Per-hue accumulator, rebuilt on every extraction
#[derive(Debug, Clone, Copy, Default)]
struct HueBin {
    weight: f64,
    red: f64,
    green: f64,
    blue: f64,
    sat: f64,
    light: f64,
    count: u32,
}

impl HueBin {
    fn add(&mut self, [r, g, b]: [u8; 3], hsl: Hsl, weight: f64) {
        self.weight += weight;
        self.red += f64::from(r) * weight;
        self.green += f64::from(g) * weight;
        self.blue += f64::from(b) * weight;
        self.sat += hsl.s * weight;
        self.light += hsl.l * weight;
        self.count += 1;
    }

    fn is_eligible(&self) -> bool {
        self.weight > 0.0 && self.count >= MIN_BIN_PIXELS
    }

    fn score(&self) -> f64 {
        let avg_saturation = self.sat / self.weight;
        let avg_lightness = self.light / self.weight;
        self.weight * (0.65 + avg_saturation * 1.6) * (0.72 + avg_lightness * 0.8)
    }

    fn average_rgb(&self) -> [f64; 3] {
        [
            self.red / self.weight,
            self.green / self.weight,
            self.blue / self.weight,
        ]
    }
}

/// Pick the accent for a sample, `None` when no visible pixel survives any tier
pub fn compute_accent(sample: &PixelSample) -> Option<AccentColor> {
    if let Some(rgb) = dominant_hue(sample) {
        return Some(enhance_accent(rgb));
    }

    weighted_average(sample, false).or_else(|| weighted_average(sample, true))
}

/// Weighted average RGB of the best-scoring hue bin
pub fn dominant_hue(sample: &PixelSample) -> Option<[f64; 3]> {
    let mut bins = [HueBin::default(); HUE_BIN_COUNT];

    for &[r, g, b, a] in sample.pixels() {
        let alpha = f64::from(a) / 255.0;
        if alpha < MIN_ALPHA {
            continue;
        }

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        let value = f64::from(max) / 255.0;
        if chroma < MIN_CHROMA || value < MIN_VALUE || value > MAX_VALUE {
            continue;
        }

        let hsl = ColorLib::rgb_to_hsl(f64::from(r), f64::from(g), f64::from(b));
        if hsl.s < MIN_SATURATION || hsl.l < MIN_LIGHTNESS || hsl.l > MAX_LIGHTNESS {
            continue;
        }

        let chroma = f64::from(chroma);
        let weight = alpha
            * (0.35 + hsl.s * 1.65)
            * (0.45 + chroma / 255.0)
            * (0.55 + hsl.l.min(0.8));
        let index = ((hsl.h / HUE_BIN_DEGREES).floor() as usize).min(HUE_BIN_COUNT - 1);
        bins[index].add([r, g, b], hsl, weight);
    }

    let mut best: Option<&HueBin> = None;
    let mut best_score = 0.0;
    for bin in bins.iter().filter(|bin| bin.is_eligible()) {
        let score = bin.score();
        // strictly greater, so the lowest hue wins a tie
        if score > best_score {
            best_score = score;
            best = Some(bin);
        }
    }

    best.map(HueBin::average_rgb)
}

/// Saturation/lightness adjustment applied to a winning hue
pub fn enhance_hsl(hsl: Hsl) -> Hsl {
    Hsl {
        h: hsl.h,
        s: ColorLib::clamp_unit((hsl.s * 1.1 + 0.02).max(0.3)),
        l: ColorLib::clamp_unit((hsl.l * 1.02).max(0.33).min(0.68)),
    }
}

/// Re-saturate and normalize the lightness of a raw bin average
pub fn enhance_accent([r, g, b]: [f64; 3]) -> AccentColor {
    let enhanced = enhance_hsl(ColorLib::rgb_to_hsl(r, g, b));
    let [r, g, b] = ColorLib::hsl_to_rgb(enhanced);
    ColorLib::to_accent(r, g, b)
}

/// Saturation- and alpha-weighted mean of the visible pixels
///
/// Unless `allow_extreme_luma` is set, near-black and near-white pixels are skipped.
pub fn weighted_average(sample: &PixelSample, allow_extreme_luma: bool) -> Option<AccentColor> {
    let mut red = 0.0;
    let mut green = 0.0;
    let mut blue = 0.0;
    let mut total_weight = 0.0;

    for &[r, g, b, a] in sample.pixels() {
        let alpha = f64::from(a) / 255.0;
        if alpha < MIN_ALPHA {
            continue;
        }

        let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
        let luma = ColorLib::luma(rf, gf, bf);
        if !allow_extreme_luma && !(MIN_LUMA..=MAX_LUMA).contains(&luma) {
            continue;
        }

        let weight = 0.28 + ColorLib::value_saturation(r, g, b) * 1.25 + alpha * 0.45;
        red += rf * weight;
        green += gf * weight;
        blue += bf * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return None;
    }

    Some(ColorLib::to_accent(
        red / total_weight,
        green / total_weight,
        blue / total_weight,
    ))
}
