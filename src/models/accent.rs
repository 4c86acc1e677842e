//! Accent color model

use serde::{Serialize, Serializer};
use std::str::FromStr;

/// A resolved accent color, rendered as `"R, G, B"` for CSS `rgb()` / `rgba()` use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccentColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Muted slate gray used by callers when extraction yields nothing
pub const DEFAULT_GLOW: AccentColor = AccentColor::new(148, 163, 184);

impl AccentColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

}

impl std::fmt::Display for AccentColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

/// Serialized in its CSS form, `"R, G, B"`
impl Serialize for AccentColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid accent color: {0:?}")]
pub struct ParseAccentError(pub String);

impl FromStr for AccentColor {
    type Err = ParseAccentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(ParseAccentError(s.to_string()));
        };

        let channel = |v: &str| v.parse::<u8>().map_err(|_| ParseAccentError(s.to_string()));
        Ok(Self::new(channel(*r)?, channel(*g)?, channel(*b)?))
    }
}
