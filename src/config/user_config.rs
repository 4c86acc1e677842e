//! User configuration for cover-glow
//!
//! This module handles user-configurable settings stored in settings.json.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::Paths;
use crate::models::{AccentColor, DEFAULT_GLOW};

const ASSET_ROOT_ENV: &str = "COVER_GLOW_ASSET_ROOT";
const SITE_URL_ENV: &str = "COVER_GLOW_SITE_URL";

/// Settings for locating and fetching cover images
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowConfig {
    /// Directory that root-relative asset paths resolve against
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Base path the site is served under
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deployed site origin; when set, site assets are fetched instead of read from disk
    #[serde(default)]
    pub site_url: Option<String>,

    /// HTTP timeout for remote images
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Glow used when an image yields no accent
    #[serde(default = "default_glow")]
    pub default_glow: String,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            base_url: default_base_url(),
            site_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            default_glow: default_glow(),
        }
    }
}

impl GlowConfig {
    /// Load configuration from the settings file in the config directory
    pub fn load(paths: &Paths) -> Result<Self> {
        let settings_path = paths.settings_path();

        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            let config = Self::default();
            config.save_to(&settings_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read settings file")?;
        serde_json::from_str(&content).context("Failed to parse settings file")
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Apply `COVER_GLOW_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ASSET_ROOT_ENV).ok(),
            std::env::var(SITE_URL_ENV).ok(),
        );
    }

    /// Apply overrides, ignoring blank values
    pub fn apply_overrides(&mut self, asset_root: Option<String>, site_url: Option<String>) {
        if let Some(root) = asset_root.filter(|v| !v.trim().is_empty()) {
            self.asset_root = PathBuf::from(root.trim());
        }
        if let Some(site) = site_url.filter(|v| !v.trim().is_empty()) {
            self.site_url = Some(site.trim().to_string());
        }
    }

    /// The configured fallback glow, or the stock slate gray if it does not parse
    pub fn default_glow(&self) -> AccentColor {
        match self.default_glow.parse::<AccentColor>() {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!("Ignoring configured default glow: {}", e);
                DEFAULT_GLOW
            }
        }
    }
}

// Default value functions for serde

fn default_asset_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("cover-glow/{}", env!("CARGO_PKG_VERSION"))
}

fn default_glow() -> String {
    DEFAULT_GLOW.to_string()
}
