//! cover-glow - print the card glow color for each cover image

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use cover_glow::config::{GlowConfig, Paths};
use cover_glow::{AccentColor, AccentExtractor, AssetLoader};

/// Accent color extraction for cover images
#[derive(Parser, Debug)]
#[command(name = "cover-glow")]
#[command(version)]
#[command(about = "Derive a decorative glow color from each cover image")]
struct Args {
    /// Image references (site asset paths or URLs)
    #[arg(required = true)]
    images: Vec<String>,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that site asset paths resolve against
    #[arg(long)]
    asset_root: Option<PathBuf>,

    /// Fetch site assets from this deployed origin instead of disk
    #[arg(long)]
    site_url: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// One line of output
#[derive(Debug, Serialize)]
struct GlowReport {
    image: String,
    /// Extracted accent, `null` when the image yielded nothing
    accent: Option<AccentColor>,
    /// What a card should actually use
    glow: AccentColor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "{},hyper=warn,reqwest=warn,rustls=warn",
        log_level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let paths = Paths::new(args.config.clone())?;
    let mut config = GlowConfig::load(&paths)?;
    config.apply_env();
    config.apply_overrides(
        args.asset_root
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        args.site_url.clone(),
    );
    info!("Config directory: {:?}", paths.config_dir());

    let loader = AssetLoader::new(&config).context("Failed to build image loader")?;
    let extractor = AccentExtractor::new(Arc::new(loader));
    let fallback: AccentColor = config.default_glow();

    let reports = futures::future::join_all(args.images.iter().map(|image| {
        let extractor = &extractor;
        async move {
            let accent = extractor.extract(image).await;
            GlowReport {
                image: image.clone(),
                accent,
                glow: accent.unwrap_or(fallback),
            }
        }
    }))
    .await;

    let missing = reports.iter().filter(|r| r.accent.is_none()).count();
    if missing > 0 {
        info!("{} of {} images fell back to {}", missing, reports.len(), fallback);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}\t{}", report.image, report.glow);
        }
    }

    Ok(())
}
