//! Image reference classification and site asset URL resolution

use std::path::{Component, Path, PathBuf};

/// Where the bytes for an image reference come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetched over HTTP(S)
    Remote(String),
    /// Read from disk
    Local(PathBuf),
    /// Not an image location we can load (`data:`, `mailto:`, fragments...)
    Unsupported,
}

/// `scheme://` or protocol-relative `//`
fn is_absolute_url(value: &str) -> bool {
    if value.starts_with("//") {
        return true;
    }
    match value.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

fn is_passthrough(value: &str) -> bool {
    is_absolute_url(value)
        || value.starts_with("data:")
        || value.starts_with("mailto:")
        || value.starts_with("tel:")
        || value.starts_with('#')
}

/// Prefix a root-relative asset path with the site base path
///
/// Absolute URLs, special schemes, fragments and relative paths are
/// returned unchanged, as is everything when the base is `/`.
pub fn resolve_asset_url(value: &str, base: &str) -> String {
    if value.is_empty() || is_passthrough(value) || !value.starts_with('/') {
        return value.to_string();
    }

    let base = if base.is_empty() { "/" } else { base };
    if base == "/" {
        return value.to_string();
    }
    format!("{}{}", base.trim_end_matches('/'), value)
}

/// Decide how to load `reference`
///
/// `site_url` (when set) turns site assets into remote fetches; otherwise
/// they are looked up under `asset_root`.
pub fn classify(
    reference: &str,
    base_url: &str,
    site_url: Option<&str>,
    asset_root: &Path,
) -> ImageSource {
    let reference = reference.trim();
    if reference.is_empty() {
        return ImageSource::Unsupported;
    }

    if let Some(rest) = reference.strip_prefix("//") {
        return ImageSource::Remote(format!("https://{}", rest));
    }
    if is_absolute_url(reference) {
        let lower = reference.to_ascii_lowercase();
        return if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote(reference.to_string())
        } else {
            ImageSource::Unsupported
        };
    }
    if is_passthrough(reference) {
        return ImageSource::Unsupported;
    }

    match site_url {
        Some(site) => {
            let site = site.trim_end_matches('/');
            let resolved = resolve_asset_url(reference, base_url);
            if resolved.starts_with('/') {
                ImageSource::Remote(format!("{}{}", site, resolved))
            } else {
                ImageSource::Remote(format!("{}/{}", site, resolved))
            }
        }
        None => {
            let relative = Path::new(reference.trim_start_matches('/'));
            // stay inside the asset root
            if relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
            {
                return ImageSource::Unsupported;
            }
            ImageSource::Local(asset_root.join(relative))
        }
    }
}
