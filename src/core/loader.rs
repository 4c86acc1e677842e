//! Fetching raw image bytes for a reference

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::GlowConfig;
use crate::core::ExtractError;
use crate::models::{classify, ImageSource};

/// Source of encoded image bytes
///
/// The extractor only sees this trait, so tests can swap in fixtures or
/// count how often an image is actually loaded.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, ExtractError>;
}

/// Loads site assets from disk (or a deployed site) and absolute URLs over HTTP
pub struct AssetLoader {
    client: Client,
    asset_root: PathBuf,
    base_url: String,
    site_url: Option<String>,
}

impl AssetLoader {
    pub fn new(config: &GlowConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(config, client))
    }

    fn with_client(config: &GlowConfig, client: Client) -> Self {
        Self {
            client,
            asset_root: config.asset_root.clone(),
            base_url: config.base_url.clone(),
            site_url: config.site_url.clone(),
        }
    }

    pub fn source_for(&self, reference: &str) -> ImageSource {
        classify(
            reference,
            &self.base_url,
            self.site_url.as_deref(),
            &self.asset_root,
        )
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ExtractError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "image/*")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractError::Status(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageLoader for AssetLoader {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, ExtractError> {
        match self.source_for(reference) {
            ImageSource::Remote(url) => {
                debug!("Fetching image {}", url);
                self.fetch(&url).await
            }
            ImageSource::Local(path) => {
                debug!("Reading image {:?}", path);
                Ok(tokio::fs::read(&path).await?)
            }
            ImageSource::Unsupported => Err(ExtractError::Unsupported(reference.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader_for(root: &std::path::Path) -> AssetLoader {
        let config = GlowConfig {
            asset_root: root.to_path_buf(),
            ..GlowConfig::default()
        };
        AssetLoader::new(&config).unwrap()
    }

    #[test]
    fn test_reads_site_asset_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("covers")).unwrap();
        std::fs::write(dir.path().join("covers/card.png"), b"bytes").unwrap();

        let loader = loader_for(dir.path());
        let bytes = tokio_test::block_on(loader.load("/covers/card.png")).unwrap();
        assert_eq!(bytes, b"bytes");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_for(dir.path());
        let err = tokio_test::block_on(loader.load("/covers/missing.png")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_unsupported_reference() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_for(dir.path());
        let err = tokio_test::block_on(loader.load("data:image/png;base64,AAAA")).unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    mod http {
        use crate::config::GlowConfig;
        use crate::core::{AccentExtractor, AssetLoader, ColorLib, ExtractError, ImageLoader};
        use reqwest::Client;
        use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
        use std::io::Cursor;
        use std::sync::{Arc, Mutex};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        fn red_png() -> Vec<u8> {
            let img = RgbaImage::from_pixel(48, 48, Rgba([220, 30, 30, 255]));
            let mut buf = Vec::new();
            DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .unwrap();
            buf
        }

        /// Serves `/covers/red.png` and 404s everything else; records request heads
        async fn spawn_server(png: Vec<u8>) -> (String, Arc<Mutex<Vec<String>>>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let origin = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::clone(&requests);

            tokio::spawn(async move {
                loop {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        return;
                    };

                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head).to_string();
                    let found = head.starts_with("GET /covers/red.png ")
                        || head.starts_with("GET /portfolio/covers/red.png ");
                    seen.lock().unwrap().push(head);

                    let (status, body): (&str, &[u8]) = if found {
                        ("200 OK", png.as_slice())
                    } else {
                        ("404 Not Found", &b"missing"[..])
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.write_all(body).await;
                    let _ = socket.shutdown().await;
                }
            });

            (origin, requests)
        }

        /// Loopback requests must not be routed through an ambient proxy
        fn direct_loader(config: &GlowConfig) -> AssetLoader {
            let client = Client::builder().no_proxy().build().unwrap();
            AssetLoader::with_client(config, client)
        }

        #[tokio::test]
        async fn test_non_success_status_is_an_error() {
            let (origin, _) = spawn_server(red_png()).await;
            let loader = direct_loader(&GlowConfig::default());

            let err = loader
                .load(&format!("{}/covers/nope.png", origin))
                .await
                .unwrap_err();
            assert!(
                matches!(err, ExtractError::Status(status) if status == reqwest::StatusCode::NOT_FOUND)
            );
        }

        #[tokio::test]
        async fn test_remote_image_is_fetched_and_scored() {
            let (origin, requests) = spawn_server(red_png()).await;
            let loader = direct_loader(&GlowConfig::default());
            let extractor = AccentExtractor::new(Arc::new(loader));

            let reference = format!("{}/covers/red.png", origin);
            let accent = extractor.extract(&reference).await.unwrap();
            let hsl = ColorLib::hsl_of(accent);
            assert!(hsl.h <= 12.0 || hsl.h >= 348.0, "hue {}", hsl.h);

            let requests = requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            assert!(requests[0].to_ascii_lowercase().contains("accept: image/*"));
        }

        #[tokio::test]
        async fn test_site_assets_fetched_from_site_url() {
            let (origin, requests) = spawn_server(red_png()).await;
            let config = GlowConfig {
                base_url: "/portfolio/".to_string(),
                site_url: Some(origin),
                ..GlowConfig::default()
            };
            let loader = direct_loader(&config);

            let bytes = loader.load("/covers/red.png").await.unwrap();
            assert_eq!(bytes, red_png());
            assert!(requests.lock().unwrap()[0].starts_with("GET /portfolio/covers/red.png "));
        }
    }
}
