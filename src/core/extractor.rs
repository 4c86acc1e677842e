//! Memoized accent extraction
//!
//! `AccentExtractor::extract` never fails: load, decode and analysis errors,
//! and panics in the loader, are logged and stored as an absent accent.
//! Concurrent first-time requests for one reference share a single load; the
//! work runs in its own task so it finishes (and fills the store) even if
//! every caller goes away.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::accent::compute_accent;
use crate::core::loader::ImageLoader;
use crate::core::sampler::PixelSample;
use crate::core::ExtractError;
use crate::models::AccentColor;
use crate::stores::AccentStore;

type PendingAccent = Shared<BoxFuture<'static, Option<AccentColor>>>;

/// Image reference in, accent color out
pub struct AccentExtractor {
    loader: Arc<dyn ImageLoader>,
    store: Arc<AccentStore>,
    pending: Arc<DashMap<String, PendingAccent>>,
}

impl AccentExtractor {
    /// Extractor with its own empty store
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self::with_store(loader, Arc::new(AccentStore::new()))
    }

    /// Extractor sharing an existing store
    pub fn with_store(loader: Arc<dyn ImageLoader>, store: Arc<AccentStore>) -> Self {
        Self {
            loader,
            store,
            pending: Arc::new(DashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<AccentStore> {
        &self.store
    }

    /// Accent for `reference`, or `None` when the image yields nothing usable
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn extract(&self, reference: &str) -> Option<AccentColor> {
        if reference.is_empty() {
            return None;
        }

        if let Some(cached) = self.store.get(reference) {
            return cached;
        }

        self.pending_for(reference).await
    }

    fn pending_for(&self, reference: &str) -> PendingAccent {
        match self.pending.entry(reference.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                // the task stores its result before leaving the pending map,
                // so a vacant slot here may mean it just finished
                if let Some(cached) = self.store.get(reference) {
                    return futures::future::ready(cached).boxed().shared();
                }

                let key = entry.key().clone();
                let loader = Arc::clone(&self.loader);
                let store = Arc::clone(&self.store);
                let pending = Arc::clone(&self.pending);

                let handle = tokio::spawn(async move {
                    let outcome = AssertUnwindSafe(analyze(loader.as_ref(), &key))
                        .catch_unwind()
                        .await;
                    let accent = match outcome {
                        Ok(Ok(accent)) => Some(accent),
                        Ok(Err(e)) => {
                            debug!("No accent for {}: {}", key, e);
                            None
                        }
                        Err(_) => {
                            warn!("Image loader panicked for {}", key);
                            None
                        }
                    };
                    store.insert(key.clone(), accent);
                    pending.remove(&key);
                    accent
                });

                let shared = async move { handle.await.unwrap_or(None) }
                    .boxed()
                    .shared();
                entry.insert(shared.clone());
                shared
            }
        }
    }
}

/// Load, decode and score one image without touching any cache
pub async fn analyze(loader: &dyn ImageLoader, reference: &str) -> Result<AccentColor, ExtractError> {
    let bytes = loader.load(reference).await?;

    tokio::task::spawn_blocking(move || {
        let sample = PixelSample::decode(&bytes)?;
        compute_accent(&sample).ok_or(ExtractError::EmptySignal)
    })
    .await
    .map_err(|e| ExtractError::Processing(e.to_string()))?
}
