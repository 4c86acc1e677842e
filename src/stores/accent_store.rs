//! Accent store - memoized extraction results keyed by image reference

use dashmap::DashMap;

use crate::models::AccentColor;

/// In-memory store of extraction results
///
/// A stored `None` records that the image produced no accent (or failed to
/// load) so it is not retried. Entries live as long as the store.
#[derive(Debug, Default)]
pub struct AccentStore {
    accents: DashMap<String, Option<AccentColor>>,
}

impl AccentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer `None` is a miss, `Some(None)` is a remembered failure
    pub fn get(&self, reference: &str) -> Option<Option<AccentColor>> {
        self.accents.get(reference).map(|entry| *entry.value())
    }

    pub fn insert(&self, reference: String, accent: Option<AccentColor>) {
        self.accents.insert(reference, accent);
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.accents.contains_key(reference)
    }

    pub fn count(&self) -> usize {
        self.accents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accents.is_empty()
    }
}
