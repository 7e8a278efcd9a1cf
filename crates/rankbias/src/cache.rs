use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use crate::types::Coordinates;

/// Location string to coordinates store consulted before every geocoding request.
///
/// Keys are matched exactly: no case folding or whitespace normalization.
/// Only successful lookups are ever stored.
pub trait GeocodeCache: Send + Sync + Debug {
    fn get(&self, location: &str) -> Option<Coordinates>;

    fn insert(&self, location: String, coords: Coordinates);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime cache without eviction.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Coordinates>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(entries: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl GeocodeCache for MemoryCache {
    fn get(&self, location: &str) -> Option<Coordinates> {
        self.entries.read().ok()?.get(location).copied()
    }

    fn insert(&self, location: String, coords: Coordinates) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(location, coords);
        }
    }

    fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}
