use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use loreforge_canon_types::{CanonLane, ContentKey};

use crate::error::StoreError;

/// The gate's narrow interface to the external content store. The store
/// entity is only mutated here, at the moment of successful publish.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Set the content live as canon in the given lane. Must be
    /// idempotent: re-publishing the same key overwrites the lane.
    async fn mark_published(&self, key: &ContentKey, lane: CanonLane) -> Result<(), StoreError>;
}

/// In-process content store.
pub struct MemoryContentStore {
    published: Mutex<HashMap<ContentKey, CanonLane>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(HashMap::new()),
        }
    }

    pub fn published_lane(&self, key: &ContentKey) -> Option<CanonLane> {
        self.published
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .copied()
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().expect("store mutex poisoned").len()
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn mark_published(&self, key: &ContentKey, lane: CanonLane) -> Result<(), StoreError> {
        self.published
            .lock()
            .expect("store mutex poisoned")
            .insert(key.clone(), lane);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreforge_canon_types::{ContentKind, EntityId};

    #[tokio::test]
    async fn mark_published_is_idempotent() {
        let store = MemoryContentStore::new();
        let key = ContentKey::new(ContentKind::Story, EntityId::new("tale-1"));

        store.mark_published(&key, CanonLane::Branch).await.unwrap();
        store.mark_published(&key, CanonLane::Primary).await.unwrap();

        assert_eq!(store.published_count(), 1);
        assert_eq!(store.published_lane(&key), Some(CanonLane::Primary));
    }
}
