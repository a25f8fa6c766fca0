//! Failure-injecting test doubles for the gate's external stores.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use loreforge_canon_types::{CanonLane, ContentKey};

use crate::error::{LogError, StoreError};
use crate::log::{RecordFilter, ValidationLogStore, ValidationRecord};
use crate::stores::{ContentStore, MemoryContentStore};

/// Content store that fails the first N publishes, then behaves normally.
pub struct FlakyContentStore {
    inner: MemoryContentStore,
    failures_remaining: AtomicUsize,
}

impl FlakyContentStore {
    pub fn failing(times: usize) -> Self {
        Self {
            inner: MemoryContentStore::new(),
            failures_remaining: AtomicUsize::new(times),
        }
    }

    pub fn published_lane(&self, key: &ContentKey) -> Option<CanonLane> {
        self.inner.published_lane(key)
    }

    pub fn published_count(&self) -> usize {
        self.inner.published_count()
    }
}

#[async_trait]
impl ContentStore for FlakyContentStore {
    async fn mark_published(&self, key: &ContentKey, lane: CanonLane) -> Result<(), StoreError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("induced store outage".into()));
        }
        self.inner.mark_published(key, lane).await
    }
}

/// Validation log that always fails to append.
pub struct FailingValidationLog;

#[async_trait]
impl ValidationLogStore for FailingValidationLog {
    async fn append(&self, _record: ValidationRecord) -> Result<(), LogError> {
        Err(LogError::Unavailable("induced log outage".into()))
    }

    async fn latest_for(&self, _key: &ContentKey) -> Result<Option<ValidationRecord>, LogError> {
        Err(LogError::Unavailable("induced log outage".into()))
    }

    async fn query(&self, _filter: &RecordFilter) -> Result<Vec<ValidationRecord>, LogError> {
        Err(LogError::Unavailable("induced log outage".into()))
    }
}
