// src/db/review_store.rs
// DOCUMENTATION: Storage seam for the "reviews" collection
// PURPOSE: Generic create/read/update/delete over validated reviews, plus an in-memory store

use crate::errors::StoreError;
use crate::models::{Review, ReviewPatch, ValidatedReview};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Document-store driver for reviews
/// DOCUMENTATION: Implementations only accept validated input; they assign the
/// id (and timestamps when enabled) and report their own failures as StoreError
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a review and return it with its store-assigned id
    async fn create(&self, review: &ValidatedReview) -> Result<Review, StoreError>;

    /// Fetch a review; Ok(None) when no record has this id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError>;

    /// Apply a partial update; StoreError::NotFound when no record has this id
    async fn update_by_id(&self, id: Uuid, patch: &ReviewPatch) -> Result<Review, StoreError>;

    /// Remove a review; StoreError::NotFound when no record has this id
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory review store
/// DOCUMENTATION: Thread-safe map keyed by review id. Used in tests and by
/// callers that have no database.
#[derive(Clone)]
pub struct InMemoryReviewStore {
    records: Arc<RwLock<HashMap<Uuid, Review>>>,
    record_timestamps: bool,
}

impl InMemoryReviewStore {
    pub fn new(record_timestamps: bool) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            record_timestamps,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Records timestamps, matching Config::default()
impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn create(&self, review: &ValidatedReview) -> Result<Review, StoreError> {
        let now = self.record_timestamps.then(Utc::now);
        let record = Review::from_validated(Uuid::new_v4(), review, now);

        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!("duplicate id {}", record.id)));
        }
        records.insert(record.id, record.clone());

        log::debug!("Stored review {} in memory", record.id);
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, patch: &ReviewPatch) -> Result<Review, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.apply_patch(patch, self.record_timestamps.then(Utc::now));
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        match self.records.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}
