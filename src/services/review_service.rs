// src/services/review_service.rs
// DOCUMENTATION: Business logic for reviews
// PURPOSE: Validate before every write, pass persistence through unchanged

use crate::db::{ReviewStore, UserDirectory};
use crate::errors::ReviewsError;
use crate::models::{Review, UserId};
use crate::services::validation::{validate, validate_patch};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Behaviour switches for ReviewService
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Look up the author on create/update and log a warning if it is missing
    pub verify_authors: bool,
}

pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    users: Arc<dyn UserDirectory>,
    options: ServiceOptions,
}

impl ReviewService {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        users: Arc<dyn UserDirectory>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            store,
            users,
            options,
        }
    }

    /// Create a review from an untyped candidate
    /// DOCUMENTATION: Nothing reaches the store unless validation passes
    pub async fn create(&self, candidate: &Value) -> Result<Review, ReviewsError> {
        let review = validate(candidate).map_err(|e| {
            log::debug!("Rejected review candidate: {}", e);
            e
        })?;

        if let Some(author) = review.author() {
            self.check_author(author).await;
        }

        let created = self.store.create(&review).await?;
        log::info!("Created review {}", created.id);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewsError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Apply a partial update; same field rules as create
    pub async fn update_by_id(&self, id: Uuid, patch: &Value) -> Result<Review, ReviewsError> {
        let patch = validate_patch(patch).map_err(|e| {
            log::debug!("Rejected patch for review {}: {}", id, e);
            e
        })?;

        if let Some(author) = patch.author().value() {
            self.check_author(author).await;
        }

        let updated = self.store.update_by_id(id, &patch).await?;
        log::info!("Updated review {}", id);
        Ok(updated)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ReviewsError> {
        self.store.delete_by_id(id).await?;
        log::info!("Deleted review {}", id);
        Ok(())
    }

    /// Explicit author lookup through the user collaborator
    /// DOCUMENTATION: Returns the user document untouched; None when the review
    /// has no author or the author no longer exists
    pub async fn find_author(&self, review: &Review) -> Result<Option<Value>, ReviewsError> {
        match &review.author {
            Some(author) => Ok(self.users.find_user(author).await?),
            None => Ok(None),
        }
    }

    // Advisory only: the reference is not enforced
    async fn check_author(&self, author: &UserId) {
        if !self.options.verify_authors {
            return;
        }
        match self.users.find_user(author).await {
            Ok(Some(_)) => {}
            Ok(None) => log::warn!("Review author {} does not exist", author),
            Err(e) => log::warn!("Could not verify review author {}: {}", author, e),
        }
    }
}
