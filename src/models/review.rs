// src/models/review.rs
// DOCUMENTATION: Persisted shape of a review and its validated write forms
// PURPOSE: Plain data structures, checked by services::validation

use crate::models::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Inclusive rating bounds
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Review as stored in the "reviews" collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub comment: Option<String>,
    pub rating: Option<i32>,
    pub author: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Build a stored record from a validated candidate
    /// `now` is None when the store does not record timestamps
    pub fn from_validated(id: Uuid, review: &ValidatedReview, now: Option<DateTime<Utc>>) -> Self {
        Review {
            id,
            comment: review.comment.clone(),
            rating: review.rating,
            author: review.author.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated patch in place
    pub fn apply_patch(&mut self, patch: &ReviewPatch, now: Option<DateTime<Utc>>) {
        patch.comment.apply_to(&mut self.comment);
        patch.rating.apply_to(&mut self.rating);
        patch.author.apply_to(&mut self.author);
        if now.is_some() {
            self.updated_at = now;
        }
    }
}

/// Review candidate that passed validation
/// DOCUMENTATION: Only services::validation constructs this, so holding one
/// means the rating is in range and the author id is well formed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedReview {
    comment: Option<String>,
    rating: Option<i32>,
    author: Option<UserId>,
}

impl ValidatedReview {
    pub(crate) fn new(comment: Option<String>, rating: Option<i32>, author: Option<UserId>) -> Self {
        Self {
            comment,
            rating,
            author,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn rating(&self) -> Option<i32> {
        self.rating
    }

    pub fn author(&self) -> Option<&UserId> {
        self.author.as_ref()
    }
}

/// Change requested for one field of a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PatchField<T> {
    /// Field absent from the patch
    #[default]
    Keep,
    /// Field explicitly set to null
    Clear,
    Set(T),
}

impl<T: Clone> PatchField<T> {
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            PatchField::Keep => {}
            PatchField::Clear => *slot = None,
            PatchField::Set(value) => *slot = Some(value.clone()),
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, PatchField::Keep)
    }

    /// New value for the field; None both for Keep and Clear
    pub fn value(&self) -> Option<&T> {
        match self {
            PatchField::Set(value) => Some(value),
            _ => None,
        }
    }
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    comment: PatchField<String>,
    rating: PatchField<i32>,
    author: PatchField<UserId>,
}

impl ReviewPatch {
    pub(crate) fn new(
        comment: PatchField<String>,
        rating: PatchField<i32>,
        author: PatchField<UserId>,
    ) -> Self {
        Self {
            comment,
            rating,
            author,
        }
    }

    pub fn comment(&self) -> &PatchField<String> {
        &self.comment
    }

    pub fn rating(&self) -> &PatchField<i32> {
        &self.rating
    }

    pub fn author(&self) -> &PatchField<UserId> {
        &self.author
    }

    pub fn is_empty(&self) -> bool {
        self.comment.is_keep() && self.rating.is_keep() && self.author.is_keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> UserId {
        UserId::parse("64f1a2b3c4d5e6f7a8b9c0d1").unwrap()
    }

    #[test]
    fn test_from_validated_copies_fields() {
        let validated = ValidatedReview::new(Some("Great stay".to_string()), Some(5), Some(author()));
        let id = Uuid::new_v4();
        let now = Utc::now();

        let review = Review::from_validated(id, &validated, Some(now));

        assert_eq!(review.id, id);
        assert_eq!(review.comment.as_deref(), Some("Great stay"));
        assert_eq!(review.rating, Some(5));
        assert_eq!(review.author, Some(author()));
        assert_eq!(review.created_at, Some(now));
        assert_eq!(review.updated_at, Some(now));
    }

    #[test]
    fn test_apply_patch_keep_clear_set() {
        let validated = ValidatedReview::new(Some("Fine".to_string()), Some(3), Some(author()));
        let mut review = Review::from_validated(Uuid::new_v4(), &validated, None);

        let patch = ReviewPatch::new(PatchField::Keep, PatchField::Set(4), PatchField::Clear);
        review.apply_patch(&patch, None);

        assert_eq!(review.comment.as_deref(), Some("Fine"));
        assert_eq!(review.rating, Some(4));
        assert_eq!(review.author, None);
        assert_eq!(review.updated_at, None);
    }

    #[test]
    fn test_empty_patch() {
        assert!(ReviewPatch::default().is_empty());

        let patch = ReviewPatch::new(PatchField::Clear, PatchField::Keep, PatchField::Keep);
        assert!(!patch.is_empty());
        assert_eq!(patch.comment().value(), None);
    }
}
